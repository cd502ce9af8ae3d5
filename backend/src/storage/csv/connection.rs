use anyhow::{Context, Result};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

/// CsvConnection manages the data directory and the per-entity files inside it
#[derive(Debug, Clone)]
pub struct CsvConnection {
    base_directory: PathBuf,
}

impl CsvConnection {
    /// Create a new CSV connection, creating the base directory if needed
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)
                .with_context(|| format!("Failed to create data directory {}", base_path.display()))?;
            info!("Created data directory: {}", base_path.display());
        }

        Ok(Self {
            base_directory: base_path,
        })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// Path of a data file inside the base directory
    pub fn file_path(&self, file_name: &str) -> PathBuf {
        self.base_directory.join(file_name)
    }

    /// Create an empty data file if it does not exist yet.
    ///
    /// The format has no header line, so a new file is simply empty.
    pub fn ensure_file_exists(&self, file_name: &str) -> Result<PathBuf> {
        let file_path = self.file_path(file_name);

        if !file_path.exists() {
            fs::write(&file_path, "")
                .with_context(|| format!("Failed to create {}", file_path.display()))?;
            debug!("Created empty data file: {}", file_path.display());
        }

        Ok(file_path)
    }
}
