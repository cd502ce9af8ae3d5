//! # Application Configuration
//!
//! Settings are read from an optional YAML file. Missing keys fall back to
//! their defaults, so an empty file and no file at all behave the same.
//!
//! ```yaml
//! data_directory: ./data
//! initial_capacity: 100
//! attendance:
//!   late_counts_as_present: true
//!   excused_counts_toward_total: false
//!   warning_threshold: 0.85
//!   critical_threshold: 0.75
//!   max_consecutive_absences: 5
//! ```
//!
//! The `STUDENT_RECORDS_DATA_DIR` environment variable overrides
//! `data_directory` from the file.

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{AttendancePolicy, DEFAULT_CAPACITY};

pub const DATA_DIR_ENV: &str = "STUDENT_RECORDS_DATA_DIR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding the four record files
    pub data_directory: PathBuf,
    /// Starting capacity of every record list
    pub initial_capacity: usize,
    pub attendance: AttendancePolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_directory: PathBuf::from("./data"),
            initial_capacity: DEFAULT_CAPACITY,
            attendance: AttendancePolicy::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `path` (when given) and apply the environment override.
    ///
    /// A path that was asked for but cannot be read is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(config.with_data_dir_override(std::env::var_os(DATA_DIR_ENV)))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read config file {}", path.display()))?;
        let config = Self::from_yaml(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        // serde_yaml reads an empty document as unit, not as an empty map
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Replace the data directory when an override is present and non-empty
    pub fn with_data_dir_override(mut self, data_dir: Option<OsString>) -> Self {
        if let Some(dir) = data_dir.filter(|dir| !dir.is_empty()) {
            debug!("Data directory overridden: {}", Path::new(&dir).display());
            self.data_directory = PathBuf::from(dir);
        }
        self
    }
}
