//! # CSV Record Repository
//!
//! Generic file-backed storage for any [`CsvRecord`] type. Each entity is
//! stored in its own file inside the data directory.
//!
//! ## File Structure
//!
//! ```text
//! data/
//! ├── students.csv
//! ├── attendance.csv
//! ├── clubs.csv
//! └── memberships.csv
//! ```
//!
//! ## Format
//!
//! One record per line, comma-delimited, no header line. Fields that
//! contain a comma, quote or line break are quoted; everything else is
//! written bare, so ordinary data stays byte-compatible with the legacy
//! layout.
//!
//! ## Features
//!
//! - Atomic saves through a temp file and rename
//! - Partial-success loads: malformed lines are reported with their line
//!   number and reason while the remaining lines still load
//! - Blank lines are ignored

use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord, Terminator, WriterBuilder};
use log::{debug, info, warn};
use std::fs::{self, File};
use std::io::BufWriter;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use super::codec::CsvRecord;
use super::connection::CsvConnection;
use crate::domain::RecordList;
use crate::storage::traits::{LoadOutcome, RecordStorage, SkippedLine};

/// CSV-based repository for one record type
#[derive(Debug, Clone)]
pub struct CsvRepository<T> {
    path: PathBuf,
    _record: PhantomData<fn() -> T>,
}

/// First physical line starting at `start`
fn raw_line(content: &str, start: usize) -> String {
    content
        .get(start..)
        .and_then(|rest| rest.lines().next())
        .unwrap_or("")
        .to_string()
}

fn byte_index(byte: u64) -> usize {
    usize::try_from(byte).unwrap_or(usize::MAX)
}

impl<T: CsvRecord> CsvRepository<T> {
    /// Repository for the entity's file inside the connection's data directory
    pub fn new(connection: &CsvConnection) -> Self {
        Self::at_path(connection.file_path(T::FILE_NAME))
    }

    /// Repository for an arbitrary file
    pub fn at_path<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            _record: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse every line of the file without touching any list.
    ///
    /// A record may only span several physical lines when it parses. A
    /// failing multi-line record is reported as its first line alone, and
    /// reading restarts on the line after it, so a stray quote cannot hide
    /// the lines that follow.
    fn read_records(&self) -> Result<(Vec<T>, Vec<SkippedLine>)> {
        let bytes = fs::read(&self.path)
            .with_context(|| format!("Could not open {} for reading", self.path.display()))?;
        let content = String::from_utf8_lossy(&bytes);

        let mut records = Vec::new();
        let mut skipped = Vec::new();
        // Where the current reader starts, and how many lines precede it
        let mut offset = 0;
        let mut lines_before = 0;

        'scan: loop {
            let rest = content.get(offset..).unwrap_or("");
            let mut reader = ReaderBuilder::new()
                .has_headers(false)
                .flexible(true)
                .from_reader(rest.as_bytes());
            let mut row = StringRecord::new();

            while reader
                .read_record(&mut row)
                .with_context(|| format!("Failed to read {}", self.path.display()))?
            {
                let (line, start) = row
                    .position()
                    .map_or((0, 0), |position| (position.line(), byte_index(position.byte())));
                let line_number = lines_before + line;

                let error = match T::from_fields(&row) {
                    Ok(record) => {
                        records.push(record);
                        continue;
                    }
                    Err(e) => e,
                };

                let skipped_line = SkippedLine {
                    line_number,
                    raw: raw_line(rest, start),
                    reason: error.to_string(),
                };
                warn!(
                    "Skipping line {} of {}: {}",
                    line_number,
                    self.path.display(),
                    skipped_line.reason
                );
                skipped.push(skipped_line);

                let next_line = rest
                    .get(start..)
                    .and_then(|tail| tail.find('\n'))
                    .map(|newline| start + newline + 1);
                if let Some(next_line) = next_line {
                    if byte_index(reader.position().byte()) > next_line {
                        debug!("Line {} opened an unterminated quote, rereading from the next line", line_number);
                        offset += next_line;
                        lines_before = line_number;
                        continue 'scan;
                    }
                }
            }

            break;
        }

        Ok((records, skipped))
    }

    fn write_records(&self, list: &RecordList<T>) -> Result<()> {
        let temp_path = self.path.with_extension("csv.tmp");

        // Write to temporary file first (atomic operation)
        {
            let file = File::create(&temp_path)
                .with_context(|| format!("Could not open {} for writing", self.path.display()))?;
            let mut writer = WriterBuilder::new()
                .has_headers(false)
                .terminator(Terminator::Any(b'\n'))
                .from_writer(BufWriter::new(file));

            for record in list {
                writer.write_record(&record.to_fields())?;
            }
            writer.flush()?;
        }

        fs::rename(&temp_path, &self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;
        Ok(())
    }
}

impl<T: CsvRecord> RecordStorage<T> for CsvRepository<T> {
    fn save(&self, list: &RecordList<T>) -> Result<()> {
        debug!("Saving {} records to {}", list.len(), self.path.display());
        self.write_records(list)?;
        info!("Saved {} records to {}", list.len(), self.path.display());
        Ok(())
    }

    fn load(&self, list: &mut RecordList<T>) -> Result<LoadOutcome> {
        debug!("Loading records from {}", self.path.display());
        let (records, skipped) = self.read_records()?;

        let outcome = LoadOutcome {
            loaded: records.len(),
            skipped,
        };
        list.replace_all(records);

        info!(
            "Loaded {} records from {} ({} skipped)",
            outcome.loaded,
            self.path.display(),
            outcome.skipped_count()
        );
        Ok(outcome)
    }
}
