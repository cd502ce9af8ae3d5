//! # Storage Traits
//!
//! Storage abstraction used by the application layer, so the record lists
//! can be mirrored to any backend without the domain knowing about files.

use anyhow::Result;
use serde::Serialize;

use crate::domain::{Record, RecordList};

/// A persisted line that could not be turned into a record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedLine {
    /// 1-based line number in the source file
    pub line_number: u64,
    /// Line content as found in the file
    pub raw: String,
    pub reason: String,
}

/// Result of a bulk load.
///
/// A load that recovers 9 of 10 lines still succeeds, reporting
/// `loaded == 9` and one skipped line.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadOutcome {
    pub loaded: usize,
    pub skipped: Vec<SkippedLine>,
}

impl LoadOutcome {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// True when every non-blank line produced a record
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Trait defining how a record list is mirrored to persistent storage
pub trait RecordStorage<T: Record> {
    /// Write every live record, replacing whatever was stored before
    fn save(&self, list: &RecordList<T>) -> Result<()>;

    /// Replace the list's content with the stored records.
    ///
    /// Malformed entries are reported in the outcome, not treated as errors.
    /// The list is left untouched when the storage cannot be read at all.
    fn load(&self, list: &mut RecordList<T>) -> Result<LoadOutcome>;
}
