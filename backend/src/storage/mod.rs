//! # Storage Module
//!
//! Handles persistence of the record lists.
//!
//! The domain never touches files; it hands a [`RecordList`](crate::domain::RecordList)
//! to a [`RecordStorage`] implementation and gets a [`LoadOutcome`] back.
//! CSV files are the only backend today.

pub mod csv;
pub mod traits;

pub use traits::{LoadOutcome, RecordStorage, SkippedLine};
