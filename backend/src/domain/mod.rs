//! # Domain Module
//!
//! Business logic for the student records application.
//!
//! Every entity lives in its own [`RecordList`]: a capacity-bounded, ordered
//! list with linear-scan lookups. Entity modules add their own finders, sort
//! orders and operations on top of it. Statistics are pure functions over a
//! list snapshot.
//!
//! ## Module Organization
//!
//! - **record_list**: the generic list container shared by every entity
//! - **student_list**: student lookups and sort orders
//! - **attendance_service**: marking, excusing and querying attendance
//! - **attendance_stats**: attendance percentages, streaks and standing
//! - **club_service**: clubs, memberships and the joining rules
//! - **club_stats**: club popularity and per-student club summaries
//! - **commands**: inputs for multi-argument operations
//!
//! ## Design Principles
//!
//! - **Storage Agnostic**: nothing here reads or writes files
//! - **Single Owner**: lists are plain values with no internal locking;
//!   callers that share them must serialize access themselves
//! - **Relations by Id**: records reference each other by id only, without
//!   referential-integrity checks

pub mod record_list;
pub mod student_list;
pub mod attendance_service;
pub mod attendance_stats;
pub mod club_service;
pub mod club_stats;
pub mod commands;

pub use record_list::*;
pub use student_list::*;
pub use attendance_service::*;
pub use attendance_stats::*;
pub use club_service::*;
pub use club_stats::*;
