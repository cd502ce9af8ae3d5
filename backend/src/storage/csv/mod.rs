//! # CSV Storage Module
//!
//! File-based persistence for the record lists. Each entity kind lives in
//! its own headerless file inside the data directory, one record per line:
//!
//! - `students.csv`
//! - `attendance.csv`
//! - `clubs.csv`
//! - `memberships.csv`
//!
//! Saves replace the whole file atomically. Loads keep every well-formed line
//! and report the rest instead of failing the whole file.

pub mod codec;
pub mod connection;
pub mod record_repository;
pub mod student_repository;
pub mod attendance_repository;
pub mod club_repository;
pub mod membership_repository;

#[cfg(test)]
pub mod test_utils;

pub use codec::{CsvRecord, FieldError};
pub use connection::CsvConnection;
pub use record_repository::CsvRepository;
pub use student_repository::StudentRepository;
pub use attendance_repository::AttendanceRepository;
pub use club_repository::ClubRepository;
pub use membership_repository::MembershipRepository;
