//! # Student Records Backend
//!
//! In-memory record lists for students, attendance, clubs and club
//! memberships, mirrored to CSV files in a data directory.
//!
//! [`Backend`] wires the lists to their repositories. The domain functions in
//! [`domain`] operate on the lists directly and never touch storage.

use anyhow::Result;
use log::info;
use serde::Serialize;
use shared::{AttendanceRecord, Club, ClubMembership, Student};
use std::path::PathBuf;
use thiserror::Error;

pub mod config;
pub mod domain;
pub mod storage;

use config::AppConfig;
use domain::{AttendanceList, ClubList, MembershipList, Record, RecordList, StudentList};
use storage::csv::{
    AttendanceRepository, ClubRepository, CsvConnection, CsvRecord, CsvRepository, MembershipRepository,
    StudentRepository,
};
use storage::{LoadOutcome, RecordStorage};

/// Load result of a single data file
#[derive(Debug, Clone, Serialize)]
pub struct FileLoadReport {
    pub file_name: &'static str,
    pub path: PathBuf,
    #[serde(flatten)]
    pub outcome: LoadOutcome,
}

/// Load results of every data file, in load order
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadReport {
    pub files: Vec<FileLoadReport>,
}

impl LoadReport {
    pub fn total_loaded(&self) -> usize {
        self.files.iter().map(|file| file.outcome.loaded).sum()
    }

    pub fn total_skipped(&self) -> usize {
        self.files.iter().map(|file| file.outcome.skipped_count()).sum()
    }

    pub fn is_clean(&self) -> bool {
        self.files.iter().all(|file| file.outcome.is_clean())
    }

    /// Lines of `file_name` that could not be loaded
    pub fn skipped_in(&self, file_name: &str) -> usize {
        self.files
            .iter()
            .filter(|file| file.file_name == file_name)
            .map(|file| file.outcome.skipped_count())
            .sum()
    }
}

/// Saving would overwrite lines that were skipped when the file was loaded
#[derive(Debug, Error, Clone, PartialEq)]
#[error("{file_name} has {skipped} unreadable lines that saving would delete")]
pub struct UnsafeOverwrite {
    pub file_name: &'static str,
    pub skipped: usize,
}

/// Main backend struct owning every record list and its repository
pub struct Backend {
    pub config: AppConfig,
    pub connection: CsvConnection,
    pub students: StudentList,
    pub attendance: AttendanceList,
    pub clubs: ClubList,
    pub memberships: MembershipList,
    student_repository: StudentRepository,
    attendance_repository: AttendanceRepository,
    club_repository: ClubRepository,
    membership_repository: MembershipRepository,
    last_load: LoadReport,
    discard_skipped: bool,
}

impl Backend {
    /// Create a backend with empty lists, creating the data directory if needed
    pub fn new(config: AppConfig) -> Result<Self> {
        let connection = CsvConnection::new(&config.data_directory)?;
        let capacity = config.initial_capacity;

        Ok(Self {
            students: RecordList::with_capacity(capacity),
            attendance: RecordList::with_capacity(capacity),
            clubs: RecordList::with_capacity(capacity),
            memberships: RecordList::with_capacity(capacity),
            student_repository: StudentRepository::new(&connection),
            attendance_repository: AttendanceRepository::new(&connection),
            club_repository: ClubRepository::new(&connection),
            membership_repository: MembershipRepository::new(&connection),
            connection,
            config,
            last_load: LoadReport::default(),
            discard_skipped: false,
        })
    }

    /// Create a backend and fill every list from its data file.
    ///
    /// Missing files are created empty first.
    pub fn open(config: AppConfig) -> Result<(Self, LoadReport)> {
        let mut backend = Self::new(config)?;
        let report = backend.load_all()?;
        Ok((backend, report))
    }

    /// Reload every list from disk.
    ///
    /// Malformed lines are reported, not fatal. Unreadable files are errors.
    pub fn load_all(&mut self) -> Result<LoadReport> {
        let files = vec![
            load_file(&self.connection, &self.student_repository, &mut self.students)?,
            load_file(&self.connection, &self.attendance_repository, &mut self.attendance)?,
            load_file(&self.connection, &self.club_repository, &mut self.clubs)?,
            load_file(&self.connection, &self.membership_repository, &mut self.memberships)?,
        ];
        let report = LoadReport { files };

        info!(
            "Loaded {} records from {} ({} lines skipped)",
            report.total_loaded(),
            self.connection.base_directory().display(),
            report.total_skipped()
        );
        self.last_load = report.clone();
        Ok(report)
    }

    /// Let later saves overwrite files whose last load skipped lines.
    ///
    /// Without this, such saves fail with [`UnsafeOverwrite`].
    pub fn discard_skipped_lines(&mut self) {
        self.discard_skipped = true;
    }

    fn check_overwrite(&self, file_name: &'static str) -> Result<(), UnsafeOverwrite> {
        let skipped = self.last_load.skipped_in(file_name);
        if skipped > 0 && !self.discard_skipped {
            return Err(UnsafeOverwrite { file_name, skipped });
        }
        Ok(())
    }

    pub fn save_students(&self) -> Result<()> {
        self.check_overwrite(Student::FILE_NAME)?;
        self.student_repository.save(&self.students)
    }

    pub fn save_attendance(&self) -> Result<()> {
        self.check_overwrite(AttendanceRecord::FILE_NAME)?;
        self.attendance_repository.save(&self.attendance)
    }

    pub fn save_clubs(&self) -> Result<()> {
        self.check_overwrite(Club::FILE_NAME)?;
        self.club_repository.save(&self.clubs)
    }

    pub fn save_memberships(&self) -> Result<()> {
        self.check_overwrite(ClubMembership::FILE_NAME)?;
        self.membership_repository.save(&self.memberships)
    }

    pub fn save_all(&self) -> Result<()> {
        self.save_students()?;
        self.save_attendance()?;
        self.save_clubs()?;
        self.save_memberships()
    }
}

fn load_file<T: CsvRecord + Record>(
    connection: &CsvConnection,
    repository: &CsvRepository<T>,
    list: &mut RecordList<T>,
) -> Result<FileLoadReport> {
    let path = connection.ensure_file_exists(T::FILE_NAME)?;
    let outcome = repository.load(list)?;
    Ok(FileLoadReport {
        file_name: T::FILE_NAME,
        path,
        outcome,
    })
}
