//! Attendance domain logic.
//!
//! Lookups, orderings and marking operations for attendance records. All
//! operations act on a caller-owned [`AttendanceList`]; nothing here touches
//! the filesystem.
//!
//! ## Business Rules
//!
//! - A student has at most one mark per course per calendar day (UTC);
//!   marking again updates the existing record
//! - New records get the next free id (highest id + 1)
//! - Excusing an absence requires a reason

use chrono::{DateTime, Utc};
use log::{debug, info};
use shared::{AttendanceRecord, AttendanceStatus};
use thiserror::Error;

use super::commands::attendance::{MarkAttendanceCommand, MarkClassAttendanceCommand};
use super::record_list::{ListError, Record, RecordList};

pub type AttendanceList = RecordList<AttendanceRecord>;

impl Record for AttendanceRecord {
    fn id(&self) -> i32 {
        self.id
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AttendanceError {
    #[error(transparent)]
    List(#[from] ListError),
    #[error("A reason is required to excuse an absence")]
    EmptyReason,
}

fn same_day(a: &DateTime<Utc>, b: &DateTime<Utc>) -> bool {
    a.date_naive() == b.date_naive()
}

impl RecordList<AttendanceRecord> {
    /// First mark for the student on the calendar day of `date`
    pub fn find_by_student_date(&self, student_id: i32, date: DateTime<Utc>) -> Option<&AttendanceRecord> {
        self.find_first(|r| r.student_id == student_id && same_day(&r.date, &date))
    }

    /// First mark for the course on the calendar day of `date`
    pub fn find_by_course_date(&self, course_id: i32, date: DateTime<Utc>) -> Option<&AttendanceRecord> {
        self.find_first(|r| r.course_id == course_id && same_day(&r.date, &date))
    }

    fn find_mark_mut(
        &mut self,
        student_id: i32,
        course_id: i32,
        date: DateTime<Utc>,
    ) -> Option<&mut AttendanceRecord> {
        self.find_first_mut(|r| {
            r.student_id == student_id && r.course_id == course_id && same_day(&r.date, &date)
        })
    }

    pub fn sort_by_student(&mut self) {
        self.sort_by(|a, b| a.student_id.cmp(&b.student_id));
    }

    pub fn sort_by_course(&mut self) {
        self.sort_by(|a, b| a.course_id.cmp(&b.course_id));
    }

    /// Oldest first. Required before computing consecutive-day statistics.
    pub fn sort_by_date(&mut self) {
        self.sort_by(|a, b| a.date.cmp(&b.date));
    }

    /// By status code: absent, present, late, excused
    pub fn sort_by_status(&mut self) {
        self.sort_by(|a, b| a.status.cmp(&b.status));
    }

    /// Mark a student's attendance, returning the id of the record written.
    ///
    /// An existing mark for the same student, course and day is updated in
    /// place instead of adding a duplicate.
    pub fn mark_attendance(&mut self, command: MarkAttendanceCommand) -> Result<i32, AttendanceError> {
        let now = Utc::now();

        if let Some(existing) = self.find_mark_mut(command.student_id, command.course_id, command.date) {
            debug!(
                "Updating existing mark {} for student {} in course {}",
                existing.id, command.student_id, command.course_id
            );
            existing.status = command.status;
            if !command.status.is_excused() {
                existing.reason.clear();
            }
            existing.teacher_id = command.teacher_id;
            existing.recorded_time = now;
            return Ok(existing.id);
        }

        let id = self.next_id()?;
        self.add(AttendanceRecord {
            id,
            student_id: command.student_id,
            course_id: command.course_id,
            date: command.date,
            status: command.status,
            reason: String::new(),
            teacher_id: command.teacher_id,
            recorded_time: now,
        })?;
        Ok(id)
    }

    /// Change the status (and optionally the reason) of an existing record
    pub fn update_attendance(
        &mut self,
        record_id: i32,
        status: AttendanceStatus,
        reason: Option<&str>,
    ) -> Result<(), AttendanceError> {
        let record = self
            .find_by_id_mut(record_id)
            .ok_or(ListError::NotFound(record_id))?;
        record.status = status;
        if let Some(reason) = reason {
            record.reason = reason.trim().to_string();
        }
        record.recorded_time = Utc::now();
        Ok(())
    }

    pub fn excuse_absence(&mut self, record_id: i32, reason: &str) -> Result<(), AttendanceError> {
        if reason.trim().is_empty() {
            return Err(AttendanceError::EmptyReason);
        }
        self.update_attendance(record_id, AttendanceStatus::Excused, Some(reason))
    }

    /// Every mark of the course on the calendar day of `date`
    pub fn attendance_for_date(&self, course_id: i32, date: DateTime<Utc>) -> Vec<&AttendanceRecord> {
        self.filter(move |r| r.course_id == course_id && same_day(&r.date, &date))
            .collect()
    }

    /// Mark a whole class. Stops at the first failure; marks already applied stay.
    pub fn mark_class_attendance(&mut self, command: MarkClassAttendanceCommand) -> Result<usize, AttendanceError> {
        let mut marked = 0;
        for (student_id, status) in &command.marks {
            self.mark_attendance(MarkAttendanceCommand {
                student_id: *student_id,
                course_id: command.course_id,
                date: command.date,
                status: *status,
                teacher_id: command.teacher_id,
            })?;
            marked += 1;
        }
        info!(
            "Marked attendance for {} students in course {}",
            marked, command.course_id
        );
        Ok(marked)
    }

    /// Students marked absent in the course on that day, in list order
    pub fn identify_absent_students(&self, course_id: i32, date: DateTime<Utc>) -> Vec<i32> {
        self.attendance_for_date(course_id, date)
            .into_iter()
            .filter(|r| r.status.is_absent())
            .map(|r| r.student_id)
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    pub(crate) fn day(n: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 2, 0, 0, 0).unwrap() + Duration::days(n)
    }

    pub(crate) fn record(id: i32, student_id: i32, course_id: i32, date: DateTime<Utc>, status: AttendanceStatus) -> AttendanceRecord {
        AttendanceRecord {
            id,
            student_id,
            course_id,
            date,
            status,
            reason: String::new(),
            teacher_id: 900,
            recorded_time: date + Duration::hours(9),
        }
    }

    fn mark(student_id: i32, course_id: i32, date: DateTime<Utc>, status: AttendanceStatus) -> MarkAttendanceCommand {
        MarkAttendanceCommand {
            student_id,
            course_id,
            date,
            status,
            teacher_id: 900,
        }
    }

    #[test]
    fn test_mark_attendance_assigns_next_id() {
        let mut list = AttendanceList::new();
        let first = list.mark_attendance(mark(1, 101, day(0), AttendanceStatus::Present)).unwrap();
        let second = list.mark_attendance(mark(2, 101, day(0), AttendanceStatus::Absent)).unwrap();

        assert_eq!(first, 1);
        assert_eq!(second, 2);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_mark_attendance_twice_same_day_updates() {
        let mut list = AttendanceList::new();
        let id = list.mark_attendance(mark(1, 101, day(0), AttendanceStatus::Absent)).unwrap();
        let later_same_day = day(0) + Duration::hours(3);
        let again = list.mark_attendance(mark(1, 101, later_same_day, AttendanceStatus::Late)).unwrap();

        assert_eq!(id, again);
        assert_eq!(list.len(), 1);
        assert_eq!(list.find_by_id(id).unwrap().status, AttendanceStatus::Late);
    }

    #[test]
    fn test_remarking_excused_day_drops_reason() {
        let mut list = AttendanceList::new();
        let id = list.mark_attendance(mark(1, 101, day(0), AttendanceStatus::Absent)).unwrap();
        list.excuse_absence(id, "Doctor appointment").unwrap();

        list.mark_attendance(mark(1, 101, day(0), AttendanceStatus::Excused)).unwrap();
        assert_eq!(list.find_by_id(id).unwrap().reason, "Doctor appointment");

        list.mark_attendance(mark(1, 101, day(0), AttendanceStatus::Present)).unwrap();
        let updated = list.find_by_id(id).unwrap();
        assert_eq!(updated.status, AttendanceStatus::Present);
        assert_eq!(updated.reason, "");
    }

    #[test]
    fn test_mark_attendance_on_full_list_fails() {
        let mut list = AttendanceList::with_capacity(1);
        list.mark_attendance(mark(1, 101, day(0), AttendanceStatus::Present)).unwrap();

        let err = list.mark_attendance(mark(2, 101, day(0), AttendanceStatus::Present)).unwrap_err();
        assert_eq!(err, AttendanceError::List(ListError::CapacityExceeded { capacity: 1 }));
    }

    #[test]
    fn test_mark_attendance_never_reuses_max_id() {
        let mut list = AttendanceList::new();
        list.add(record(i32::MAX, 1, 101, day(0), AttendanceStatus::Present)).unwrap();

        let err = list.mark_attendance(mark(2, 101, day(0), AttendanceStatus::Present)).unwrap_err();
        assert_eq!(err, AttendanceError::List(ListError::IdsExhausted(i32::MAX)));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_excuse_absence() {
        let mut list = AttendanceList::new();
        list.add(record(5, 1, 101, day(0), AttendanceStatus::Absent)).unwrap();

        assert_eq!(list.excuse_absence(5, "   "), Err(AttendanceError::EmptyReason));
        list.excuse_absence(5, "Doctor appointment").unwrap();

        let updated = list.find_by_id(5).unwrap();
        assert_eq!(updated.status, AttendanceStatus::Excused);
        assert_eq!(updated.reason, "Doctor appointment");

        assert_eq!(
            list.excuse_absence(6, "Sick"),
            Err(AttendanceError::List(ListError::NotFound(6)))
        );
    }

    #[test]
    fn test_find_by_student_and_course_date() {
        let mut list = AttendanceList::new();
        list.add(record(1, 1, 101, day(0), AttendanceStatus::Present)).unwrap();
        list.add(record(2, 1, 102, day(1), AttendanceStatus::Absent)).unwrap();

        assert_eq!(list.find_by_student_date(1, day(1)).unwrap().id, 2);
        assert_eq!(list.find_by_course_date(101, day(0) + Duration::hours(5)).unwrap().id, 1);
        assert!(list.find_by_course_date(101, day(1)).is_none());
    }

    #[test]
    fn test_mark_class_and_identify_absent() {
        let mut list = AttendanceList::new();
        let marked = list
            .mark_class_attendance(MarkClassAttendanceCommand {
                course_id: 101,
                date: day(3),
                teacher_id: 900,
                marks: vec![
                    (1, AttendanceStatus::Present),
                    (2, AttendanceStatus::Absent),
                    (3, AttendanceStatus::Absent),
                    (4, AttendanceStatus::Late),
                ],
            })
            .unwrap();

        assert_eq!(marked, 4);
        assert_eq!(list.attendance_for_date(101, day(3)).len(), 4);
        assert_eq!(list.identify_absent_students(101, day(3)), vec![2, 3]);
        assert!(list.identify_absent_students(101, day(4)).is_empty());
    }

    #[test]
    fn test_sort_by_date_and_status() {
        let mut list = AttendanceList::new();
        list.add(record(1, 1, 101, day(2), AttendanceStatus::Late)).unwrap();
        list.add(record(2, 1, 101, day(0), AttendanceStatus::Excused)).unwrap();
        list.add(record(3, 1, 101, day(1), AttendanceStatus::Absent)).unwrap();

        list.sort_by_date();
        let ids: Vec<i32> = list.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);

        list.sort_by_status();
        let statuses: Vec<AttendanceStatus> = list.iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            vec![AttendanceStatus::Absent, AttendanceStatus::Late, AttendanceStatus::Excused]
        );
    }
}
