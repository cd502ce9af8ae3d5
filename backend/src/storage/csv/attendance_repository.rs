//! # CSV Attendance Records
//!
//! Line layout of `attendance.csv` (8 fields). `status` is the integer code
//! (0 absent, 1 present, 2 late, 3 excused):
//!
//! ```text
//! id,student_id,course_id,date,status,reason,teacher_id,recorded_time
//! 1,7,101,1725235200,3,Doctor appointment,900,1725267600
//! ```

use csv::StringRecord;
use shared::{AttendanceRecord, AttendanceStatus};

use super::codec::{format_timestamp, CsvRecord, FieldError, FieldReader};
use super::record_repository::CsvRepository;

pub type AttendanceRepository = CsvRepository<AttendanceRecord>;

impl CsvRecord for AttendanceRecord {
    const FILE_NAME: &'static str = "attendance.csv";
    const FIELD_COUNT: usize = 8;

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.student_id.to_string(),
            self.course_id.to_string(),
            format_timestamp(&self.date),
            self.status.code().to_string(),
            self.reason.clone(),
            self.teacher_id.to_string(),
            format_timestamp(&self.recorded_time),
        ]
    }

    fn from_fields(record: &StringRecord) -> Result<Self, FieldError> {
        let mut fields = FieldReader::new(record, Self::FIELD_COUNT)?;
        Ok(AttendanceRecord {
            id: fields.int("id")?,
            student_id: fields.int("student_id")?,
            course_id: fields.int("course_id")?,
            date: fields.timestamp("date")?,
            status: fields.parse::<AttendanceStatus>("status")?,
            reason: fields.text(),
            teacher_id: fields.int("teacher_id")?,
            recorded_time: fields.timestamp("recorded_time")?,
        })
    }
}
