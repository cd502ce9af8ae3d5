//! Domain-level command types.
//!
//! These are the inputs the services accept for operations that need more
//! than one or two arguments. The CLI builds them from its arguments.

pub mod attendance {
    use chrono::{DateTime, Utc};
    use shared::AttendanceStatus;

    /// Input for marking a single student's attendance.
    #[derive(Debug, Clone)]
    pub struct MarkAttendanceCommand {
        pub student_id: i32,
        pub course_id: i32,
        pub date: DateTime<Utc>,
        pub status: AttendanceStatus,
        pub teacher_id: i32,
    }

    /// Input for marking a whole class in one go.
    #[derive(Debug, Clone)]
    pub struct MarkClassAttendanceCommand {
        pub course_id: i32,
        pub date: DateTime<Utc>,
        pub teacher_id: i32,
        /// (student id, status) pairs, applied in order
        pub marks: Vec<(i32, AttendanceStatus)>,
    }
}

pub mod club {
    use shared::ClubRole;

    /// Input for adding a student to a club.
    #[derive(Debug, Clone)]
    pub struct JoinClubCommand {
        pub student_id: i32,
        pub club_id: i32,
        pub role: ClubRole,
    }
}
