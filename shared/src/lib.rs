use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A student enrolled in a course.
///
/// The `id` is assigned by the caller; lists never check it for uniqueness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub age: i32,
    /// Course name the student is enrolled in
    pub course: String,
    /// Year of study (1-based)
    pub year: i32,
    /// Grade point average, persisted with two decimals
    pub gpa: f64,
    /// Enrollment timestamp, persisted with second precision
    pub enrollment_date: DateTime<Utc>,
    pub is_active: bool,
}

impl Student {
    /// "First Last" display name
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Attendance mark for one student in one course on one day.
///
/// Discriminants match the integer codes used in the persisted file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AttendanceStatus {
    Absent = 0,
    Present = 1,
    Late = 2,
    Excused = 3,
}

impl AttendanceStatus {
    pub const ALL: [AttendanceStatus; 4] = [
        AttendanceStatus::Absent,
        AttendanceStatus::Present,
        AttendanceStatus::Late,
        AttendanceStatus::Excused,
    ];

    /// Integer code as stored on disk
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Map a stored integer code back to a status
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(AttendanceStatus::Absent),
            1 => Some(AttendanceStatus::Present),
            2 => Some(AttendanceStatus::Late),
            3 => Some(AttendanceStatus::Excused),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AttendanceStatus::Absent => "Absent",
            AttendanceStatus::Present => "Present",
            AttendanceStatus::Late => "Late",
            AttendanceStatus::Excused => "Excused",
        }
    }

    pub fn is_present(self) -> bool {
        self == AttendanceStatus::Present
    }

    pub fn is_absent(self) -> bool {
        self == AttendanceStatus::Absent
    }

    pub fn is_late(self) -> bool {
        self == AttendanceStatus::Late
    }

    pub fn is_excused(self) -> bool {
        self == AttendanceStatus::Excused
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a status name or code is not recognised
#[derive(Debug, Clone, PartialEq)]
pub struct ParseAttendanceStatusError(pub String);

impl fmt::Display for ParseAttendanceStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown attendance status: {}", self.0)
    }
}

impl std::error::Error for ParseAttendanceStatusError {}

impl FromStr for AttendanceStatus {
    type Err = ParseAttendanceStatusError;

    /// Accepts either the status name (case-insensitive) or its integer code
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(code) = trimmed.parse::<i32>() {
            return AttendanceStatus::from_code(code)
                .ok_or_else(|| ParseAttendanceStatusError(s.to_string()));
        }
        AttendanceStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseAttendanceStatusError(s.to_string()))
    }
}

/// One attendance mark
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: i32,
    pub student_id: i32,
    pub course_id: i32,
    /// Day of the class
    pub date: DateTime<Utc>,
    pub status: AttendanceStatus,
    /// Free-text reason, usually set for excused absences
    pub reason: String,
    pub teacher_id: i32,
    /// When the mark was entered
    pub recorded_time: DateTime<Utc>,
}

/// Well-known club categories
pub const CLUB_CATEGORIES: [&str; 8] = [
    "Academic",
    "Sports",
    "Arts",
    "Service",
    "Cultural",
    "Technology",
    "Social",
    "Religious",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Club {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub category: String,
    pub president_id: i32,
    pub advisor_id: i32,
    /// Cached count of active memberships
    pub member_count: i32,
    pub max_members: i32,
    pub founded_date: DateTime<Utc>,
    pub last_meeting: DateTime<Utc>,
    pub meeting_day: String,
    pub meeting_time: String,
    pub meeting_location: String,
    pub budget: f64,
    pub is_active: bool,
}

/// Role a student holds inside a club
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClubRole {
    Member,
    Secretary,
    Treasurer,
    VicePresident,
    President,
}

impl ClubRole {
    pub const ALL: [ClubRole; 5] = [
        ClubRole::Member,
        ClubRole::Secretary,
        ClubRole::Treasurer,
        ClubRole::VicePresident,
        ClubRole::President,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ClubRole::Member => "Member",
            ClubRole::Secretary => "Secretary",
            ClubRole::Treasurer => "Treasurer",
            ClubRole::VicePresident => "Vice President",
            ClubRole::President => "President",
        }
    }
}

impl fmt::Display for ClubRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseClubRoleError(pub String);

impl fmt::Display for ParseClubRoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown club role: {}", self.0)
    }
}

impl std::error::Error for ParseClubRoleError {}

impl FromStr for ClubRole {
    type Err = ParseClubRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        ClubRole::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseClubRoleError(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClubMembership {
    pub id: i32,
    pub student_id: i32,
    pub club_id: i32,
    pub join_date: DateTime<Utc>,
    pub role: ClubRole,
    /// Memberships are deactivated rather than deleted when a student leaves
    pub is_active: bool,
}

/// How a student (or a whole course) is doing on attendance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttendanceStanding {
    Good,
    /// Below the warning threshold
    Warning,
    /// Below the critical threshold or too many absences in a row
    Critical,
}

/// Attendance aggregates for a (student, course) pair or a whole course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceStats {
    /// `None` when the stats cover every student of the course
    pub student_id: Option<i32>,
    pub course_id: i32,
    pub total_days: usize,
    pub present_days: usize,
    pub absent_days: usize,
    pub late_days: usize,
    pub excused_days: usize,
    /// Fraction in `0.0..=1.0`
    pub attendance_percentage: f64,
    /// Longest run of absences in date order
    pub consecutive_absences: usize,
    /// Longest run of presences in date order
    pub consecutive_presents: usize,
    pub standing: AttendanceStanding,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClubStatistics {
    pub total_clubs: usize,
    pub active_clubs: usize,
    pub total_memberships: usize,
    pub active_memberships: usize,
    pub average_members_per_club: f64,
    pub most_popular_club_id: Option<i32>,
    pub least_popular_club_id: Option<i32>,
    pub most_common_category: Option<String>,
}

/// One club a student belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentClub {
    pub club_id: i32,
    /// Empty when the membership points at a club that no longer exists
    pub club_name: String,
    pub role: ClubRole,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentClubInfo {
    pub student_id: i32,
    pub clubs: Vec<StudentClub>,
}

impl StudentClubInfo {
    pub fn club_count(&self) -> usize {
        self.clubs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attendance_status_codes() {
        for status in AttendanceStatus::ALL {
            assert_eq!(AttendanceStatus::from_code(status.code()), Some(status));
        }
        assert_eq!(AttendanceStatus::from_code(4), None);
        assert_eq!(AttendanceStatus::from_code(-1), None);
    }

    #[test]
    fn test_attendance_status_from_str() {
        assert_eq!("present".parse::<AttendanceStatus>(), Ok(AttendanceStatus::Present));
        assert_eq!("EXCUSED".parse::<AttendanceStatus>(), Ok(AttendanceStatus::Excused));
        assert_eq!("2".parse::<AttendanceStatus>(), Ok(AttendanceStatus::Late));
        assert!("sick".parse::<AttendanceStatus>().is_err());
        assert!("7".parse::<AttendanceStatus>().is_err());
    }

    #[test]
    fn test_club_role_from_str() {
        assert_eq!("vice president".parse::<ClubRole>(), Ok(ClubRole::VicePresident));
        assert_eq!(" Member ".parse::<ClubRole>(), Ok(ClubRole::Member));
        assert!("Captain".parse::<ClubRole>().is_err());
        assert_eq!(ClubRole::VicePresident.to_string(), "Vice President");
    }

    #[test]
    fn test_stats_serialize_to_json() {
        let stats = AttendanceStats {
            student_id: Some(7),
            course_id: 101,
            total_days: 4,
            present_days: 3,
            absent_days: 1,
            late_days: 0,
            excused_days: 0,
            attendance_percentage: 0.75,
            consecutive_absences: 1,
            consecutive_presents: 2,
            standing: AttendanceStanding::Warning,
        };

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["student_id"], 7);
        assert_eq!(json["standing"], "Warning");
    }
}
