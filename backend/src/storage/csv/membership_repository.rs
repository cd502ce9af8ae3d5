//! # CSV Club Membership Records
//!
//! Line layout of `memberships.csv` (6 fields). `role` is stored by name:
//!
//! ```text
//! id,student_id,club_id,join_date,role,is_active
//! 1,7,3,1725235200,Vice President,1
//! ```

use csv::StringRecord;
use shared::{ClubMembership, ClubRole};

use super::codec::{format_flag, format_timestamp, CsvRecord, FieldError, FieldReader};
use super::record_repository::CsvRepository;

pub type MembershipRepository = CsvRepository<ClubMembership>;

impl CsvRecord for ClubMembership {
    const FILE_NAME: &'static str = "memberships.csv";
    const FIELD_COUNT: usize = 6;

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.student_id.to_string(),
            self.club_id.to_string(),
            format_timestamp(&self.join_date),
            self.role.as_str().to_string(),
            format_flag(self.is_active),
        ]
    }

    fn from_fields(record: &StringRecord) -> Result<Self, FieldError> {
        let mut fields = FieldReader::new(record, Self::FIELD_COUNT)?;
        Ok(ClubMembership {
            id: fields.int("id")?,
            student_id: fields.int("student_id")?,
            club_id: fields.int("club_id")?,
            join_date: fields.timestamp("join_date")?,
            role: fields.parse::<ClubRole>("role")?,
            is_active: fields.flag("is_active")?,
        })
    }
}
