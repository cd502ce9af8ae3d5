//! # CSV Club Records
//!
//! Line layout of `clubs.csv` (15 fields):
//!
//! ```text
//! id,name,description,category,president_id,advisor_id,member_count,max_members,
//! founded_date,last_meeting,meeting_day,meeting_time,meeting_location,budget,is_active
//! ```

use csv::StringRecord;
use shared::Club;

use super::codec::{format_flag, format_float, format_timestamp, CsvRecord, FieldError, FieldReader};
use super::record_repository::CsvRepository;

pub type ClubRepository = CsvRepository<Club>;

impl CsvRecord for Club {
    const FILE_NAME: &'static str = "clubs.csv";
    const FIELD_COUNT: usize = 15;

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.description.clone(),
            self.category.clone(),
            self.president_id.to_string(),
            self.advisor_id.to_string(),
            self.member_count.to_string(),
            self.max_members.to_string(),
            format_timestamp(&self.founded_date),
            format_timestamp(&self.last_meeting),
            self.meeting_day.clone(),
            self.meeting_time.clone(),
            self.meeting_location.clone(),
            format_float(self.budget),
            format_flag(self.is_active),
        ]
    }

    fn from_fields(record: &StringRecord) -> Result<Self, FieldError> {
        let mut fields = FieldReader::new(record, Self::FIELD_COUNT)?;
        Ok(Club {
            id: fields.int("id")?,
            name: fields.text(),
            description: fields.text(),
            category: fields.text(),
            president_id: fields.int("president_id")?,
            advisor_id: fields.int("advisor_id")?,
            member_count: fields.int("member_count")?,
            max_members: fields.int("max_members")?,
            founded_date: fields.timestamp("founded_date")?,
            last_meeting: fields.timestamp("last_meeting")?,
            meeting_day: fields.text(),
            meeting_time: fields.text(),
            meeting_location: fields.text(),
            budget: fields.float("budget")?,
            is_active: fields.flag("is_active")?,
        })
    }
}
