//! # CSV Student Records
//!
//! Line layout of `students.csv` (12 fields):
//!
//! ```text
//! id,first_name,last_name,email,phone,address,age,course,year,gpa,enrollment_date,is_active
//! 1,Ann,Lee,ann.lee@school.edu,555-0100,12 Elm Street,20,Computer Science,2,3.50,1693526400,1
//! ```

use csv::StringRecord;
use shared::Student;

use super::codec::{format_flag, format_float, format_timestamp, CsvRecord, FieldError, FieldReader};
use super::record_repository::CsvRepository;

pub type StudentRepository = CsvRepository<Student>;

impl CsvRecord for Student {
    const FILE_NAME: &'static str = "students.csv";
    const FIELD_COUNT: usize = 12;

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.first_name.clone(),
            self.last_name.clone(),
            self.email.clone(),
            self.phone.clone(),
            self.address.clone(),
            self.age.to_string(),
            self.course.clone(),
            self.year.to_string(),
            format_float(self.gpa),
            format_timestamp(&self.enrollment_date),
            format_flag(self.is_active),
        ]
    }

    fn from_fields(record: &StringRecord) -> Result<Self, FieldError> {
        let mut fields = FieldReader::new(record, Self::FIELD_COUNT)?;
        Ok(Student {
            id: fields.int("id")?,
            first_name: fields.text(),
            last_name: fields.text(),
            email: fields.text(),
            phone: fields.text(),
            address: fields.text(),
            age: fields.int("age")?,
            course: fields.text(),
            year: fields.int("year")?,
            gpa: fields.float("gpa")?,
            enrollment_date: fields.timestamp("enrollment_date")?,
            is_active: fields.flag("is_active")?,
        })
    }
}
