//! Student lookups and orderings on top of the generic record list.

use shared::Student;

use super::record_list::{Record, RecordList};

pub type StudentList = RecordList<Student>;

impl Record for Student {
    fn id(&self) -> i32 {
        self.id
    }
}

impl RecordList<Student> {
    /// First student with exactly this first and last name
    pub fn find_by_name(&self, first_name: &str, last_name: &str) -> Option<&Student> {
        self.find_first(|s| s.first_name == first_name && s.last_name == last_name)
    }

    /// First student with this email. Duplicate emails are shadowed by the earlier entry.
    pub fn find_by_email(&self, email: &str) -> Option<&Student> {
        self.find_first(|s| s.email == email)
    }

    /// Ascending by last name, then first name
    pub fn sort_by_name(&mut self) {
        self.sort_by(|a, b| {
            a.last_name
                .cmp(&b.last_name)
                .then_with(|| a.first_name.cmp(&b.first_name))
        });
    }

    /// Highest GPA first
    pub fn sort_by_gpa(&mut self) {
        self.sort_by(|a, b| b.gpa.total_cmp(&a.gpa));
    }

    pub fn sort_by_id(&mut self) {
        self.sort_by(|a, b| a.id.cmp(&b.id));
    }

    pub fn active_students(&self) -> impl Iterator<Item = &Student> {
        self.filter(|s| s.is_active)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::ListError;
    use chrono::{TimeZone, Utc};

    pub(crate) fn student(id: i32, first: &str, last: &str, gpa: f64) -> Student {
        Student {
            id,
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: format!("{}.{}@school.edu", first.to_lowercase(), last.to_lowercase()),
            phone: "555-0100".to_string(),
            address: "12 Elm Street".to_string(),
            age: 20,
            course: "Computer Science".to_string(),
            year: 2,
            gpa,
            enrollment_date: Utc.timestamp_opt(1_693_526_400, 0).unwrap(),
            is_active: true,
        }
    }

    fn names(list: &StudentList) -> Vec<String> {
        list.iter()
            .map(|s| format!("{}/{}", s.last_name, s.first_name))
            .collect()
    }

    #[test]
    fn test_sort_by_name_breaks_ties_on_first_name() {
        let mut list = StudentList::new();
        list.add(student(1, "Ann", "Lee", 3.0)).unwrap();
        list.add(student(2, "Bob", "Adams", 3.0)).unwrap();
        list.add(student(3, "Amy", "Lee", 3.0)).unwrap();

        list.sort_by_name();
        assert_eq!(names(&list), vec!["Adams/Bob", "Lee/Amy", "Lee/Ann"]);
    }

    #[test]
    fn test_sort_by_gpa_descending() {
        let mut list = StudentList::new();
        list.add(student(1, "A", "One", 2.50)).unwrap();
        list.add(student(2, "B", "Two", 3.75)).unwrap();
        list.add(student(3, "C", "Three", 3.00)).unwrap();

        list.sort_by_gpa();
        let ids: Vec<i32> = list.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_sorting_twice_matches_sorting_once() {
        let mut list = StudentList::new();
        list.add(student(5, "Eve", "Stone", 3.5)).unwrap();
        list.add(student(2, "Dan", "Stone", 3.5)).unwrap();
        list.add(student(9, "Cal", "Brook", 2.0)).unwrap();
        list.add(student(1, "Ada", "Brook", 4.0)).unwrap();

        for sort in [
            StudentList::sort_by_name as fn(&mut StudentList),
            StudentList::sort_by_gpa,
            StudentList::sort_by_id,
        ] {
            let mut once = list.clone();
            sort(&mut once);
            let mut twice = once.clone();
            sort(&mut twice);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_find_by_email_and_name() {
        let mut list = StudentList::new();
        list.add(student(1, "Ann", "Lee", 3.0)).unwrap();
        let mut duplicate = student(2, "Other", "Person", 3.0);
        duplicate.email = "ann.lee@school.edu".to_string();
        list.add(duplicate).unwrap();

        assert_eq!(list.find_by_email("ann.lee@school.edu").unwrap().id, 1);
        assert!(list.find_by_email("nobody@school.edu").is_none());
        assert_eq!(list.find_by_name("Other", "Person").unwrap().id, 2);
        assert!(list.find_by_name("Ann", "Person").is_none());
    }

    #[test]
    fn test_full_list_rejects_student() {
        let mut list = StudentList::with_capacity(1);
        list.add(student(1, "Ann", "Lee", 3.0)).unwrap();

        let err = list.add(student(2, "Bob", "Adams", 3.0)).unwrap_err();
        assert!(matches!(err, ListError::CapacityExceeded { capacity: 1 }));
        assert_eq!(list.len(), 1);
    }
}
