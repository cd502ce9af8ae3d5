//! Attendance statistics.
//!
//! Pure functions over an attendance list snapshot. Nothing here mutates
//! or reorders the list.
//!
//! Consecutive-run figures walk the records in list order, so the list must
//! already be sorted with [`AttendanceList::sort_by_date`]. An out-of-order
//! list is logged but still processed.

use log::warn;
use serde::{Deserialize, Serialize};
use shared::{AttendanceRecord, AttendanceStanding, AttendanceStats, AttendanceStatus};
use std::collections::BTreeSet;

use super::attendance_service::AttendanceList;

/// Which statuses count as attended and which count toward the total when
/// computing an attendance percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttendancePolicy {
    /// Late marks count as attended. When false they count as missed days.
    pub late_counts_as_present: bool,
    /// Excused days stay in the denominator as missed days. When false they
    /// are left out of the percentage entirely.
    pub excused_counts_toward_total: bool,
    pub warning_threshold: f64,
    pub critical_threshold: f64,
    pub max_consecutive_absences: usize,
}

impl Default for AttendancePolicy {
    fn default() -> Self {
        Self {
            late_counts_as_present: true,
            excused_counts_toward_total: false,
            warning_threshold: 0.85,
            critical_threshold: 0.75,
            max_consecutive_absences: 5,
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct StatusCounts {
    total: usize,
    present: usize,
    absent: usize,
    late: usize,
    excused: usize,
}

impl StatusCounts {
    fn tally<'a>(records: impl IntoIterator<Item = &'a AttendanceRecord>) -> Self {
        let mut counts = StatusCounts::default();
        for record in records {
            counts.total += 1;
            match record.status {
                AttendanceStatus::Present => counts.present += 1,
                AttendanceStatus::Absent => counts.absent += 1,
                AttendanceStatus::Late => counts.late += 1,
                AttendanceStatus::Excused => counts.excused += 1,
            }
        }
        counts
    }
}

impl AttendancePolicy {
    fn counts_as_present(&self, status: AttendanceStatus) -> bool {
        match status {
            AttendanceStatus::Present => true,
            AttendanceStatus::Late => self.late_counts_as_present,
            AttendanceStatus::Absent | AttendanceStatus::Excused => false,
        }
    }

    /// Days that enter the percentage denominator
    fn counted_days(&self, counts: &StatusCounts) -> usize {
        if self.excused_counts_toward_total {
            counts.total
        } else {
            counts.total - counts.excused
        }
    }

    fn attended_days(&self, counts: &StatusCounts) -> usize {
        if self.late_counts_as_present {
            counts.present + counts.late
        } else {
            counts.present
        }
    }

    /// Attended fraction in `0.0..=1.0`; 0.0 when no day counts
    fn percentage(&self, counts: &StatusCounts) -> f64 {
        match self.counted_days(counts) {
            0 => 0.0,
            days => self.attended_days(counts) as f64 / days as f64,
        }
    }

    fn standing(&self, counts: &StatusCounts, percentage: f64, consecutive_absences: usize) -> AttendanceStanding {
        if self.counted_days(counts) == 0 {
            return AttendanceStanding::Good;
        }
        if percentage < self.critical_threshold || consecutive_absences >= self.max_consecutive_absences {
            AttendanceStanding::Critical
        } else if percentage < self.warning_threshold {
            AttendanceStanding::Warning
        } else {
            AttendanceStanding::Good
        }
    }
}

/// Longest (absence, presence) runs in the given order
fn longest_runs(records: &[&AttendanceRecord], policy: &AttendancePolicy) -> (usize, usize) {
    let (mut absences, mut presents) = (0, 0);
    let (mut longest_absences, mut longest_presents) = (0, 0);

    for record in records {
        if record.status.is_absent() {
            absences += 1;
        } else {
            absences = 0;
        }
        if policy.counts_as_present(record.status) {
            presents += 1;
        } else {
            presents = 0;
        }
        longest_absences = longest_absences.max(absences);
        longest_presents = longest_presents.max(presents);
    }

    (longest_absences, longest_presents)
}

/// Attendance stats for one student in one course.
///
/// Expects `list` to be date-sorted; see the module docs.
pub fn calculate_student_attendance_stats(
    list: &AttendanceList,
    student_id: i32,
    course_id: i32,
    policy: &AttendancePolicy,
) -> AttendanceStats {
    let records: Vec<&AttendanceRecord> = list
        .filter(move |r| r.student_id == student_id && r.course_id == course_id)
        .collect();

    if records.windows(2).any(|pair| pair[0].date > pair[1].date) {
        warn!(
            "Attendance for student {} in course {} is not date-sorted; consecutive runs may be wrong",
            student_id, course_id
        );
    }

    let counts = StatusCounts::tally(records.iter().copied());
    let attendance_percentage = policy.percentage(&counts);
    let (consecutive_absences, consecutive_presents) = longest_runs(&records, policy);

    AttendanceStats {
        student_id: Some(student_id),
        course_id,
        total_days: counts.total,
        present_days: counts.present,
        absent_days: counts.absent,
        late_days: counts.late,
        excused_days: counts.excused,
        attendance_percentage,
        consecutive_absences,
        consecutive_presents,
        standing: policy.standing(&counts, attendance_percentage, consecutive_absences),
    }
}

/// Attendance stats across every student of a course. Runs are not tracked.
pub fn calculate_course_attendance_stats(
    list: &AttendanceList,
    course_id: i32,
    policy: &AttendancePolicy,
) -> AttendanceStats {
    let counts = StatusCounts::tally(list.filter(move |r| r.course_id == course_id));
    let attendance_percentage = policy.percentage(&counts);

    AttendanceStats {
        student_id: None,
        course_id,
        total_days: counts.total,
        present_days: counts.present,
        absent_days: counts.absent,
        late_days: counts.late,
        excused_days: counts.excused,
        attendance_percentage,
        consecutive_absences: 0,
        consecutive_presents: 0,
        standing: policy.standing(&counts, attendance_percentage, 0),
    }
}

/// Students of the course whose attendance percentage is below `threshold`,
/// in ascending id order
pub fn identify_frequently_absent_students(
    list: &AttendanceList,
    course_id: i32,
    threshold: f64,
    policy: &AttendancePolicy,
) -> Vec<i32> {
    let student_ids: BTreeSet<i32> = list
        .filter(move |r| r.course_id == course_id)
        .map(|r| r.student_id)
        .collect();

    student_ids
        .into_iter()
        .filter(|&student_id| {
            let counts = StatusCounts::tally(
                list.filter(move |r| r.course_id == course_id && r.student_id == student_id),
            );
            policy.counted_days(&counts) > 0 && policy.percentage(&counts) < threshold
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::attendance_service::tests::{day, record};
    use shared::AttendanceStatus::*;

    fn list_of(statuses: &[AttendanceStatus]) -> AttendanceList {
        let mut list = AttendanceList::new();
        for (i, status) in statuses.iter().enumerate() {
            list.add(record(i as i32 + 1, 1, 101, day(i as i64), *status)).unwrap();
        }
        list
    }

    #[test]
    fn test_counts_and_default_policy_percentage() {
        let list = list_of(&[Present, Present, Late, Absent, Excused]);
        let stats = calculate_student_attendance_stats(&list, 1, 101, &AttendancePolicy::default());

        assert_eq!(stats.total_days, 5);
        assert_eq!(stats.present_days, 2);
        assert_eq!(stats.late_days, 1);
        assert_eq!(stats.absent_days, 1);
        assert_eq!(stats.excused_days, 1);
        // late attends, excused is left out: 3 / 4
        assert!((stats.attendance_percentage - 0.75).abs() < 1e-9);
        assert_eq!(stats.standing, AttendanceStanding::Warning);
    }

    #[test]
    fn test_strict_policy_percentage() {
        let list = list_of(&[Present, Present, Late, Absent, Excused]);
        let policy = AttendancePolicy {
            late_counts_as_present: false,
            excused_counts_toward_total: true,
            ..AttendancePolicy::default()
        };
        let stats = calculate_student_attendance_stats(&list, 1, 101, &policy);

        assert!((stats.attendance_percentage - 0.4).abs() < 1e-9);
        assert_eq!(stats.standing, AttendanceStanding::Critical);
    }

    #[test]
    fn test_longest_runs_in_date_order() {
        let list = list_of(&[Present, Absent, Absent, Present, Late, Present, Absent]);
        let stats = calculate_student_attendance_stats(&list, 1, 101, &AttendancePolicy::default());

        assert_eq!(stats.consecutive_absences, 2);
        assert_eq!(stats.consecutive_presents, 3);
    }

    #[test]
    fn test_absence_streak_is_critical() {
        let mut statuses = vec![Present; 40];
        statuses.extend([Absent; 5]);
        let list = list_of(&statuses);
        let stats = calculate_student_attendance_stats(&list, 1, 101, &AttendancePolicy::default());

        assert!(stats.attendance_percentage > 0.85);
        assert_eq!(stats.consecutive_absences, 5);
        assert_eq!(stats.standing, AttendanceStanding::Critical);
    }

    #[test]
    fn test_no_records_gives_zero_percentage() {
        let list = AttendanceList::new();
        let stats = calculate_student_attendance_stats(&list, 1, 101, &AttendancePolicy::default());

        assert_eq!(stats.total_days, 0);
        assert_eq!(stats.attendance_percentage, 0.0);
        assert_eq!(stats.standing, AttendanceStanding::Good);
    }

    #[test]
    fn test_stats_do_not_reorder_list() {
        let mut list = AttendanceList::new();
        list.add(record(1, 1, 101, day(3), Present)).unwrap();
        list.add(record(2, 1, 101, day(1), Absent)).unwrap();
        let before = list.clone();

        calculate_student_attendance_stats(&list, 1, 101, &AttendancePolicy::default());
        assert_eq!(list, before);
    }

    #[test]
    fn test_course_stats_and_frequent_absentees() {
        let mut list = AttendanceList::new();
        let mut id = 0;
        for (student_id, statuses) in [
            (1, [Present, Present, Present, Present]),
            (2, [Absent, Absent, Present, Absent]),
            (3, [Present, Late, Present, Absent]),
        ] {
            for (n, status) in statuses.into_iter().enumerate() {
                id += 1;
                list.add(record(id, student_id, 101, day(n as i64), status)).unwrap();
            }
        }
        list.add(record(99, 2, 202, day(0), Absent)).unwrap();

        let stats = calculate_course_attendance_stats(&list, 101, &AttendancePolicy::default());
        assert_eq!(stats.student_id, None);
        assert_eq!(stats.total_days, 12);
        assert_eq!(stats.absent_days, 4);

        let absentees = identify_frequently_absent_students(&list, 101, 0.8, &AttendancePolicy::default());
        assert_eq!(absentees, vec![2, 3]);
    }
}
