//! Attendance aggregation for the dashboard.

use chrono::{Days, NaiveDate};

use super::Roster;
use crate::models::{AttendanceRecord, AttendanceStatus, DashboardStats};

/// Days shown in the dashboard's recent-attendance chart
pub const RECENT_DAYS: u64 = 7;

/// Share of `part` in `total` as a whole percent, rounded half up. Zero when
/// there is nothing to divide.
pub fn percent(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((part * 200 + total) / (total * 2)) as u32
}

impl Roster {
    /// Counts for a single day.
    pub fn attendance_on(&self, date: NaiveDate) -> AttendanceRecord {
        let mut record = AttendanceRecord::empty(date);
        for mark in self.attendance.iter().filter(|a| a.date == date) {
            record.add(mark.status);
        }
        record
    }

    /// One record per day for the `days` days ending `today`, oldest first.
    pub fn attendance_records(&self, today: NaiveDate, days: u64) -> Vec<AttendanceRecord> {
        (0..days)
            .rev()
            .filter_map(|back| today.checked_sub_days(Days::new(back)))
            .map(|date| self.attendance_on(date))
            .collect()
    }

    pub fn dashboard_stats(&self, today: NaiveDate) -> DashboardStats {
        let todays = self.attendance_on(today);

        DashboardStats {
            total_students: self.students.len(),
            total_classes: self.classes.len(),
            attendance_today: todays.present,
            attendance_rate: percent(todays.present, todays.total()),
            recent_records: self.attendance_records(today, RECENT_DAYS),
        }
    }

    /// Present share across all of a student's marks, `None` if they have none.
    pub fn student_attendance_rate(&self, student_id: &str) -> Option<u32> {
        let marks: Vec<_> = self
            .attendance
            .iter()
            .filter(|a| a.student_id == student_id)
            .collect();
        if marks.is_empty() {
            return None;
        }
        let present = marks
            .iter()
            .filter(|a| a.status == AttendanceStatus::Present)
            .count();
        Some(percent(present, marks.len()))
    }
}
