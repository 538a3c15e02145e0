use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    Excused,
}

impl AttendanceStatus {
    pub const ALL: [AttendanceStatus; 4] = [
        AttendanceStatus::Present,
        AttendanceStatus::Absent,
        AttendanceStatus::Late,
        AttendanceStatus::Excused,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "Present",
            AttendanceStatus::Absent => "Absent",
            AttendanceStatus::Late => "Late",
            AttendanceStatus::Excused => "Excused",
        }
    }
}

/// One attendance mark: a student in a class on a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    pub id: String,
    pub student_id: String,
    pub class_id: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

/// Per-day counts by status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub date: NaiveDate,
    pub present: usize,
    pub absent: usize,
    pub late: usize,
    pub excused: usize,
}

impl AttendanceRecord {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            present: 0,
            absent: 0,
            late: 0,
            excused: 0,
        }
    }

    pub fn add(&mut self, status: AttendanceStatus) {
        match status {
            AttendanceStatus::Present => self.present += 1,
            AttendanceStatus::Absent => self.absent += 1,
            AttendanceStatus::Late => self.late += 1,
            AttendanceStatus::Excused => self.excused += 1,
        }
    }

    pub fn count(&self, status: AttendanceStatus) -> usize {
        match status {
            AttendanceStatus::Present => self.present,
            AttendanceStatus::Absent => self.absent,
            AttendanceStatus::Late => self.late,
            AttendanceStatus::Excused => self.excused,
        }
    }

    pub fn total(&self) -> usize {
        self.present + self.absent + self.late + self.excused
    }
}

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_students: usize,
    pub total_classes: usize,
    /// Present marks recorded today
    pub attendance_today: usize,
    /// Whole-percent share of today's marks that are "present"
    pub attendance_rate: u32,
    /// Oldest first
    pub recent_records: Vec<AttendanceRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&AttendanceStatus::Excused).unwrap(), "\"excused\"");
        let parsed: AttendanceStatus = serde_json::from_str("\"late\"").unwrap();
        assert_eq!(parsed, AttendanceStatus::Late);
    }

    #[test]
    fn test_record_counts() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let mut record = AttendanceRecord::empty(date);
        record.add(AttendanceStatus::Present);
        record.add(AttendanceStatus::Present);
        record.add(AttendanceStatus::Late);

        assert_eq!(record.count(AttendanceStatus::Present), 2);
        assert_eq!(record.count(AttendanceStatus::Late), 1);
        assert_eq!(record.count(AttendanceStatus::Absent), 0);
        assert_eq!(record.total(), 3);
    }
}
