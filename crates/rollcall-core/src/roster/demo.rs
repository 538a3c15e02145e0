//! Demo school data: six students, four classes, ten days of attendance.

use chrono::{Days, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::{Attendance, AttendanceStatus, Class, Student};

/// Days of attendance generated per enrolled student, ending today
pub const DEMO_ATTENDANCE_DAYS: u64 = 10;

/// Fixed seed so the demo looks the same on every launch.
const DEMO_SEED: u64 = 0x5c_4001;

/// Out of 10 rolls, this many come up "present".
const PRESENT_WEIGHT: u32 = 7;

fn student(id: &str, name: &str, email: &str, grade: &str) -> Student {
    Student {
        id: id.to_string(),
        name: name.to_string(),
        student_id: format!("ST{:0>3}", id),
        email: email.to_string(),
        grade: grade.to_string(),
        avatar: None,
    }
}

fn class(id: &str, name: &str, subject: &str, room: &str, time: &str, days: &[Weekday], student_ids: &[&str]) -> Class {
    Class {
        id: id.to_string(),
        name: name.to_string(),
        subject: subject.to_string(),
        room: room.to_string(),
        time: time.to_string(),
        days: days.to_vec(),
        student_ids: student_ids.iter().map(|s| s.to_string()).collect(),
    }
}

pub fn students() -> Vec<Student> {
    vec![
        student("1", "Emma Thompson", "emma.t@example.com", "10A"),
        student("2", "Liam Johnson", "liam.j@example.com", "10A"),
        student("3", "Olivia Davis", "olivia.d@example.com", "10A"),
        student("4", "Noah Wilson", "noah.w@example.com", "10B"),
        student("5", "Ava Martinez", "ava.m@example.com", "10B"),
        student("6", "William Taylor", "william.t@example.com", "10B"),
    ]
}

pub fn classes() -> Vec<Class> {
    use Weekday::*;

    vec![
        class("1", "Mathematics 101", "Mathematics", "Room 201", "09:00 - 10:30", &[Mon, Wed, Fri], &["1", "2", "3", "4", "5"]),
        class("2", "English Literature", "English", "Room 105", "11:00 - 12:30", &[Tue, Thu], &["1", "3", "5", "6"]),
        class("3", "Physics", "Science", "Lab 302", "13:30 - 15:00", &[Mon, Wed], &["2", "4", "6"]),
        class("4", "History", "Social Studies", "Room 108", "15:30 - 17:00", &[Tue, Fri], &["1", "2", "3", "4", "5", "6"]),
    ]
}

/// Map a roll in `0..10` to a status, weighted toward present.
///
/// The three non-present rolls each get their own status so late and excused
/// marks show up in the demo. The web portal's mock data only ever produced
/// present or absent; this split is deliberate.
fn status_for_roll(roll: u32) -> AttendanceStatus {
    match roll {
        r if r < PRESENT_WEIGHT => AttendanceStatus::Present,
        r if r == PRESENT_WEIGHT => AttendanceStatus::Absent,
        r if r == PRESENT_WEIGHT + 1 => AttendanceStatus::Late,
        _ => AttendanceStatus::Excused,
    }
}

/// One mark per enrolled student per class for each of the last `days` days.
pub fn attendance(classes: &[Class], today: NaiveDate, days: u64) -> Vec<Attendance> {
    let mut rng = StdRng::seed_from_u64(DEMO_SEED);
    let mut marks = Vec::new();

    for class in classes {
        for student_id in &class.student_ids {
            for back in 0..days {
                let Some(date) = today.checked_sub_days(Days::new(back)) else {
                    continue;
                };
                let status = status_for_roll(rng.gen_range(0..10));
                marks.push(Attendance {
                    id: format!("{}-{}-{}", class.id, student_id, date),
                    student_id: student_id.clone(),
                    class_id: class.id.clone(),
                    date,
                    status,
                });
            }
        }
    }

    marks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_for_roll() {
        for roll in 0..7 {
            assert_eq!(status_for_roll(roll), AttendanceStatus::Present);
        }
        assert_eq!(status_for_roll(7), AttendanceStatus::Absent);
        assert_eq!(status_for_roll(8), AttendanceStatus::Late);
        assert_eq!(status_for_roll(9), AttendanceStatus::Excused);
    }

    #[test]
    fn test_student_ids_are_padded() {
        let students = students();
        assert_eq!(students[0].student_id, "ST001");
        assert_eq!(students[5].student_id, "ST006");
    }

    #[test]
    fn test_attendance_counts_and_ids() {
        let classes = classes();
        let today = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        let marks = attendance(&classes, today, DEMO_ATTENDANCE_DAYS);

        let enrolled: usize = classes.iter().map(|c| c.student_ids.len()).sum();
        assert_eq!(marks.len(), enrolled * DEMO_ATTENDANCE_DAYS as usize);
        assert_eq!(marks[0].id, "1-1-2024-05-10");
        assert!(marks.iter().all(|m| m.date <= today));
    }

    #[test]
    fn test_attendance_is_deterministic() {
        let classes = classes();
        let today = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        assert_eq!(attendance(&classes, today, 3), attendance(&classes, today, 3));
    }
}
