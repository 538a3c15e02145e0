//! In-memory school data for the portal.
//!
//! The `Roster` owns students, classes and attendance marks and answers the
//! questions the UI asks of them: search, enrollment lookups and the
//! dashboard aggregates.

pub mod demo;
pub mod stats;

use chrono::NaiveDate;

use crate::models::{Attendance, Class, Student};
use crate::utils::cmp_ignore_case;

#[derive(Debug, Clone, Default)]
pub struct Roster {
    pub students: Vec<Student>,
    pub classes: Vec<Class>,
    pub attendance: Vec<Attendance>,
}

impl Roster {
    pub fn new(students: Vec<Student>, classes: Vec<Class>, attendance: Vec<Attendance>) -> Self {
        Self {
            students,
            classes,
            attendance,
        }
    }

    /// The demo school with attendance for the days leading up to `today`.
    pub fn demo(today: NaiveDate) -> Self {
        let classes = demo::classes();
        let attendance = demo::attendance(&classes, today, demo::DEMO_ATTENDANCE_DAYS);
        Self::new(demo::students(), classes, attendance)
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Students whose name, student id, email or grade contains `query`,
    /// sorted by name. A blank query returns everyone.
    pub fn search_students(&self, query: &str) -> Vec<&Student> {
        let query = query.trim().to_lowercase();
        let mut found: Vec<&Student> = self
            .students
            .iter()
            .filter(|s| query.is_empty() || s.matches(&query))
            .collect();
        found.sort_by(|a, b| cmp_ignore_case(&a.name, &b.name));
        found
    }

    /// Classes whose name, subject or room contains `query`, in schedule order.
    pub fn search_classes(&self, query: &str) -> Vec<&Class> {
        let query = query.trim().to_lowercase();
        self.classes
            .iter()
            .filter(|c| query.is_empty() || c.matches(&query))
            .collect()
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    pub fn student(&self, id: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    pub fn classes_for_student(&self, student_id: &str) -> Vec<&Class> {
        self.classes
            .iter()
            .filter(|c| c.has_student(student_id))
            .collect()
    }

    /// Enrolled students in roster order. Unknown ids are skipped.
    pub fn students_in_class(&self, class: &Class) -> Vec<&Student> {
        self.students
            .iter()
            .filter(|s| class.has_student(&s.id))
            .collect()
    }
}
