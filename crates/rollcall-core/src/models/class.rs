use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::utils::{contains_ignore_case, weekday_name};

/// A scheduled class section and its enrolled students.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    pub id: String,
    pub name: String,
    pub subject: String,
    pub room: String,
    /// Meeting time as displayed, e.g. "09:00 - 10:30"
    pub time: String,
    pub days: Vec<Weekday>,
    pub student_ids: Vec<String>,
}

impl Class {
    /// Check if the class matches a search query on name, subject or room.
    /// Query should already be lowercased.
    pub fn matches(&self, query: &str) -> bool {
        contains_ignore_case(&self.name, query)
            || contains_ignore_case(&self.subject, query)
            || contains_ignore_case(&self.room, query)
    }

    pub fn meets_on(&self, day: Weekday) -> bool {
        self.days.contains(&day)
    }

    pub fn has_student(&self, student_id: &str) -> bool {
        self.student_ids.iter().any(|id| id == student_id)
    }

    /// Days joined for display, e.g. "Monday, Wednesday"
    pub fn days_display(&self) -> String {
        self.days
            .iter()
            .map(|d| weekday_name(*d))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
