use serde::{Deserialize, Serialize};

use crate::utils::contains_ignore_case;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub name: String,
    /// School-issued identifier, e.g. "ST001"
    pub student_id: String,
    pub email: String,
    pub grade: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl Student {
    /// Check if the student matches a search query on name, id, email or grade.
    /// Query should already be lowercased.
    pub fn matches(&self, query: &str) -> bool {
        contains_ignore_case(&self.name, query)
            || contains_ignore_case(&self.student_id, query)
            || contains_ignore_case(&self.email, query)
            || contains_ignore_case(&self.grade, query)
    }
}
