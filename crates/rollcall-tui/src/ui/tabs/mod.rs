pub mod classes;
pub mod dashboard;
pub mod profile;
pub mod students;
