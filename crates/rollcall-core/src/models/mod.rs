//! Data models for the attendance portal.
//!
//! - `User`: the signed-in teacher, decoded from the session token
//! - `Student`, `Class`: roster entities
//! - `Attendance`, `AttendanceStatus`: one mark per student, class and day
//! - `AttendanceRecord`, `DashboardStats`: aggregates shown on the dashboard

pub mod attendance;
pub mod class;
pub mod student;
pub mod user;

pub use attendance::{Attendance, AttendanceRecord, AttendanceStatus, DashboardStats};
pub use class::Class;
pub use student::Student;
pub use user::User;
