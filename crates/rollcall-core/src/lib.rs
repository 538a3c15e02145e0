//! Rollcall core library.
//!
//! Everything behind the attendance portal that is not presentation:
//!
//! - `auth`: session lifecycle, credential verification, token persistence
//! - `config`: on-disk configuration and directory layout
//! - `models`: users, students, classes, attendance
//! - `roster`: the in-memory school data with search and dashboard aggregation
//! - `utils`: small string helpers shared by search and the UI

pub mod auth;
pub mod config;
pub mod models;
pub mod roster;
pub mod utils;

pub use auth::{AuthError, AuthStatus, Session, SessionManager};
pub use config::Config;
pub use roster::Roster;
