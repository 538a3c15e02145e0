//! Utility functions for string formatting and comparison.

pub mod format;

pub use format::{cmp_ignore_case, contains_ignore_case, truncate_string, weekday_name};
