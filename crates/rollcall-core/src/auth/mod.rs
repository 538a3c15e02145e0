//! Authentication module for managing the teacher's session.
//!
//! This module provides:
//! - `SessionManager`: login, logout and startup restore over a `Session`
//! - `CredentialVerifier`: the pluggable check of an email/password pair
//! - `TokenStore`: where the session token survives restarts (file, keyring, memory)
//! - `token`: decoding the user record carried inside a token
//!
//! The shipped verifier accepts a single demo account; it stands in for a real
//! identity provider and is not a security mechanism.

pub mod error;
pub mod manager;
pub mod store;
pub mod token;
pub mod verifier;

pub use error::AuthError;
pub use manager::{AuthStatus, Session, SessionManager};
pub use store::{FileTokenStore, KeyringTokenStore, MemoryTokenStore, TokenStore};
pub use verifier::{CredentialVerifier, DemoVerifier};
