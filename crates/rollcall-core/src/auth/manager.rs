//! Session state and the operations that move it between states.
//!
//! ```text
//! Anonymous ──login──▶ Authenticating ──▶ Authenticated ──logout──▶ Anonymous
//!     ▲                      │
//!     │                      └──────────▶ AuthFailed ──login──▶ Authenticating
//!     └── restore_from_persisted (startup, may go straight to Authenticated)
//! ```
//!
//! The manager is the single owner of the `Session`; every mutation goes
//! through `&mut self`. A login that is still pending rejects a second one
//! with `AuthError::LoginInProgress`.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::token::decode_user;
use super::{AuthError, CredentialVerifier, TokenStore};
use crate::models::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    Anonymous,
    Authenticating,
    Authenticated,
    AuthFailed,
}

/// In-memory authentication state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    user: Option<User>,
    token: Option<String>,
    is_loading: bool,
    error: Option<String>,
}

impl Session {
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Authenticated exactly when a token is held.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Message from the last failed login, cleared when a new one starts.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn status(&self) -> AuthStatus {
        if self.is_loading {
            AuthStatus::Authenticating
        } else if self.is_authenticated() {
            AuthStatus::Authenticated
        } else if self.error.is_some() {
            AuthStatus::AuthFailed
        } else {
            AuthStatus::Anonymous
        }
    }

    fn sign_in(&mut self, user: User, token: String) {
        self.user = Some(user);
        self.token = Some(token);
        self.error = None;
    }

    fn sign_out(&mut self) {
        self.user = None;
        self.token = None;
    }
}

/// Clears the loading flag if a `login` future is dropped mid-verification.
struct PendingLogin<'a> {
    session: &'a mut Session,
    armed: bool,
}

impl Drop for PendingLogin<'_> {
    fn drop(&mut self) {
        if self.armed {
            warn!("Login abandoned before the verifier answered");
            self.session.is_loading = false;
        }
    }
}

pub struct SessionManager {
    session: Session,
    verifier: Arc<dyn CredentialVerifier>,
    store: Box<dyn TokenStore>,
}

impl SessionManager {
    pub fn new(verifier: Arc<dyn CredentialVerifier>, store: Box<dyn TokenStore>) -> Self {
        Self {
            session: Session::default(),
            verifier,
            store,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Shared handle to the verifier, for running a check off the UI loop.
    pub fn verifier(&self) -> Arc<dyn CredentialVerifier> {
        Arc::clone(&self.verifier)
    }

    // =========================================================================
    // Login
    // =========================================================================

    /// Check the pair with the verifier and apply the outcome.
    ///
    /// A wrong pair is not an `Err`: it lands in `Session::error`. The only
    /// error returned is `LoginInProgress`. Dropping the future before the
    /// verifier answers abandons the login and leaves the session as it was.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<&Session, AuthError> {
        self.begin_login()?;
        let verifier = self.verifier();
        let result = {
            let mut pending = PendingLogin {
                session: &mut self.session,
                armed: true,
            };
            let result = verifier.verify(email, password).await;
            pending.armed = false;
            result
        };
        Ok(self.complete_login(result))
    }

    /// Enter the Authenticating state. Fails if a login is already pending.
    pub fn begin_login(&mut self) -> Result<(), AuthError> {
        if self.session.is_loading {
            warn!("Login requested while another is pending");
            return Err(AuthError::LoginInProgress);
        }
        self.session.is_loading = true;
        self.session.error = None;
        debug!("Login started");
        Ok(())
    }

    /// Apply a verifier result to a pending login.
    ///
    /// Results arriving when no login is pending (e.g. after a logout) are dropped.
    pub fn complete_login(&mut self, result: Result<String, AuthError>) -> &Session {
        if !self.session.is_loading {
            debug!("Dropping login result with no login pending");
            return &self.session;
        }
        self.session.is_loading = false;

        let outcome = result.and_then(|token| decode_user(&token).map(|user| (user, token)));

        match outcome {
            Ok((user, token)) => {
                if let Err(e) = self.store.save(&token) {
                    warn!(error = %e, "Failed to persist session token");
                }
                info!(user_id = %user.id, role = %user.role, "Login successful");
                self.session.sign_in(user, token);
            }
            Err(e) => {
                warn!(error = %e, "Login failed");
                // A failed re-login must not leave the previous token restorable
                if self.session.is_authenticated() {
                    if let Err(e) = self.store.clear() {
                        warn!(error = %e, "Failed to clear persisted token");
                    }
                }
                self.session.sign_out();
                self.session.error = Some(e.to_string());
            }
        }

        &self.session
    }

    // =========================================================================
    // Logout / Restore
    // =========================================================================

    /// Clear the session and the persisted token. Always succeeds.
    pub fn logout(&mut self) -> &Session {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to clear persisted token");
        }
        self.session = Session::default();
        info!("Logged out");
        &self.session
    }

    /// Rebuild the session from the persisted token, without any verification.
    ///
    /// A token that does not decode is discarded. Has no effect on a session
    /// that is already authenticated or mid-login.
    pub fn restore_from_persisted(&mut self) -> &Session {
        if self.session.is_loading || self.session.is_authenticated() {
            debug!(status = ?self.session.status(), "Restore skipped");
            return &self.session;
        }

        let persisted = match self.store.load() {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Failed to read persisted token");
                None
            }
        };

        let Some(token) = persisted else {
            debug!("No persisted token");
            self.session.sign_out();
            return &self.session;
        };

        match decode_user(&token) {
            Ok(user) => {
                info!(user_id = %user.id, "Session restored");
                self.session.sign_in(user, token);
            }
            Err(e) => {
                warn!(error = %e, "Discarding corrupt persisted token");
                if let Err(e) = self.store.clear() {
                    warn!(error = %e, "Failed to clear corrupt token");
                }
                self.session.sign_out();
            }
        }

        &self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::auth::store::{FileTokenStore, MemoryTokenStore};
    use crate::auth::token::{encode_unsigned, DEMO_TOKEN};
    use crate::auth::verifier::{DemoVerifier, DEMO_EMAIL, DEMO_PASSWORD};

    fn manager_with(store: MemoryTokenStore) -> SessionManager {
        SessionManager::new(Arc::new(DemoVerifier::default()), Box::new(store))
    }

    // -------------------------------------------------------------------------
    // Login
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_login_demo_pair() {
        let store = MemoryTokenStore::new();
        let mut manager = manager_with(store.clone());

        let session = manager.login(DEMO_EMAIL, DEMO_PASSWORD).await.unwrap();

        assert!(session.is_authenticated());
        assert!(!session.is_loading());
        assert_eq!(session.error(), None);
        assert!(!session.token().unwrap().is_empty());
        assert_eq!(session.user().unwrap().role, "teacher");
        assert_eq!(session.status(), AuthStatus::Authenticated);
        assert_eq!(store.load().unwrap().as_deref(), Some(DEMO_TOKEN));
    }

    #[tokio::test]
    async fn test_login_wrong_pair() {
        let store = MemoryTokenStore::new();
        let mut manager = manager_with(store.clone());

        let session = manager.login("x@x.com", "wrong").await.unwrap();

        assert!(!session.is_authenticated());
        assert!(!session.is_loading());
        assert_eq!(session.error(), Some("Invalid email or password"));
        assert_eq!(session.user(), None);
        assert_eq!(session.status(), AuthStatus::AuthFailed);
        assert_eq!(store.load().unwrap(), None);
    }

    #[tokio::test]
    async fn test_failed_relogin_clears_persisted_token() {
        let store = MemoryTokenStore::new();
        let mut manager = manager_with(store.clone());
        manager.login(DEMO_EMAIL, DEMO_PASSWORD).await.unwrap();

        let session = manager.login("x@x.com", "wrong").await.unwrap();
        assert!(!session.is_authenticated());
        assert_eq!(store.load().unwrap(), None);

        // A restart must not bring the old session back
        let mut restarted = manager_with(store);
        assert!(!restarted.restore_from_persisted().is_authenticated());
    }

    #[tokio::test]
    async fn test_dropped_login_can_be_retried() {
        let verifier = DemoVerifier::default().with_delay(Duration::from_secs(5));
        let mut manager = SessionManager::new(Arc::new(verifier), Box::new(MemoryTokenStore::new()));

        let timed_out = tokio::time::timeout(
            Duration::from_millis(10),
            manager.login(DEMO_EMAIL, DEMO_PASSWORD),
        )
        .await
        .is_err();

        assert!(timed_out);
        assert!(!manager.session().is_loading());
        assert_eq!(manager.session().status(), AuthStatus::Anonymous);
        assert!(manager.begin_login().is_ok());
    }

    #[tokio::test]
    async fn test_login_rejects_many_wrong_pairs() {
        let mut manager = manager_with(MemoryTokenStore::new());
        for (email, password) in [
            ("", ""),
            (DEMO_EMAIL, ""),
            ("", DEMO_PASSWORD),
            (" teacher@example.com", DEMO_PASSWORD),
            (DEMO_EMAIL, "Password"),
        ] {
            let session = manager.login(email, password).await.unwrap();
            assert!(!session.is_authenticated());
            assert!(!session.error().unwrap_or_default().is_empty());
        }
    }

    #[tokio::test]
    async fn test_retry_after_failure_clears_error() {
        let mut manager = manager_with(MemoryTokenStore::new());
        manager.login("x@x.com", "wrong").await.unwrap();

        manager.begin_login().unwrap();
        assert_eq!(manager.session().error(), None);
        assert_eq!(manager.session().status(), AuthStatus::Authenticating);

        let session = manager.complete_login(Ok(DEMO_TOKEN.to_string()));
        assert!(session.is_authenticated());
    }

    #[test]
    fn test_second_login_while_pending_is_rejected() {
        let mut manager = manager_with(MemoryTokenStore::new());
        manager.begin_login().unwrap();

        assert_eq!(manager.begin_login(), Err(AuthError::LoginInProgress));
        assert!(manager.session().is_loading());
    }

    #[test]
    fn test_undecodable_issued_token_fails_login() {
        let store = MemoryTokenStore::new();
        let mut manager = manager_with(store.clone());
        manager.begin_login().unwrap();

        let session = manager.complete_login(Ok("garbage".to_string()));

        assert!(!session.is_authenticated());
        assert!(session.error().unwrap().starts_with("Corrupt token"));
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_result_without_pending_login_is_dropped() {
        let mut manager = manager_with(MemoryTokenStore::new());
        let session = manager.complete_login(Ok(DEMO_TOKEN.to_string()));
        assert!(!session.is_authenticated());
        assert_eq!(session.status(), AuthStatus::Anonymous);
    }

    // -------------------------------------------------------------------------
    // Logout
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_logout_clears_everything() {
        let store = MemoryTokenStore::new();
        let mut manager = manager_with(store.clone());
        manager.login(DEMO_EMAIL, DEMO_PASSWORD).await.unwrap();

        let session = manager.logout();

        assert!(!session.is_authenticated());
        assert_eq!(session.user(), None);
        assert_eq!(session.token(), None);
        assert_eq!(session.error(), None);
        assert_eq!(store.load().unwrap(), None);
    }

    #[tokio::test]
    async fn test_logout_after_failure_clears_error() {
        let mut manager = manager_with(MemoryTokenStore::new());
        manager.login("x@x.com", "wrong").await.unwrap();

        let session = manager.logout();
        assert_eq!(session.error(), None);
        assert_eq!(session.status(), AuthStatus::Anonymous);
    }

    #[tokio::test]
    async fn test_logout_is_idempotent() {
        let mut manager = manager_with(MemoryTokenStore::new());
        manager.login(DEMO_EMAIL, DEMO_PASSWORD).await.unwrap();

        let once = manager.logout().clone();
        let twice = manager.logout().clone();
        assert_eq!(once, twice);
        assert_eq!(twice, Session::default());
    }

    #[test]
    fn test_logout_drops_pending_login() {
        let mut manager = manager_with(MemoryTokenStore::new());
        manager.begin_login().unwrap();
        manager.logout();

        let session = manager.complete_login(Ok(DEMO_TOKEN.to_string()));
        assert!(!session.is_authenticated());
    }

    // -------------------------------------------------------------------------
    // Restore
    // -------------------------------------------------------------------------

    #[test]
    fn test_restore_without_token() {
        let mut manager = manager_with(MemoryTokenStore::new());
        let session = manager.restore_from_persisted();
        assert!(!session.is_authenticated());
        assert_eq!(session.status(), AuthStatus::Anonymous);
    }

    #[tokio::test]
    async fn test_restore_after_prior_login() {
        let store = MemoryTokenStore::new();
        let original = {
            let mut manager = manager_with(store.clone());
            manager.login(DEMO_EMAIL, DEMO_PASSWORD).await.unwrap();
            manager.session().user().cloned().unwrap()
        };

        let mut restarted = manager_with(store);
        let session = restarted.restore_from_persisted();

        assert!(session.is_authenticated());
        assert_eq!(session.user(), Some(&original));
        assert_eq!(session.token(), Some(DEMO_TOKEN));
    }

    #[test]
    fn test_restore_corrupt_token_clears_store() {
        let store = MemoryTokenStore::with_token("not-a-token");
        let mut manager = manager_with(store.clone());

        let session = manager.restore_from_persisted();

        assert!(!session.is_authenticated());
        assert_eq!(session.error(), None);
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_restore_is_idempotent() {
        let mut manager = manager_with(MemoryTokenStore::with_token(DEMO_TOKEN));
        let first = manager.restore_from_persisted().clone();
        let second = manager.restore_from_persisted().clone();
        assert_eq!(first, second);
        assert!(second.is_authenticated());
    }

    #[test]
    fn test_restore_custom_user_token() {
        let user = User {
            id: "42".to_string(),
            name: "Mr. Ortiz".to_string(),
            email: "ortiz@example.com".to_string(),
            role: "teacher".to_string(),
            avatar: None,
        };
        let token = encode_unsigned(&user).unwrap();
        let mut manager = manager_with(MemoryTokenStore::with_token(&token));

        assert_eq!(manager.restore_from_persisted().user(), Some(&user));
    }

    #[tokio::test]
    async fn test_file_store_survives_restart() {
        let dir = tempfile::TempDir::new().unwrap();
        let new_manager = || {
            SessionManager::new(
                Arc::new(DemoVerifier::default()),
                Box::new(FileTokenStore::new(dir.path().to_path_buf())),
            )
        };

        new_manager().login(DEMO_EMAIL, DEMO_PASSWORD).await.unwrap();

        let mut restarted = new_manager();
        assert!(restarted.restore_from_persisted().is_authenticated());

        restarted.logout();
        assert!(!new_manager().restore_from_persisted().is_authenticated());
    }

    #[test]
    fn test_restore_corrupt_file_removes_it() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = FileTokenStore::new(dir.path().to_path_buf());
        std::fs::write(store.path(), "{ not json").unwrap();
        let path = store.path();

        let mut manager = SessionManager::new(Arc::new(DemoVerifier::default()), Box::new(store));
        assert!(!manager.restore_from_persisted().is_authenticated());
        assert!(!path.exists());
    }
}
