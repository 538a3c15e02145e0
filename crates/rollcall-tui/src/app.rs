//! Application state management for Rollcall.
//!
//! This module contains the core `App` struct that manages all application state,
//! including UI state, the session manager, roster data, and the background
//! login task.

use std::path::PathBuf;

use anyhow::Result;
use chrono::{Datelike, Local, NaiveDate, Weekday};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use rollcall_core::auth::AuthError;
use rollcall_core::models::{Class, Student};
use rollcall_core::{Config, Roster, Session, SessionManager};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
const CHANNEL_BUFFER_SIZE: usize = 8;

/// Maximum length for email input.
const MAX_EMAIL_LENGTH: usize = 64;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

/// Number of items to scroll on page up/down.
pub const PAGE_SCROLL_SIZE: usize = 10;

// ============================================================================
// UI State Types
// ============================================================================

/// Main navigation tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Dashboard,
    Students,
    Classes,
    Profile,
}

impl Tab {
    /// Get the display title for this tab.
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Students => "Students",
            Tab::Classes => "Classes",
            Tab::Profile => "Profile",
        }
    }

    /// Get the next tab (wrapping around)
    pub fn next(&self) -> Self {
        match self {
            Tab::Dashboard => Tab::Students,
            Tab::Students => Tab::Classes,
            Tab::Classes => Tab::Profile,
            Tab::Profile => Tab::Dashboard,
        }
    }

    /// Get the previous tab (wrapping around)
    pub fn prev(&self) -> Self {
        match self {
            Tab::Dashboard => Tab::Profile,
            Tab::Students => Tab::Dashboard,
            Tab::Classes => Tab::Students,
            Tab::Profile => Tab::Classes,
        }
    }

    /// Whether the tab has a searchable list
    pub fn is_searchable(&self) -> bool {
        matches!(self, Tab::Students | Tab::Classes)
    }
}

/// Current UI focus area (list panel or detail panel)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    List,
    Detail,
}

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    Searching,
    ShowingHelp,
    LoggingIn,
    ConfirmingQuit,
    ConfirmingLogout,
    Quitting,
}

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoginFocus {
    Email,
    Password,
    Button,
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Results sent back from background tasks over the MPSC channel.
enum BackgroundResult {
    /// Verifier answer for the pending login
    Login(Result<String, AuthError>),
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    // Core services
    pub config: Config,
    /// Where `config` is written back; `None` keeps it in memory only
    config_path: Option<PathBuf>,
    pub auth: SessionManager,
    pub roster: Roster,
    pub today: NaiveDate,

    // UI State
    pub state: AppState,
    pub current_tab: Tab,
    pub focus: Focus,
    pub search_query: String,

    // Login form state
    pub login_email: String,
    pub login_password: String,
    pub login_focus: LoginFocus,
    /// Form validation message; verifier failures live on the session
    pub login_form_error: Option<String>,

    // Selection indices
    pub student_selection: usize,
    pub class_selection: usize,

    // Background task channel
    result_rx: mpsc::Receiver<BackgroundResult>,
    result_tx: mpsc::Sender<BackgroundResult>,

    // Status message
    pub status_message: Option<String>,
}

impl App {
    /// Create a new application instance
    pub fn new() -> Result<Self> {
        debug!("App::new() starting");
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        };
        debug!(backend = ?config.token_backend, "Config loaded");

        let config_path = Config::config_path().ok();
        let auth = config.session_manager()?;
        let today = Local::now().date_naive();
        let roster = Roster::demo(today);

        Ok(Self::with_parts(config, config_path, auth, roster, today))
    }

    /// Assemble an app from already-built services and restore any persisted session.
    pub fn with_parts(
        config: Config,
        config_path: Option<PathBuf>,
        mut auth: SessionManager,
        roster: Roster,
        today: NaiveDate,
    ) -> Self {
        let restored = auth.restore_from_persisted().is_authenticated();
        debug!(restored, "Session restore attempted");

        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        // Prefill credentials from env vars or config
        let login_email = std::env::var("ROLLCALL_EMAIL")
            .ok()
            .or_else(|| config.last_email.clone())
            .unwrap_or_default();

        let login_password = std::env::var("ROLLCALL_PASSWORD").unwrap_or_default();

        Self {
            config,
            config_path,
            auth,
            roster,
            today,

            state: AppState::Normal,
            current_tab: Tab::Dashboard,
            focus: Focus::List,
            search_query: String::new(),

            login_email,
            login_password,
            login_focus: LoginFocus::Email,
            login_form_error: None,

            student_selection: 0,
            class_selection: 0,

            result_rx: rx,
            result_tx: tx,

            status_message: None,
        }
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    pub fn session(&self) -> &Session {
        self.auth.session()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session().is_authenticated()
    }

    /// Message to show under the login form, if any
    pub fn login_error(&self) -> Option<&str> {
        self.login_form_error
            .as_deref()
            .or_else(|| self.session().error())
    }

    /// Start the login process (show login overlay)
    pub fn start_login(&mut self) {
        self.state = AppState::LoggingIn;
        self.login_focus = if self.login_email.is_empty() {
            LoginFocus::Email
        } else {
            LoginFocus::Password
        };
        self.login_form_error = None;
    }

    /// Submit the login form. Verification runs in a background task and is
    /// picked up by `check_background_tasks`.
    pub fn attempt_login(&mut self) {
        if self.login_email.is_empty() || self.login_password.is_empty() {
            self.login_form_error = Some("Email and password required".to_string());
            return;
        }
        self.login_form_error = None;

        if let Err(e) = self.auth.begin_login() {
            self.status_message = Some(e.to_string());
            return;
        }

        let verifier = self.auth.verifier();
        let tx = self.result_tx.clone();
        let email = self.login_email.clone();
        let password = self.login_password.clone();

        tokio::spawn(async move {
            let result = verifier.verify(&email, &password).await;
            if tx.send(BackgroundResult::Login(result)).await.is_err() {
                warn!("Login result dropped: receiver closed");
            }
        });
    }

    /// Sign out and return to the login overlay
    pub fn logout(&mut self) {
        self.auth.logout();
        self.login_password.clear();
        self.search_query.clear();
        self.status_message = Some("Signed out".to_string());
        self.start_login();
    }

    // =========================================================================
    // Background Tasks
    // =========================================================================

    /// Apply any finished background results
    pub fn check_background_tasks(&mut self) {
        while let Ok(result) = self.result_rx.try_recv() {
            self.process_background_result(result);
        }
    }

    fn process_background_result(&mut self, result: BackgroundResult) {
        match result {
            BackgroundResult::Login(result) => {
                let signed_in = self
                    .auth
                    .complete_login(result)
                    .user()
                    .map(|u| u.name.clone());

                match signed_in {
                    Some(name) => {
                        self.config.last_email = Some(self.login_email.clone());
                        if let Some(ref path) = self.config_path {
                            if let Err(e) = self.config.save_to(path) {
                                warn!(error = %e, "Failed to save config");
                            }
                        }
                        self.login_password.clear();
                        self.state = AppState::Normal;
                        self.current_tab = Tab::Dashboard;
                        self.status_message = Some(format!("Signed in as {}", name));
                        info!("Login complete");
                    }
                    None => {
                        self.login_focus = LoginFocus::Password;
                    }
                }
            }
        }
    }

    // =========================================================================
    // Data Access Methods
    // =========================================================================

    pub fn get_filtered_students(&self) -> Vec<&Student> {
        let query = if self.current_tab == Tab::Students { self.search_query.as_str() } else { "" };
        self.roster.search_students(query)
    }

    pub fn get_filtered_classes(&self) -> Vec<&Class> {
        let query = if self.current_tab == Tab::Classes { self.search_query.as_str() } else { "" };
        self.roster.search_classes(query)
    }

    pub fn selected_student(&self) -> Option<&Student> {
        self.get_filtered_students().get(self.student_selection).copied()
    }

    pub fn selected_class(&self) -> Option<&Class> {
        self.get_filtered_classes().get(self.class_selection).copied()
    }

    pub fn today_weekday(&self) -> Weekday {
        self.today.weekday()
    }

    /// Number of rows in the current tab's list
    pub fn current_list_len(&self) -> usize {
        match self.current_tab {
            Tab::Students => self.get_filtered_students().len(),
            Tab::Classes => self.get_filtered_classes().len(),
            Tab::Dashboard | Tab::Profile => 0,
        }
    }

    /// Mutable selection index for the current tab's list
    pub fn current_selection_mut(&mut self) -> Option<&mut usize> {
        match self.current_tab {
            Tab::Students => Some(&mut self.student_selection),
            Tab::Classes => Some(&mut self.class_selection),
            Tab::Dashboard | Tab::Profile => None,
        }
    }

    pub fn switch_tab(&mut self, tab: Tab) {
        if self.current_tab != tab {
            self.search_query.clear();
        }
        self.current_tab = tab;
        self.focus = Focus::List;
    }
}

// ============================================================================
// Input validation helpers (exported for use in input.rs)
// ============================================================================

/// Check if a character is valid for input (no control characters)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

/// Check if an email character should be accepted
pub fn can_add_email_char(current_len: usize, c: char) -> bool {
    current_len < MAX_EMAIL_LENGTH && is_valid_input_char(c) && !c.is_whitespace()
}

/// Check if a password character should be accepted
pub fn can_add_password_char(current_len: usize, c: char) -> bool {
    current_len < MAX_PASSWORD_LENGTH && is_valid_input_char(c)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use rollcall_core::auth::verifier::{DEMO_EMAIL, DEMO_PASSWORD};
    use rollcall_core::auth::{DemoVerifier, MemoryTokenStore, TokenStore};
    use rollcall_core::AuthStatus;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 13).unwrap()
    }

    fn test_app(store: MemoryTokenStore) -> App {
        let auth = SessionManager::new(Arc::new(DemoVerifier::default()), Box::new(store));
        let mut app = App::with_parts(Config::default(), None, auth, Roster::demo(today()), today());
        app.login_email.clear();
        app.login_password.clear();
        app
    }

    /// Let the spawned verifier run, then apply its result.
    async fn settle(app: &mut App) {
        for _ in 0..100 {
            tokio::task::yield_now().await;
            app.check_background_tasks();
            if !app.session().is_loading() {
                return;
            }
        }
        panic!("login never completed");
    }

    // -------------------------------------------------------------------------
    // Tab Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_tab_next() {
        assert_eq!(Tab::Dashboard.next(), Tab::Students);
        assert_eq!(Tab::Students.next(), Tab::Classes);
        assert_eq!(Tab::Classes.next(), Tab::Profile);
        assert_eq!(Tab::Profile.next(), Tab::Dashboard); // Wraps around
    }

    #[test]
    fn test_tab_prev() {
        assert_eq!(Tab::Dashboard.prev(), Tab::Profile); // Wraps around
        assert_eq!(Tab::Profile.prev(), Tab::Classes);
        assert_eq!(Tab::Classes.prev(), Tab::Students);
        assert_eq!(Tab::Students.prev(), Tab::Dashboard);
    }

    // -------------------------------------------------------------------------
    // Input Validation Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_can_add_email_char() {
        assert!(can_add_email_char(0, 'a'));
        assert!(can_add_email_char(63, '@'));
        assert!(!can_add_email_char(64, 'a'));
        assert!(!can_add_email_char(0, ' '));
        assert!(!can_add_email_char(0, '\n'));
    }

    #[test]
    fn test_can_add_password_char() {
        assert!(can_add_password_char(0, 'a'));
        assert!(can_add_password_char(127, '!'));
        assert!(can_add_password_char(0, ' '));
        assert!(!can_add_password_char(128, 'a'));
        assert!(!can_add_password_char(0, '\x00'));
        assert!(!can_add_password_char(0, '\r'));
    }

    // -------------------------------------------------------------------------
    // Login Flow Tests
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_empty_form_is_rejected_before_verifying() {
        let mut app = test_app(MemoryTokenStore::new());
        app.start_login();
        app.attempt_login();

        assert_eq!(app.login_error(), Some("Email and password required"));
        assert!(!app.session().is_loading());
    }

    #[tokio::test]
    async fn test_successful_login_closes_overlay() {
        let store = MemoryTokenStore::new();
        let mut app = test_app(store.clone());
        app.start_login();
        app.login_email = DEMO_EMAIL.to_string();
        app.login_password = DEMO_PASSWORD.to_string();

        app.attempt_login();
        assert_eq!(app.session().status(), AuthStatus::Authenticating);
        settle(&mut app).await;

        assert!(app.is_authenticated());
        assert_eq!(app.state, AppState::Normal);
        assert!(app.login_password.is_empty());
        assert!(store.load().unwrap().is_some());
    }

    #[tokio::test]
    async fn test_failed_login_stays_on_overlay() {
        let mut app = test_app(MemoryTokenStore::new());
        app.start_login();
        app.login_email = "x@x.com".to_string();
        app.login_password = "wrong".to_string();

        app.attempt_login();
        settle(&mut app).await;

        assert!(!app.is_authenticated());
        assert_eq!(app.state, AppState::LoggingIn);
        assert_eq!(app.login_error(), Some("Invalid email or password"));
        assert_eq!(app.login_focus, LoginFocus::Password);
    }

    #[tokio::test]
    async fn test_double_submit_is_rejected() {
        let mut app = test_app(MemoryTokenStore::new());
        app.start_login();
        app.login_email = DEMO_EMAIL.to_string();
        app.login_password = DEMO_PASSWORD.to_string();

        app.attempt_login();
        app.attempt_login();
        assert_eq!(
            app.status_message.as_deref(),
            Some("A login is already in progress")
        );

        settle(&mut app).await;
        assert!(app.is_authenticated());
    }

    #[test]
    fn test_restores_persisted_session() {
        let app = test_app(MemoryTokenStore::with_token(
            rollcall_core::auth::token::DEMO_TOKEN,
        ));
        assert!(app.is_authenticated());
        assert_eq!(app.session().user().unwrap().name, "Ms. Jessica Parker");
    }

    #[test]
    fn test_logout_returns_to_login() {
        let store = MemoryTokenStore::with_token(rollcall_core::auth::token::DEMO_TOKEN);
        let mut app = test_app(store.clone());

        app.logout();

        assert!(!app.is_authenticated());
        assert_eq!(app.state, AppState::LoggingIn);
        assert_eq!(store.load().unwrap(), None);
    }

    // -------------------------------------------------------------------------
    // Data Access Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_search_applies_to_current_tab_only() {
        let mut app = test_app(MemoryTokenStore::new());
        app.switch_tab(Tab::Students);
        app.search_query = "10a".to_string();

        assert_eq!(app.get_filtered_students().len(), 3);
        assert_eq!(app.get_filtered_classes().len(), 4);
    }

    #[test]
    fn test_switch_tab_clears_search() {
        let mut app = test_app(MemoryTokenStore::new());
        app.switch_tab(Tab::Students);
        app.search_query = "emma".to_string();

        app.switch_tab(Tab::Classes);
        assert!(app.search_query.is_empty());
        assert_eq!(app.focus, Focus::List);
    }
}
