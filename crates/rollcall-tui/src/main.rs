//! Rollcall - a terminal teacher attendance portal.
//!
//! Sign in, browse students and classes, and follow attendance from the
//! keyboard. The session token survives restarts.

mod app;
mod ui;

use std::io::{self, BufRead, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use rollcall_core::Config;

use app::{App, AppState};
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Log file written while the TUI owns the terminal
const LOG_FILE: &str = "rollcall.log";

fn env_filter() -> EnvFilter {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Log to stderr, for the one-shot CLI commands
fn init_cli_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(env_filter())
        .init();
}

/// Log to a file in the cache directory; stderr would draw over the UI.
/// The returned guard must live until shutdown so buffered lines get flushed.
fn init_tui_tracing(config: &Config) -> Result<WorkerGuard> {
    let log_dir = config.cache_dir()?;
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(log_dir, LOG_FILE));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(env_filter())
        .init();

    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    // Check for CLI commands
    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("--login") => {
            init_cli_tracing();
            return login_command().await;
        }
        Some("--logout") => {
            init_cli_tracing();
            return logout_command();
        }
        Some("--status") => {
            init_cli_tracing();
            return status_command();
        }
        Some(other) => {
            anyhow::bail!("Unknown argument: {} (expected --login, --logout or --status)", other);
        }
        None => {}
    }

    let config = Config::load().unwrap_or_default();
    let _log_guard = init_tui_tracing(&config)?;
    info!("Rollcall starting");

    // Create app before touching the terminal so startup errors print normally
    let mut app = App::new()?;
    if !app.is_authenticated() {
        app.start_login();
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("Rollcall shutting down");
    Ok(())
}

/// Sign in from the command line and persist the session
async fn login_command() -> Result<()> {
    let mut config = Config::load()?;
    let mut auth = config.session_manager()?;

    let default_email = config.last_email.clone().unwrap_or_default();
    if default_email.is_empty() {
        eprint!("Email: ");
    } else {
        eprint!("Email [{}]: ", default_email);
    }
    io::stderr().flush()?;

    let mut email = String::new();
    io::stdin().lock().read_line(&mut email)?;
    let email = match email.trim() {
        "" => default_email,
        typed => typed.to_string(),
    };

    let password = rpassword::prompt_password("Password: ")?;

    eprintln!("Signing in...");
    let session = auth.login(&email, &password).await?;
    let name = match session.user() {
        Some(user) => user.name.clone(),
        None => anyhow::bail!(session.error().unwrap_or("Login failed").to_string()),
    };

    config.last_email = Some(email);
    config.save()?;

    eprintln!("Signed in as {}", name);
    Ok(())
}

/// Forget the persisted session
fn logout_command() -> Result<()> {
    let config = Config::load()?;
    let mut auth = config.session_manager()?;
    auth.restore_from_persisted();
    auth.logout();
    eprintln!("Signed out");
    Ok(())
}

/// Print the persisted session's user as JSON
fn status_command() -> Result<()> {
    let config = Config::load()?;
    let mut auth = config.session_manager()?;

    match auth.restore_from_persisted().user() {
        Some(user) => println!("{}", serde_json::to_string_pretty(user)?),
        None => eprintln!("Not signed in"),
    }
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Draw UI
        terminal.draw(|f| render(f, app))?;

        // Poll for events with timeout to allow background updates
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                // Handle input
                if handle_input(app, key)? {
                    return Ok(());
                }
            }
        }

        // Check for completed background tasks
        app.check_background_tasks();

        // Check if we should quit
        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}
