use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use rollcall_core::auth::AuthStatus;
use rollcall_core::config::TokenBackend;
use rollcall_core::utils::truncate_string;

use crate::app::App;
use crate::ui::styles;

/// Render the Profile tab - signed-in account and session details
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_account(frame, app, chunks[0]);
    render_session(frame, app, chunks[1]);
}

fn field(label: &'static str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<10}", label), styles::muted_style()),
        Span::raw(value),
    ])
}

fn render_account(frame: &mut Frame, app: &App, area: Rect) {
    let content = match app.session().user() {
        Some(user) => vec![
            Line::from(vec![
                Span::styled(format!(" {} ", user.initials()), styles::selected_style()),
                Span::raw("  "),
                Span::styled(user.name.clone(), styles::title_style()),
            ]),
            Line::from(""),
            field("Email:", user.email.clone()),
            field("Role:", user.role_display()),
            field("User ID:", user.id.clone()),
        ],
        None => vec![Line::from(Span::styled(
            "Not signed in",
            styles::muted_style(),
        ))],
    };

    let paragraph = Paragraph::new(content).block(
        Block::default()
            .title(" Account ")
            .title_style(styles::muted_style())
            .borders(Borders::ALL)
            .border_style(styles::border_style(true)),
    );
    frame.render_widget(paragraph, area);
}

fn status_label(status: AuthStatus) -> &'static str {
    match status {
        AuthStatus::Anonymous => "Signed out",
        AuthStatus::Authenticating => "Signing in",
        AuthStatus::Authenticated => "Signed in",
        AuthStatus::AuthFailed => "Sign-in failed",
    }
}

fn render_session(frame: &mut Frame, app: &App, area: Rect) {
    let session = app.session();
    let token = session
        .token()
        .map(|t| truncate_string(t, 32))
        .unwrap_or_else(|| "-".to_string());
    let backend = match app.config.token_backend {
        TokenBackend::File => "Cache file",
        TokenBackend::Keyring => "OS keychain",
    };

    let content = vec![
        field("Status:", status_label(session.status()).to_string()),
        field("Token:", token),
        field("Stored in:", backend.to_string()),
        Line::from(""),
        Line::from(vec![
            Span::styled("Press ", styles::muted_style()),
            Span::styled("L", styles::help_key_style()),
            Span::styled(" to sign out. The saved token is removed.", styles::muted_style()),
        ]),
    ];

    let paragraph = Paragraph::new(content)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(" Session ")
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(false)),
        );
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_label() {
        assert_eq!(status_label(AuthStatus::Authenticated), "Signed in");
        assert_eq!(status_label(AuthStatus::AuthFailed), "Sign-in failed");
    }
}
