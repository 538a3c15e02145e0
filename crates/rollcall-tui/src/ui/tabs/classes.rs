use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use rollcall_core::models::Class;

use crate::app::{App, Focus};
use crate::ui::styles;

/// Render the Classes tab - schedule table with enrolled students
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let classes = app.get_filtered_classes();
    render_table(frame, app, &classes, chunks[0]);
    render_detail(frame, app, app.selected_class(), chunks[1]);
}

fn render_table(frame: &mut Frame, app: &App, classes: &[&Class], area: Rect) {
    let focused = matches!(app.focus, Focus::List);
    let today = app.today_weekday();

    let header = Row::new(["Name", "Subject", "Room", "Time", ""])
        .style(styles::title_style())
        .height(1);

    let rows: Vec<Row> = classes
        .iter()
        .enumerate()
        .map(|(i, class)| {
            let style = if i == app.class_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            let today_badge = if class.meets_on(today) {
                Cell::from(Span::styled("Today", styles::success_style()))
            } else {
                Cell::from("")
            };
            Row::new(vec![
                Cell::from(class.name.clone()),
                Cell::from(class.subject.clone()),
                Cell::from(class.room.clone()),
                Cell::from(class.time.clone()),
                today_badge,
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Fill(2),
        Constraint::Fill(2),
        Constraint::Length(9),
        Constraint::Length(14),
        Constraint::Length(6),
    ];

    let title = if app.search_query.is_empty() {
        format!(" Classes ({}) ", classes.len())
    } else {
        format!(
            " Classes ({} of {}) - \"{}\" ",
            classes.len(),
            app.roster.classes.len(),
            app.search_query
        )
    };

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(focused)),
        )
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    if !classes.is_empty() {
        state.select(Some(app.class_selection));
    }

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_detail(frame: &mut Frame, app: &App, selected: Option<&Class>, area: Rect) {
    let focused = matches!(app.focus, Focus::Detail);

    let content = match selected {
        Some(class) => {
            let enrolled = app.roster.students_in_class(class);
            let mut lines = vec![
                Line::from(Span::styled(class.name.clone(), styles::title_style())),
                Line::from(Span::styled(class.subject.clone(), styles::muted_style())),
                Line::from(""),
                Line::from(vec![
                    Span::styled("Days:     ", styles::muted_style()),
                    Span::raw(class.days_display()),
                ]),
                Line::from(vec![
                    Span::styled("Time:     ", styles::muted_style()),
                    Span::raw(class.time.clone()),
                ]),
                Line::from(vec![
                    Span::styled("Room:     ", styles::muted_style()),
                    Span::raw(class.room.clone()),
                ]),
                Line::from(""),
                Line::from(Span::styled(
                    format!("Students ({})", enrolled.len()),
                    styles::highlight_style(),
                )),
            ];
            for student in enrolled {
                lines.push(Line::from(vec![
                    Span::raw(format!("  {}", student.name)),
                    Span::styled(format!("  {}", student.student_id), styles::muted_style()),
                ]));
            }
            lines
        }
        None => vec![Line::from(Span::styled(
            "No classes found",
            styles::muted_style(),
        ))],
    };

    let paragraph = Paragraph::new(content)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(" Details ")
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(focused)),
        );

    frame.render_widget(paragraph, area);
}
