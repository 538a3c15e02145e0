use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use rollcall_core::models::Student;
use rollcall_core::utils::truncate_string;

use crate::app::{App, Focus};
use crate::ui::styles;

/// Render the Students tab - searchable table with a detail panel
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let students = app.get_filtered_students();
    render_table(frame, app, &students, chunks[0]);
    render_detail(frame, app, app.selected_student(), chunks[1]);
}

fn render_table(frame: &mut Frame, app: &App, students: &[&Student], area: Rect) {
    let focused = matches!(app.focus, Focus::List);

    let header = Row::new(["Name", "ID", "Grade", "Email"])
        .style(styles::title_style())
        .height(1);

    let rows: Vec<Row> = students
        .iter()
        .enumerate()
        .map(|(i, student)| {
            let style = if i == app.student_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            Row::new(vec![
                Cell::from(student.name.clone()),
                Cell::from(student.student_id.clone()),
                Cell::from(student.grade.clone()),
                Cell::from(truncate_string(&student.email, 28)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Percentage(30),
        Constraint::Length(7),
        Constraint::Length(6),
        Constraint::Fill(1),
    ];

    let title = if app.search_query.is_empty() {
        format!(" Students ({}) ", students.len())
    } else {
        format!(
            " Students ({} of {}) - \"{}\" ",
            students.len(),
            app.roster.students.len(),
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
    if !students.is_empty() {
        state.select(Some(app.student_selection));
    }

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_detail(frame: &mut Frame, app: &App, selected: Option<&Student>, area: Rect) {
    let focused = matches!(app.focus, Focus::Detail);

    let content = match selected {
        Some(student) => {
            let mut lines = vec![
                Line::from(Span::styled(student.name.clone(), styles::title_style())),
                Line::from(""),
                Line::from(vec![
                    Span::styled("Student ID: ", styles::muted_style()),
                    Span::raw(student.student_id.clone()),
                ]),
                Line::from(vec![
                    Span::styled("Grade:      ", styles::muted_style()),
                    Span::raw(student.grade.clone()),
                ]),
                Line::from(vec![
                    Span::styled("Email:      ", styles::muted_style()),
                    Span::raw(student.email.clone()),
                ]),
            ];

            let rate = match app.roster.student_attendance_rate(&student.id) {
                Some(rate) => Span::styled(format!("{}%", rate), styles::success_style()),
                None => Span::styled("-", styles::muted_style()),
            };
            lines.push(Line::from(vec![
                Span::styled("Attendance: ", styles::muted_style()),
                rate,
            ]));

            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled("Classes", styles::highlight_style())));

            let classes = app.roster.classes_for_student(&student.id);
            if classes.is_empty() {
                lines.push(Line::from(Span::styled("  Not enrolled", styles::muted_style())));
            }
            for class in classes {
                lines.push(Line::from(vec![
                    Span::raw(format!("  {}", class.name)),
                    Span::styled(format!("  {}", class.time), styles::muted_style()),
                ]));
            }
            lines
        }
        None => vec![Line::from(Span::styled(
            "No students found",
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
