use chrono::Datelike;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Gauge, Paragraph},
    Frame,
};

use rollcall_core::models::{AttendanceRecord, AttendanceStatus, DashboardStats};
use rollcall_core::utils::weekday_name;

use crate::app::App;
use crate::ui::styles;

/// Render the Dashboard tab - headline cards, weekly chart, today's breakdown
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let stats = app.roster.dashboard_stats(app.today);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(8)])
        .split(area);

    render_cards(frame, &stats, rows[0]);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(rows[1]);

    render_weekly_chart(frame, &stats.recent_records, bottom[0]);
    render_today(frame, &stats, bottom[1]);
}

fn render_cards(frame: &mut Frame, stats: &DashboardStats, area: Rect) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    let entries = [
        ("Total Students", stats.total_students.to_string(), "Enrolled in your classes"),
        ("Total Classes", stats.total_classes.to_string(), "Active this semester"),
        ("Present Today", stats.attendance_today.to_string(), "Marked present today"),
        ("Attendance Rate", format!("{}%", stats.attendance_rate), "Current attendance percentage"),
    ];

    for ((title, value, caption), card) in entries.into_iter().zip(cards.iter()) {
        let lines = vec![
            Line::from(Span::styled(value, styles::title_style())),
            Line::from(""),
            Line::from(Span::styled(caption, styles::muted_style())),
        ];
        let block = Block::default()
            .title(format!(" {} ", title))
            .title_style(styles::highlight_style())
            .borders(Borders::ALL)
            .border_style(styles::border_style(false));
        frame.render_widget(Paragraph::new(lines).block(block), *card);
    }
}

/// Short day label for chart groups, e.g. "Mon 13"
fn day_label(record: &AttendanceRecord) -> String {
    let name = weekday_name(record.date.weekday());
    format!("{} {}", &name[..3], record.date.day())
}

fn render_weekly_chart(frame: &mut Frame, records: &[AttendanceRecord], area: Rect) {
    let legend: Vec<Span> = AttendanceStatus::ALL
        .iter()
        .flat_map(|status| {
            [
                Span::styled("■ ", Style::default().fg(styles::status_color(*status))),
                Span::styled(format!("{}  ", status.label()), styles::muted_style()),
            ]
        })
        .collect();

    let mut chart = BarChart::default()
        .block(
            Block::default()
                .title(" Attendance, last 7 days ")
                .title_style(styles::muted_style())
                .title_bottom(Line::from(legend))
                .borders(Borders::ALL)
                .border_style(styles::border_style(true)),
        )
        .bar_width(2)
        .bar_gap(0)
        .group_gap(2);

    for record in records {
        let bars: Vec<Bar> = AttendanceStatus::ALL
            .iter()
            .map(|status| {
                Bar::default()
                    .value(record.count(*status) as u64)
                    .style(Style::default().fg(styles::status_color(*status)))
                    .text_value(String::new())
            })
            .collect();
        chart = chart.data(BarGroup::default().label(Line::from(day_label(record))).bars(&bars));
    }

    frame.render_widget(chart, area);
}

fn render_today(frame: &mut Frame, stats: &DashboardStats, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(4)])
        .split(area);

    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(" Today ")
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(false)),
        )
        .gauge_style(styles::success_style())
        .percent(stats.attendance_rate.min(100) as u16)
        .label(format!("{}% present", stats.attendance_rate));
    frame.render_widget(gauge, chunks[0]);

    let today = stats.recent_records.last();
    let mut lines = vec![];
    for status in AttendanceStatus::ALL {
        let count = today.map(|r| r.count(status)).unwrap_or(0);
        lines.push(Line::from(vec![
            Span::styled(format!("{:<10}", status.label()), styles::muted_style()),
            Span::styled(count.to_string(), Style::default().fg(styles::status_color(status))),
        ]));
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .title(" Today's Marks ")
            .title_style(styles::muted_style())
            .borders(Borders::ALL)
            .border_style(styles::border_style(false)),
    );
    frame.render_widget(paragraph, chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_day_label() {
        let record = AttendanceRecord::empty(NaiveDate::from_ymd_opt(2024, 5, 13).unwrap());
        assert_eq!(day_label(&record), "Mon 13");
    }
}
