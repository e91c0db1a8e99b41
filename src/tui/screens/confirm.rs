//! Delete confirmation overlay

use crate::time_utils::{format_currency, format_duration, format_short_date};
use crate::tui::{
    state::{AppState, Screen},
    theme::Styles,
};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, app_state: &mut AppState) {
    let Screen::ConfirmDelete { id } = &app_state.screen else {
        return;
    };
    let Some(session) = app_state.tracker.store().get(id) else {
        return;
    };

    let area = centered_rect(50, 9, f.area());
    f.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Delete this session from history?",
            Styles::warning(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(session.display_name().to_string(), Styles::emphasis()),
            Span::styled(
                format!(" · {}", format_short_date(&session.start_time)),
                Styles::secondary(),
            ),
        ]),
        Line::from(vec![
            Span::styled(format_duration(session.duration), Styles::primary()),
            Span::styled(" · ", Styles::secondary()),
            Span::styled(format_currency(session.amount), Styles::amount()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("[Y]", Styles::key()),
            Span::styled(" delete   ", Styles::secondary()),
            Span::styled("[N]", Styles::key()),
            Span::styled(" keep", Styles::secondary()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Styles::border())
        .title(Span::styled(" Confirm ", Styles::header()));
    f.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).block(block),
        area,
    );
}

/// Rectangle of `width_percent` of the screen width and `height` rows, centred
fn centered_rect(width_percent: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - width_percent) / 2),
            Constraint::Percentage(width_percent),
            Constraint::Percentage((100 - width_percent) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}
