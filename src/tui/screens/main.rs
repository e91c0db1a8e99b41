//! Main screen: timer, running summary, session details and history

use crate::output::truncate;
use crate::store::Totals;
use crate::time_utils::{format_currency, format_duration, format_short_date};
use crate::tui::{
    state::{AppState, DraftField, Screen},
    theme::{state_style, Styles},
    widgets::{
        logo::{render_logo, HEADER_HEIGHT},
        shortcuts::{get_shortcuts, render_shortcuts},
    },
};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

pub fn render(f: &mut Frame, app_state: &mut AppState) {
    let area = f.area();

    // Layout: header, timer + summary, session details, history, message, shortcuts
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Length(5), // Timer and summary side by side
            Constraint::Length(5), // Session details
            Constraint::Min(6),    // History
            Constraint::Length(1), // Status message
            Constraint::Length(2), // Shortcuts
        ])
        .split(area);

    render_logo(f, chunks[0]);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);
    render_timer(f, top[0], app_state);
    render_summary(f, top[1], app_state);

    render_details(f, chunks[2], app_state);
    render_history(f, chunks[3], app_state);

    if let Some(message) = &app_state.message {
        let line = Line::from(Span::styled(format!("  {}", message), Styles::emphasis()));
        f.render_widget(Paragraph::new(line), chunks[4]);
    }

    let shortcuts = get_shortcuts(app_state);
    render_shortcuts(f, chunks[5], &shortcuts);
}

fn render_timer(f: &mut Frame, area: Rect, app_state: &AppState) {
    let state = app_state.state();
    let lines = vec![
        Line::from(Span::styled(app_state.timer_display.clone(), Styles::clock())),
        Line::from(Span::styled(state.label(), state_style(state))),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Styles::border())
        .title(Span::styled(" Timer ", Styles::header()));
    f.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).block(block),
        area,
    );
}

fn render_summary(f: &mut Frame, area: Rect, app_state: &AppState) {
    let rate = app_state.tracker.effective_rate();
    let lines = vec![
        Line::from(vec![
            Span::styled("  Time    ", Styles::secondary()),
            Span::styled(format_duration(app_state.summary_elapsed), Styles::emphasis()),
        ]),
        Line::from(vec![
            Span::styled("  Rate    ", Styles::secondary()),
            Span::styled(format!("{}/hr", format_currency(rate)), Styles::primary()),
        ]),
        Line::from(vec![
            Span::styled("  Amount  ", Styles::secondary()),
            Span::styled(format_currency(app_state.summary_amount()), Styles::amount()),
        ]),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Styles::border())
        .title(Span::styled(" Current Session ", Styles::header()));
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_details(f: &mut Frame, area: Rect, app_state: &AppState) {
    let locked = app_state.tracker.timer().inputs_locked();
    let editing = match &app_state.screen {
        Screen::EditDraft { field, buffer } => Some((*field, buffer.as_str())),
        _ => None,
    };

    // While a session exists its own values are shown, otherwise the draft
    let (project, rate, notes) = match app_state.tracker.timer().current_session() {
        Some(session) => (
            session.project_name.clone(),
            session.hourly_rate,
            session.notes.clone(),
        ),
        None => {
            let draft = app_state.tracker.draft();
            (draft.project_name.clone(), draft.hourly_rate, draft.notes.clone())
        }
    };

    let field_line = |field: DraftField, value: String| -> Line<'static> {
        let label = Span::styled(format!("  {:<16}", field.label()), Styles::secondary());
        match editing {
            Some((active, buffer)) if active == field => Line::from(vec![
                label,
                Span::styled(format!("{}▏", buffer), Styles::input()),
            ]),
            _ => Line::from(vec![label, Span::styled(value, Styles::primary())]),
        }
    };

    let lines = vec![
        field_line(DraftField::Project, project),
        field_line(DraftField::Rate, format_currency(rate)),
        field_line(DraftField::Notes, notes),
    ];

    let (title, border) = if locked {
        (" Session Details (locked) ", Styles::border_disabled())
    } else {
        (" Session Details ", Styles::border())
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(Span::styled(title, Styles::header()));
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_history(f: &mut Frame, area: Rect, app_state: &AppState) {
    let sessions = app_state.tracker.store().list();
    let totals = Totals::of(sessions);

    let title = format!(
        " Session History · {} · {} ",
        format_duration(totals.duration_ms),
        format_currency(totals.amount)
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Styles::border())
        .title(Span::styled(title, Styles::header()));

    if sessions.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("No sessions recorded yet", Styles::secondary())),
            Line::from(Span::styled(
                "Start tracking time to see your session history here",
                Styles::secondary(),
            )),
        ])
        .alignment(Alignment::Center)
        .block(block);
        f.render_widget(empty, area);
        return;
    }

    let header = Row::new(vec![
        Cell::from("DATE").style(Styles::header()),
        Cell::from("PROJECT").style(Styles::header()),
        Cell::from("TIME").style(Styles::header()),
        Cell::from("AMOUNT").style(Styles::header()),
        Cell::from("SHOTS").style(Styles::header()),
    ]);

    let rows: Vec<Row> = sessions
        .iter()
        .map(|session| {
            let shots = if session.screenshots.is_empty() {
                String::new()
            } else {
                session.screenshots.len().to_string()
            };
            Row::new(vec![
                Cell::from(format_short_date(&session.start_time)),
                Cell::from(truncate(session.display_name(), 28)),
                Cell::from(format_duration(session.duration)),
                Cell::from(format_currency(session.amount)).style(Styles::amount()),
                Cell::from(shots).style(Styles::secondary()),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(14),
            Constraint::Min(16),
            Constraint::Length(9),
            Constraint::Length(12),
            Constraint::Length(6),
        ],
    )
    .header(header)
    .block(block)
    .row_highlight_style(Styles::selected());

    let mut table_state = TableState::default().with_selected(Some(app_state.history_cursor));
    f.render_stateful_widget(table, area, &mut table_state);
}
