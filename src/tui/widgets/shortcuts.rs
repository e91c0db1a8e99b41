//! Keyboard shortcut bar

use crate::tui::{
    state::{AppState, Screen},
    theme::Styles,
};
use crate::timer::TimerState;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Shortcuts that apply to the current screen and timer state
pub fn get_shortcuts(app_state: &AppState) -> Vec<(&'static str, &'static str)> {
    match app_state.screen {
        Screen::Main => {
            let state = app_state.state();
            let toggle = match state {
                TimerState::Running => ("Space", "Pause"),
                TimerState::Paused => ("Space", "Resume"),
                TimerState::Idle => ("Space", "Start"),
            };
            let mut shortcuts = vec![toggle];
            if state != TimerState::Idle {
                shortcuts.push(("x", "Stop"));
            } else {
                shortcuts.push(("e", "Edit details"));
            }
            shortcuts.extend([
                ("↑↓", "Select"),
                ("d", "Delete"),
                ("i", "Invoice"),
                ("q", "Quit"),
            ]);
            shortcuts
        }
        Screen::EditDraft { .. } => vec![
            ("Enter", "Save"),
            ("Tab", "Save & next"),
            ("Esc", "Cancel"),
        ],
        Screen::ConfirmDelete { .. } => vec![("y", "Delete"), ("n/Esc", "Keep")],
    }
}

pub fn render_shortcuts(f: &mut Frame, area: Rect, shortcuts: &[(&str, &str)]) {
    let mut spans = Vec::with_capacity(shortcuts.len() * 3);
    for (i, (key, action)) in shortcuts.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  │  ", Styles::secondary()));
        }
        spans.push(Span::styled(key.to_string(), Styles::key()));
        spans.push(Span::styled(format!(" {}", action), Styles::secondary()));
    }
    let paragraph = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::TOP).border_style(Styles::border()))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::draft::SessionDraft;
    use crate::kv::MemoryKv;
    use crate::tracker::Tracker;
    use chrono::Utc;
    use std::time::Instant;

    #[test]
    fn test_shortcuts_follow_timer_state() {
        let tracker = Tracker::load(Box::new(MemoryKv::new()), SessionDraft::default());
        let mut app = AppState::new(tracker, Config::default());
        assert!(get_shortcuts(&app).contains(&("Space", "Start")));
        assert!(get_shortcuts(&app).contains(&("e", "Edit details")));

        app.toggle_timer(Utc::now(), Instant::now());
        let shortcuts = get_shortcuts(&app);
        assert!(shortcuts.contains(&("Space", "Pause")));
        assert!(shortcuts.contains(&("x", "Stop")));
    }
}
