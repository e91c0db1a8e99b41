//! Keyboard handling

use chrono::{DateTime, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Instant;

use crate::tui::state::{AppState, DraftField, Screen};

/// Apply one key press to the application state
pub fn handle_key(app_state: &mut AppState, key: KeyEvent, now: DateTime<Utc>, instant: Instant) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app_state.should_quit = true;
        return;
    }

    match app_state.screen {
        Screen::Main => handle_main(app_state, key.code, now, instant),
        Screen::EditDraft { .. } => handle_edit(app_state, key.code),
        Screen::ConfirmDelete { .. } => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => app_state.confirm_delete(),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app_state.screen = Screen::Main;
            }
            _ => {}
        },
    }
}

fn handle_edit(app_state: &mut AppState, code: KeyCode) {
    match code {
        KeyCode::Enter => app_state.commit_edit(false),
        KeyCode::Tab => app_state.commit_edit(true),
        KeyCode::Esc => app_state.cancel_edit(),
        KeyCode::Backspace => {
            if let Screen::EditDraft { buffer, .. } = &mut app_state.screen {
                buffer.pop();
            }
        }
        KeyCode::Char(c) => {
            if let Screen::EditDraft { buffer, .. } = &mut app_state.screen {
                buffer.push(c);
            }
        }
        _ => {}
    }
}

fn handle_main(app_state: &mut AppState, code: KeyCode, now: DateTime<Utc>, instant: Instant) {
    match code {
        KeyCode::Char(' ') | KeyCode::Char('s') => app_state.toggle_timer(now, instant),
        KeyCode::Char('x') => app_state.stop_timer(now, instant),
        KeyCode::Char('e') | KeyCode::Char('p') => app_state.begin_edit(DraftField::Project),
        KeyCode::Char('r') => app_state.begin_edit(DraftField::Rate),
        KeyCode::Char('n') => app_state.begin_edit(DraftField::Notes),
        KeyCode::Up | KeyCode::Char('k') => app_state.move_cursor(-1),
        KeyCode::Down | KeyCode::Char('j') => app_state.move_cursor(1),
        KeyCode::Char('d') | KeyCode::Delete => app_state.request_delete(),
        KeyCode::Char('i') => app_state.write_invoice(now),
        KeyCode::Char('q') | KeyCode::Esc => app_state.should_quit = true,
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::draft::SessionDraft;
    use crate::kv::MemoryKv;
    use crate::timer::TimerState;
    use crate::tracker::Tracker;
    use chrono::{Duration as ChronoDuration, TimeZone};

    fn app() -> AppState {
        let tracker = Tracker::load(Box::new(MemoryKv::new()), SessionDraft::default());
        AppState::new(tracker, Config::default())
    }

    fn press(app: &mut AppState, code: KeyCode, ms: i64) {
        let now = Utc.with_ymd_and_hms(2025, 3, 5, 9, 0, 0).unwrap() + ChronoDuration::milliseconds(ms);
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE), now, Instant::now());
    }

    #[test]
    fn test_space_toggles_and_x_stops() {
        let mut app = app();
        press(&mut app, KeyCode::Char(' '), 0);
        assert_eq!(app.state(), TimerState::Running);
        press(&mut app, KeyCode::Char(' '), 1_000);
        assert_eq!(app.state(), TimerState::Paused);
        press(&mut app, KeyCode::Char('x'), 2_000);
        assert_eq!(app.state(), TimerState::Idle);
        assert_eq!(app.tracker.store().len(), 1);
    }

    #[test]
    fn test_typing_into_project_field() {
        let mut app = app();
        press(&mut app, KeyCode::Char('e'), 0);
        // Clear the prefilled value, then type
        while matches!(&app.screen, Screen::EditDraft { buffer, .. } if !buffer.is_empty()) {
            press(&mut app, KeyCode::Backspace, 0);
        }
        for c in "Acme".chars() {
            press(&mut app, KeyCode::Char(c), 0);
        }
        press(&mut app, KeyCode::Enter, 0);
        assert_eq!(app.screen, Screen::Main);
        assert_eq!(app.tracker.draft().project_name, "Acme");
    }

    #[test]
    fn test_escape_in_editor_keeps_draft() {
        let mut app = app();
        press(&mut app, KeyCode::Char('n'), 0);
        press(&mut app, KeyCode::Char('z'), 0);
        press(&mut app, KeyCode::Esc, 0);
        assert_eq!(app.screen, Screen::Main);
        assert_eq!(app.tracker.draft().notes, "");
        assert!(!app.should_quit);
    }

    #[test]
    fn test_delete_needs_confirmation() {
        let mut app = app();
        press(&mut app, KeyCode::Char('s'), 0);
        press(&mut app, KeyCode::Char('x'), 1_000);
        press(&mut app, KeyCode::Char('d'), 2_000);
        press(&mut app, KeyCode::Char('n'), 2_000);
        assert_eq!(app.tracker.store().len(), 1);
        press(&mut app, KeyCode::Char('d'), 2_000);
        press(&mut app, KeyCode::Char('y'), 2_000);
        assert!(app.tracker.store().is_empty());
    }

    #[test]
    fn test_q_quits() {
        let mut app = app();
        press(&mut app, KeyCode::Char('q'), 0);
        assert!(app.should_quit);
    }
}
