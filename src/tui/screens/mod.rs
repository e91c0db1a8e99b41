//! Screen rendering modules

pub mod confirm;
pub mod main;

use ratatui::Frame;
use crate::tui::state::{AppState, Screen};

/// Main render function that dispatches to the appropriate screen
pub fn render(f: &mut Frame, app_state: &mut AppState) {
    match app_state.screen {
        // The draft editor is drawn as part of the main screen
        Screen::Main | Screen::EditDraft { .. } => main::render(f, app_state),
        Screen::ConfirmDelete { .. } => {
            main::render(f, app_state);
            confirm::render(f, app_state);
        }
    }
}
