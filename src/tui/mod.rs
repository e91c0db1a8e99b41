//! Interactive terminal timer

pub mod events;
pub mod screens;
pub mod state;
pub mod theme;
pub mod widgets;

use anyhow::Result;
use chrono::Utc;
use crossterm::event::{self, Event};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::cli::open_tracker;
use crate::config::Config;
use crate::logging;
use state::AppState;

/// Longest wait for input while no tick is armed
const IDLE_POLL: Duration = Duration::from_millis(500);

/// Restores the terminal even when the loop returns early
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        ratatui::restore();
    }
}

/// Run the TUI until the user quits
pub fn run(data_dir: Option<PathBuf>) -> Result<()> {
    let config = Config::load();
    let dir = config.data_dir(data_dir)?;
    let tracker = open_tracker(&config, Some(dir.clone()))?;
    logging::init_for_tui(&dir);
    let mut app_state = AppState::new(tracker, config);

    let mut terminal = ratatui::init();
    let _guard = TerminalGuard;

    let mut redraw = true;
    while !app_state.should_quit {
        if redraw {
            terminal.draw(|f| screens::render(f, &mut app_state))?;
            redraw = false;
        }

        let timeout = app_state
            .ticks
            .next_deadline(Instant::now())
            .unwrap_or(IDLE_POLL);

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    events::handle_key(&mut app_state, key, Utc::now(), Instant::now());
                    redraw = true;
                }
                Event::Resize(_, _) => redraw = true,
                _ => {}
            }
        }

        if app_state.on_tick(Utc::now(), Instant::now()) {
            redraw = true;
        }
    }

    Ok(())
}
