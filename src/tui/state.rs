//! TUI application state

use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::time::Instant;

use crate::config::Config;
use crate::draft::DraftUpdate;
use crate::invoice::{self, InvoiceDetails};
use crate::session::SessionId;
use crate::tick::DisplayTicks;
use crate::time_utils::elapsed_to_clock;
use crate::timer::TimerState;
use crate::tracker::Tracker;

/// Draft field being edited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Project,
    Rate,
    Notes,
}

impl DraftField {
    pub fn label(&self) -> &'static str {
        match self {
            DraftField::Project => "Project Name",
            DraftField::Rate => "Hourly Rate ($)",
            DraftField::Notes => "Notes",
        }
    }

    pub fn next(&self) -> DraftField {
        match self {
            DraftField::Project => DraftField::Rate,
            DraftField::Rate => DraftField::Notes,
            DraftField::Notes => DraftField::Project,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    /// Timer, summary, draft and history
    Main,
    /// Editing one draft field
    EditDraft { field: DraftField, buffer: String },
    /// Waiting for confirmation before deleting a session
    ConfirmDelete { id: SessionId },
}

pub struct AppState {
    pub screen: Screen,
    pub tracker: Tracker,
    pub config: Config,
    pub ticks: DisplayTicks,
    /// `HH:MM:SS` shown in the timer panel, refreshed by the timer tick
    pub timer_display: String,
    /// Elapsed ms shown in the summary panel, refreshed by the summary tick
    pub summary_elapsed: u64,
    pub history_cursor: usize,
    pub message: Option<String>,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(tracker: Tracker, config: Config) -> Self {
        let ticks = DisplayTicks::new(config.display.timer_tick(), config.display.summary_tick());
        let mut state = Self {
            screen: Screen::Main,
            tracker,
            config,
            ticks,
            timer_display: elapsed_to_clock(0),
            summary_elapsed: 0,
            history_cursor: 0,
            message: None,
            should_quit: false,
        };
        state.after_transition(Utc::now(), Instant::now());
        state
    }

    /// Re-arm or cancel ticks and refresh both displays
    fn after_transition(&mut self, now: DateTime<Utc>, instant: Instant) {
        self.ticks.sync(self.tracker.state(), instant);
        let elapsed = self.tracker.elapsed_at(now);
        self.timer_display = elapsed_to_clock(elapsed);
        self.summary_elapsed = elapsed;
        self.clamp_cursor();
    }

    /// Apply any tick that is due; returns whether a redraw is needed
    pub fn on_tick(&mut self, now: DateTime<Utc>, instant: Instant) -> bool {
        let fired = self.ticks.poll(instant);
        if fired.timer {
            self.timer_display = elapsed_to_clock(self.tracker.elapsed_at(now));
        }
        if fired.summary {
            self.summary_elapsed = self.tracker.elapsed_at(now);
        }
        fired.any()
    }

    pub fn state(&self) -> TimerState {
        self.tracker.state()
    }

    /// Amount for the time shown in the summary panel
    pub fn summary_amount(&self) -> f64 {
        crate::time_utils::compute_amount(self.summary_elapsed, self.tracker.effective_rate())
    }

    pub fn toggle_timer(&mut self, now: DateTime<Utc>, instant: Instant) {
        let result = if self.tracker.timer().is_running() {
            self.tracker.pause(now)
        } else {
            self.tracker.start(now)
        };
        if let Err(e) = result {
            self.message = Some(format!("Failed to save timer: {}", e));
        } else {
            self.message = None;
        }
        self.after_transition(now, instant);
    }

    pub fn stop_timer(&mut self, now: DateTime<Utc>, instant: Instant) {
        match self.tracker.stop(now) {
            Ok(Some(session)) => {
                self.message = Some(format!(
                    "Saved {} ({})",
                    session.display_name(),
                    elapsed_to_clock(session.duration)
                ));
                self.history_cursor = 0;
            }
            Ok(None) => self.message = None,
            Err(e) => self.message = Some(format!("Failed to save session: {}", e)),
        }
        self.after_transition(now, instant);
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.tracker.store().len();
        if len == 0 {
            self.history_cursor = 0;
            return;
        }
        let max = len as isize - 1;
        self.history_cursor = (self.history_cursor as isize + delta).clamp(0, max) as usize;
    }

    fn clamp_cursor(&mut self) {
        let len = self.tracker.store().len();
        if self.history_cursor >= len {
            self.history_cursor = len.saturating_sub(1);
        }
    }

    pub fn selected_session_id(&self) -> Option<SessionId> {
        self.tracker
            .store()
            .list()
            .get(self.history_cursor)
            .map(|s| s.id().clone())
    }

    pub fn request_delete(&mut self) {
        if let Some(id) = self.selected_session_id() {
            self.screen = Screen::ConfirmDelete { id };
        }
    }

    pub fn confirm_delete(&mut self) {
        if let Screen::ConfirmDelete { id } = std::mem::replace(&mut self.screen, Screen::Main) {
            match self.tracker.delete_session(&id) {
                Ok(true) => self.message = Some("Session deleted".to_string()),
                Ok(false) => {}
                Err(e) => self.message = Some(format!("Failed to delete session: {}", e)),
            }
            self.clamp_cursor();
        }
    }

    /// Open the editor for a draft field; refused while a session exists
    pub fn begin_edit(&mut self, field: DraftField) {
        if self.tracker.timer().inputs_locked() {
            self.message = Some("Stop the timer to change session details".to_string());
            return;
        }
        let draft = self.tracker.draft();
        let buffer = match field {
            DraftField::Project => draft.project_name.clone(),
            DraftField::Rate => format!("{}", draft.hourly_rate),
            DraftField::Notes => draft.notes.clone(),
        };
        self.screen = Screen::EditDraft { field, buffer };
    }

    /// Save the field being edited and move to the next one
    pub fn commit_edit(&mut self, advance: bool) {
        let Screen::EditDraft { field, buffer } = std::mem::replace(&mut self.screen, Screen::Main)
        else {
            return;
        };
        let update = match field {
            DraftField::Project => DraftUpdate {
                project_name: Some(buffer),
                ..DraftUpdate::default()
            },
            DraftField::Rate => DraftUpdate {
                rate_input: Some(buffer),
                ..DraftUpdate::default()
            },
            DraftField::Notes => DraftUpdate {
                notes: Some(buffer),
                ..DraftUpdate::default()
            },
        };
        if let Err(e) = self.tracker.update_draft(update) {
            self.message = Some(e.to_string());
            return;
        }
        if advance {
            self.begin_edit(field.next());
        }
    }

    pub fn cancel_edit(&mut self) {
        self.screen = Screen::Main;
    }

    /// Write an invoice for every saved session into the working directory
    pub fn write_invoice(&mut self, now: DateTime<Utc>) {
        let sessions = self.tracker.store().select(&[]);
        if sessions.is_empty() {
            self.message = Some("No sessions to invoice".to_string());
            return;
        }
        let details = InvoiceDetails::new(now, &self.config.invoice);
        let path = PathBuf::from(details.file_name());
        let html = invoice::render_html(&details, &sessions);
        self.message = Some(match invoice::write_invoice(&path, &html) {
            Ok(()) => format!("Invoice written to {}", path.display()),
            Err(e) => format!("Failed to write invoice: {}", e),
        });
    }
}
