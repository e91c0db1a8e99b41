//! Tracker: the timer, its draft and the session history behind one handle
//!
//! Both the CLI and the TUI drive the tracker. Every mutation persists what it
//! touched, so a process can exit at any point and the next one picks up the
//! same timer and history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::draft::{DraftUpdate, SessionDraft};
use crate::error::Result;
use crate::kv::KvStore;
use crate::session::{FinalizedSession, Screenshot, SessionId};
use crate::store::SessionStore;
use crate::timer::{Timer, TimerState};

/// Key the active timer is stored under
pub const TIMER_KEY: &str = "activeTimer";

/// Persisted form of the timer and the draft it was started from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub timer: Timer,
    pub draft: SessionDraft,
}

pub struct Tracker {
    timer: Timer,
    draft: SessionDraft,
    store: SessionStore,
}

impl Tracker {
    /// Load history and the saved timer from `backend`
    ///
    /// A missing or malformed timer snapshot yields an idle timer with
    /// `default_draft`.
    pub fn load(backend: Box<dyn KvStore>, default_draft: SessionDraft) -> Self {
        let snapshot = match backend.get(TIMER_KEY) {
            Ok(Some(blob)) => match serde_json::from_str::<TimerSnapshot>(&blob) {
                Ok(snapshot) => Some(snapshot),
                Err(e) => {
                    warn!(error = %e, "saved timer is malformed, starting idle");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "failed to read saved timer, starting idle");
                None
            }
        };
        let (timer, draft) = match snapshot {
            Some(s) => (s.timer, s.draft),
            None => (Timer::Idle, default_draft),
        };
        Self {
            timer,
            draft,
            store: SessionStore::load(backend),
        }
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    pub fn state(&self) -> TimerState {
        self.timer.state()
    }

    pub fn draft(&self) -> &SessionDraft {
        &self.draft
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn elapsed_at(&self, now: DateTime<Utc>) -> u64 {
        self.timer.elapsed_at(now)
    }

    pub fn live_amount(&self, now: DateTime<Utc>) -> f64 {
        self.timer.live_amount(now, &self.draft)
    }

    pub fn effective_rate(&self) -> f64 {
        self.timer.effective_rate(&self.draft)
    }

    /// Start a new session or resume the paused one
    pub fn start(&mut self, now: DateTime<Utc>) -> Result<()> {
        let store = &self.store;
        let id = SessionId::unique_from_time(&now, |id| store.contains(id));
        self.transition(|timer, draft| timer.start(draft, id, now));
        self.save_timer()
    }

    pub fn pause(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.transition(|timer, _| timer.pause(now));
        self.save_timer()
    }

    /// Stop the timer, storing the finished session if it has any time on it
    ///
    /// The history and the idle timer are written in one batch. On failure
    /// the timer keeps running (or stays paused) so the stop can be retried.
    pub fn stop(&mut self, now: DateTime<Utc>) -> Result<Option<FinalizedSession>> {
        let (timer, finalized) = self.timer.clone().stop(now);
        let snapshot = encode_snapshot(&timer, &self.draft)?;
        match finalized {
            Some(ref session) => {
                self.store
                    .append_with(session.clone(), &[(TIMER_KEY, snapshot.as_str())])?;
                info!(id = %session.id(), duration = session.duration, "session saved");
            }
            None => self.store.backend_mut().set(TIMER_KEY, &snapshot)?,
        }
        self.timer = timer;
        Ok(finalized)
    }

    pub fn delete_session(&mut self, id: &SessionId) -> Result<bool> {
        let removed = self.store.delete(id)?;
        if removed {
            info!(%id, "session deleted");
        }
        Ok(removed)
    }

    /// Edit the draft; refused while a session is in progress
    pub fn update_draft(&mut self, update: DraftUpdate) -> Result<()> {
        if update.is_empty() {
            return Ok(());
        }
        self.draft.apply(update, self.timer.inputs_locked())?;
        self.save_timer()
    }

    /// Attach a screenshot to the current session, returning its id
    pub fn attach_screenshot(&mut self, screenshot: Screenshot) -> Result<String> {
        let id = self.timer.attach_screenshot(screenshot)?;
        self.save_timer()?;
        Ok(id)
    }

    pub fn remove_screenshot(&mut self, id: &str) -> Result<bool> {
        let removed = self.timer.remove_screenshot(id)?;
        if removed {
            self.save_timer()?;
        }
        Ok(removed)
    }

    fn transition<F>(&mut self, f: F)
    where
        F: FnOnce(Timer, &SessionDraft) -> Timer,
    {
        let timer = std::mem::take(&mut self.timer);
        self.timer = f(timer, &self.draft);
    }

    fn save_timer(&mut self) -> Result<()> {
        let blob = encode_snapshot(&self.timer, &self.draft)?;
        self.store.backend_mut().set(TIMER_KEY, &blob)
    }
}

fn encode_snapshot(timer: &Timer, draft: &SessionDraft) -> Result<String> {
    let snapshot = TimerSnapshot {
        timer: timer.clone(),
        draft: draft.clone(),
    };
    Ok(serde_json::to_string(&snapshot)?)
}
