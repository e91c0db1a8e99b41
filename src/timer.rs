//! Session timer state machine
//!
//! The timer is a value: every transition consumes the current [`Timer`] and
//! returns the next one. The caller supplies the current instant, which keeps
//! the transitions deterministic and lets the CLI persist the timer between
//! invocations.
//!
//! ```text
//!            start                 pause
//!   Idle ───────────► Running ◄──────────► Paused
//!    ▲                   │        start       │
//!    └───────────────────┴────────────────────┘
//!                         stop
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::draft::SessionDraft;
use crate::error::{BilltimeError, Result};
use crate::session::{FinalizedSession, Screenshot, Session, SessionId};
use crate::time_utils::{compute_amount, millis_between};

/// Lifecycle state without the attached data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running,
    Paused,
}

impl TimerState {
    pub fn label(&self) -> &'static str {
        match self {
            TimerState::Idle => "Idle",
            TimerState::Running => "Running",
            TimerState::Paused => "Paused",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum Timer {
    /// No current session and nothing accumulated
    #[default]
    Idle,
    /// A run segment has been open since `segment_start`
    #[serde(rename_all = "camelCase")]
    Running {
        session: Session,
        /// Milliseconds accumulated by closed run segments
        elapsed: u64,
        segment_start: DateTime<Utc>,
    },
    #[serde(rename_all = "camelCase")]
    Paused { session: Session, elapsed: u64 },
}

impl Timer {
    pub fn state(&self) -> TimerState {
        match self {
            Timer::Idle => TimerState::Idle,
            Timer::Running { .. } => TimerState::Running,
            Timer::Paused { .. } => TimerState::Paused,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Timer::Running { .. })
    }

    /// Session details may only be edited while idle
    pub fn inputs_locked(&self) -> bool {
        !matches!(self, Timer::Idle)
    }

    pub fn current_session(&self) -> Option<&Session> {
        match self {
            Timer::Idle => None,
            Timer::Running { session, .. } | Timer::Paused { session, .. } => Some(session),
        }
    }

    fn current_session_mut(&mut self) -> Option<&mut Session> {
        match self {
            Timer::Idle => None,
            Timer::Running { session, .. } | Timer::Paused { session, .. } => Some(session),
        }
    }

    /// Start a new session or resume a paused one
    ///
    /// `new_id` is only consulted when a session is created. The draft is
    /// ignored when resuming, so stale values are harmless.
    pub fn start(self, draft: &SessionDraft, new_id: SessionId, now: DateTime<Utc>) -> Timer {
        match self {
            Timer::Idle => {
                let session = Session::new(
                    new_id,
                    &draft.project_name,
                    draft.hourly_rate,
                    &draft.notes,
                    now,
                );
                debug!(id = %session.id, rate = session.hourly_rate, "session started");
                Timer::Running {
                    session,
                    elapsed: 0,
                    segment_start: now,
                }
            }
            Timer::Paused { session, elapsed } => {
                debug!(id = %session.id, elapsed, "session resumed");
                Timer::Running {
                    session,
                    elapsed,
                    segment_start: now,
                }
            }
            running @ Timer::Running { .. } => running,
        }
    }

    /// Close the open run segment. Only meaningful while running.
    pub fn pause(self, now: DateTime<Utc>) -> Timer {
        match self {
            Timer::Running {
                session,
                elapsed,
                segment_start,
            } => {
                let elapsed = elapsed + millis_between(&segment_start, &now);
                debug!(id = %session.id, elapsed, "session paused");
                Timer::Paused { session, elapsed }
            }
            other => other,
        }
    }

    /// Finalize the current session and return to idle
    ///
    /// Returns `None` when there is no session or nothing was accumulated;
    /// zero-length sessions are discarded rather than stored.
    pub fn stop(self, now: DateTime<Utc>) -> (Timer, Option<FinalizedSession>) {
        let (session, elapsed) = match self.pause(now) {
            Timer::Paused { session, elapsed } => (session, elapsed),
            _ => return (Timer::Idle, None),
        };

        if elapsed == 0 {
            debug!(id = %session.id, "discarding zero-length session");
            return (Timer::Idle, None);
        }

        let finalized = session.finalize(elapsed, now);
        debug!(
            id = %finalized.id(),
            duration = finalized.duration,
            amount = finalized.amount,
            "session stopped"
        );
        (Timer::Idle, Some(finalized))
    }

    /// Total accumulated time as of `now`, including the open run segment
    pub fn elapsed_at(&self, now: DateTime<Utc>) -> u64 {
        match self {
            Timer::Idle => 0,
            Timer::Running {
                elapsed,
                segment_start,
                ..
            } => elapsed + millis_between(segment_start, &now),
            Timer::Paused { elapsed, .. } => *elapsed,
        }
    }

    /// Rate that applies to the time shown on screen
    ///
    /// The session's frozen rate when one exists, otherwise the draft's.
    pub fn effective_rate(&self, draft: &SessionDraft) -> f64 {
        self.current_session()
            .map(|s| s.hourly_rate)
            .unwrap_or(draft.hourly_rate)
    }

    pub fn live_amount(&self, now: DateTime<Utc>, draft: &SessionDraft) -> f64 {
        compute_amount(self.elapsed_at(now), self.effective_rate(draft))
    }

    /// Attach a screenshot to the current session, returning its id
    pub fn attach_screenshot(&mut self, screenshot: Screenshot) -> Result<String> {
        let session = self
            .current_session_mut()
            .ok_or(BilltimeError::NoActiveSession)?;
        Ok(session.add_screenshot(screenshot))
    }

    /// Remove a screenshot from the current session, returning whether it existed
    pub fn remove_screenshot(&mut self, id: &str) -> Result<bool> {
        let session = self
            .current_session_mut()
            .ok_or(BilltimeError::NoActiveSession)?;
        Ok(session.remove_screenshot(id))
    }
}
