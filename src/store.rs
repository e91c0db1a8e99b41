//! Finalized session history
//!
//! Sessions are kept newest first. The whole list is written back to the
//! key-value backend after every mutation and read once at load.

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::Result;
use crate::kv::KvStore;
use crate::session::{FinalizedSession, SessionId};
use crate::time_utils::round_cents;

/// Key the session list is stored under
pub const SESSIONS_KEY: &str = "timeTrackerSessions";

/// Aggregate duration and amount over a set of sessions
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Totals {
    pub duration_ms: u64,
    pub amount: f64,
}

impl Totals {
    pub fn of<'a, I>(sessions: I) -> Self
    where
        I: IntoIterator<Item = &'a FinalizedSession>,
    {
        let (duration_ms, amount) = sessions
            .into_iter()
            .fold((0u64, 0.0f64), |(d, a), s| (d + s.duration, a + s.amount));
        Self {
            duration_ms,
            amount: round_cents(amount),
        }
    }
}

pub struct SessionStore {
    sessions: Vec<FinalizedSession>,
    backend: Box<dyn KvStore>,
}

impl SessionStore {
    /// Load the stored sessions from `backend`
    ///
    /// Unreadable or malformed data is logged and treated as an empty history.
    pub fn load(backend: Box<dyn KvStore>) -> Self {
        let sessions = match backend.get(SESSIONS_KEY) {
            Ok(Some(blob)) => decode_sessions(&blob),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "failed to read saved sessions, starting empty");
                Vec::new()
            }
        };
        debug!(count = sessions.len(), "loaded session history");
        Self { sessions, backend }
    }

    /// Insert a finalized session at the head and save
    ///
    /// The session is kept in memory even if saving fails.
    pub fn append(&mut self, session: FinalizedSession) -> Result<()> {
        self.sessions.insert(0, session);
        self.save()
    }

    /// Insert a finalized session and write the history together with
    /// `extra` entries in one batch
    ///
    /// If the batch fails nothing was written, and the session is taken back
    /// out so memory matches what is stored.
    pub fn append_with(
        &mut self,
        session: FinalizedSession,
        extra: &[(&str, &str)],
    ) -> Result<()> {
        self.sessions.insert(0, session);
        let written: Result<()> = serde_json::to_string(&self.sessions)
            .map_err(Into::into)
            .and_then(|blob| {
                let mut entries = vec![(SESSIONS_KEY, blob.as_str())];
                entries.extend_from_slice(extra);
                self.backend.set_many(&entries)
            });
        if written.is_err() {
            self.sessions.remove(0);
        }
        written
    }

    /// Delete the session with `id`, returning whether one was removed
    ///
    /// Unknown ids leave the history untouched and nothing is written.
    pub fn delete(&mut self, id: &SessionId) -> Result<bool> {
        let Some(index) = self.sessions.iter().position(|s| s.id() == id) else {
            return Ok(false);
        };
        self.sessions.remove(index);
        self.save()?;
        Ok(true)
    }

    /// Sessions, newest first
    pub fn list(&self) -> &[FinalizedSession] {
        &self.sessions
    }

    pub fn get(&self, id: &SessionId) -> Option<&FinalizedSession> {
        self.sessions.iter().find(|s| s.id() == id)
    }

    pub fn contains(&self, id: &SessionId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn totals(&self) -> Totals {
        Totals::of(&self.sessions)
    }

    /// Sessions whose id is in `ids`, in history order. No ids selects all.
    pub fn select(&self, ids: &[SessionId]) -> Vec<FinalizedSession> {
        self.sessions
            .iter()
            .filter(|s| ids.is_empty() || ids.contains(s.id()))
            .cloned()
            .collect()
    }

    fn save(&mut self) -> Result<()> {
        let blob = serde_json::to_string(&self.sessions)?;
        self.backend.set(SESSIONS_KEY, &blob)?;
        Ok(())
    }

    /// Hand back the backend, e.g. to persist the active timer alongside
    pub fn backend_mut(&mut self) -> &mut dyn KvStore {
        self.backend.as_mut()
    }

    pub fn backend(&self) -> &dyn KvStore {
        self.backend.as_ref()
    }
}

fn decode_sessions(blob: &str) -> Vec<FinalizedSession> {
    match serde_json::from_str::<Vec<FinalizedSession>>(blob) {
        Ok(sessions) => sessions,
        Err(e) => {
            warn!(error = %e, "saved sessions are malformed, starting empty");
            Vec::new()
        }
    }
}
