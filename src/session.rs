//! Session records
//!
//! A [`Session`] is the work interval currently being timed. Once stopped it is
//! wrapped into a [`FinalizedSession`] carrying the derived duration and amount,
//! and from then on it is only ever read or deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::time_utils::compute_amount;

/// Session identifier, derived from the creation time in milliseconds
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Id for a session created at `now`
    pub fn from_time(now: &DateTime<Utc>) -> Self {
        Self(now.timestamp_millis().to_string())
    }

    /// Id for a session created at `now` that is not already taken
    ///
    /// Collisions are resolved by moving forward one millisecond at a time.
    pub fn unique_from_time<F>(now: &DateTime<Utc>, is_taken: F) -> Self
    where
        F: Fn(&SessionId) -> bool,
    {
        let mut millis = now.timestamp_millis();
        loop {
            let id = Self(millis.to_string());
            if !is_taken(&id) {
                return id;
            }
            millis += 1;
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// An image attached to a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Screenshot {
    pub id: String,
    /// `data:<mime>;base64,...`
    pub data_url: String,
    pub caption: String,
    pub timestamp: DateTime<Utc>,
}

/// A session that is still being timed (running or paused)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: SessionId,
    pub project_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    /// Frozen when the session is created
    pub hourly_rate: f64,
    pub notes: String,
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub screenshots: Vec<Screenshot>,
}

impl Session {
    pub fn new(
        id: SessionId,
        project_name: &str,
        hourly_rate: f64,
        notes: &str,
        start_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            project_name: project_name.to_string(),
            start_time,
            end_time: None,
            hourly_rate,
            notes: notes.to_string(),
            is_active: true,
            screenshots: Vec::new(),
        }
    }

    /// Project name for display, falling back to a placeholder for blank names
    pub fn display_name(&self) -> &str {
        if self.project_name.trim().is_empty() {
            "Unnamed Project"
        } else {
            &self.project_name
        }
    }

    /// Attach a screenshot, returning the id it was stored under
    ///
    /// An id already used on this session is moved forward one millisecond at
    /// a time until it is free.
    pub fn add_screenshot(&mut self, mut screenshot: Screenshot) -> String {
        if self.screenshots.iter().any(|s| s.id == screenshot.id) {
            let mut millis = screenshot.timestamp.timestamp_millis();
            loop {
                let id = millis.to_string();
                if !self.screenshots.iter().any(|s| s.id == id) {
                    screenshot.id = id;
                    break;
                }
                millis += 1;
            }
        }
        let id = screenshot.id.clone();
        self.screenshots.push(screenshot);
        id
    }

    /// Remove a screenshot by id, returning whether one was removed
    pub fn remove_screenshot(&mut self, id: &str) -> bool {
        let before = self.screenshots.len();
        self.screenshots.retain(|s| s.id != id);
        self.screenshots.len() != before
    }

    /// Close the session, computing duration and amount at the frozen rate
    pub fn finalize(mut self, duration_ms: u64, end_time: DateTime<Utc>) -> FinalizedSession {
        self.end_time = Some(end_time);
        self.is_active = false;
        let amount = compute_amount(duration_ms, self.hourly_rate);
        FinalizedSession {
            session: self,
            duration: duration_ms,
            amount,
        }
    }
}

/// A stopped session with its derived duration (ms) and amount (dollars)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalizedSession {
    #[serde(flatten)]
    session: Session,
    pub duration: u64,
    pub amount: f64,
}

impl FinalizedSession {
    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn id(&self) -> &SessionId {
        &self.session.id
    }
}

impl std::ops::Deref for FinalizedSession {
    type Target = Session;

    fn deref(&self) -> &Session {
        &self.session
    }
}
