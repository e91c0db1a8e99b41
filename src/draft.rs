//! Session details the next timer start will capture

use serde::{Deserialize, Serialize};

use crate::error::{BilltimeError, Result};

pub const DEFAULT_HOURLY_RATE: f64 = 50.0;

/// Project name, hourly rate and notes for the next session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDraft {
    pub project_name: String,
    pub hourly_rate: f64,
    pub notes: String,
}

impl Default for SessionDraft {
    fn default() -> Self {
        Self {
            project_name: String::new(),
            hourly_rate: DEFAULT_HOURLY_RATE,
            notes: String::new(),
        }
    }
}

/// Coerce rate text typed by the user
///
/// Empty input means zero. Anything that is not a finite, non-negative number
/// keeps the previous rate.
pub fn parse_rate_input(input: &str, previous: f64) -> f64 {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => value,
        _ => previous,
    }
}

/// Partial update to a draft; `None` leaves the field unchanged
#[derive(Debug, Default, Clone)]
pub struct DraftUpdate {
    pub project_name: Option<String>,
    pub rate_input: Option<String>,
    pub notes: Option<String>,
}

impl DraftUpdate {
    pub fn is_empty(&self) -> bool {
        self.project_name.is_none() && self.rate_input.is_none() && self.notes.is_none()
    }
}

impl SessionDraft {
    pub fn with_rate(hourly_rate: f64) -> Self {
        Self {
            hourly_rate,
            ..Self::default()
        }
    }

    pub fn set_rate_input(&mut self, input: &str) {
        self.hourly_rate = parse_rate_input(input, self.hourly_rate);
    }

    /// Apply an update, refusing any change while a session is in progress
    ///
    /// Values equal to the current ones are not a change, so repeating the
    /// same project or rate while locked succeeds.
    pub fn apply(&mut self, update: DraftUpdate, locked: bool) -> Result<()> {
        if update.is_empty() {
            return Ok(());
        }
        let mut next = self.clone();
        if let Some(name) = update.project_name {
            next.project_name = name;
        }
        if let Some(rate) = update.rate_input {
            next.set_rate_input(&rate);
        }
        if let Some(notes) = update.notes {
            next.notes = notes;
        }
        if locked && next != *self {
            return Err(BilltimeError::DraftLocked);
        }
        *self = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rate_empty_is_zero() {
        assert_eq!(parse_rate_input("", 50.0), 0.0);
        assert_eq!(parse_rate_input("   ", 50.0), 0.0);
    }

    #[test]
    fn test_parse_rate_valid() {
        assert_eq!(parse_rate_input("75", 50.0), 75.0);
        assert_eq!(parse_rate_input(" 12.5 ", 50.0), 12.5);
    }

    #[test]
    fn test_parse_rate_invalid_keeps_previous() {
        assert_eq!(parse_rate_input("abc", 42.0), 42.0);
        assert_eq!(parse_rate_input("-5", 42.0), 42.0);
        assert_eq!(parse_rate_input("NaN", 42.0), 42.0);
        assert_eq!(parse_rate_input("inf", 42.0), 42.0);
    }

    #[test]
    fn test_apply_update() {
        let mut draft = SessionDraft::default();
        draft
            .apply(
                DraftUpdate {
                    project_name: Some("Acme".into()),
                    rate_input: Some("80".into()),
                    notes: None,
                },
                false,
            )
            .unwrap();
        assert_eq!(draft.project_name, "Acme");
        assert_eq!(draft.hourly_rate, 80.0);
        assert_eq!(draft.notes, "");
    }

    #[test]
    fn test_apply_refused_while_locked() {
        let mut draft = SessionDraft::default();
        let update = DraftUpdate {
            project_name: Some("Acme".into()),
            ..DraftUpdate::default()
        };
        assert!(matches!(draft.apply(update, true), Err(BilltimeError::DraftLocked)));
        assert_eq!(draft, SessionDraft::default());
    }

    #[test]
    fn test_empty_update_allowed_while_locked() {
        let mut draft = SessionDraft::default();
        assert!(draft.apply(DraftUpdate::default(), true).is_ok());
    }

    #[test]
    fn test_unchanged_values_allowed_while_locked() {
        let mut draft = SessionDraft::with_rate(36.0);
        draft.project_name = "Acme".into();
        let update = DraftUpdate {
            project_name: Some("Acme".into()),
            rate_input: Some("36".into()),
            notes: Some(String::new()),
        };
        assert!(draft.apply(update, true).is_ok());

        let changed = DraftUpdate {
            project_name: Some("Acme".into()),
            rate_input: Some("40".into()),
            ..DraftUpdate::default()
        };
        assert!(matches!(draft.apply(changed, true), Err(BilltimeError::DraftLocked)));
        assert_eq!(draft.hourly_rate, 36.0);
    }
}
