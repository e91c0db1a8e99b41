//! Error types for the billtime library

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BilltimeError {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to read screenshot {}: {source}", path.display())]
    ScreenshotRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No active session. Start the timer first.")]
    NoActiveSession,

    #[error("Session details can only be changed while the timer is stopped")]
    DraftLocked,
}

pub type Result<T> = std::result::Result<T, BilltimeError>;
