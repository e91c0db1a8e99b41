//! Diagnostic logging
//!
//! CLI logs go to stderr so they never mix with `--json` output. The level follows
//! `-v`/`-q` unless `BILLTIME_LOG` holds an explicit filter.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

use crate::output::OutputMode;

pub const LOG_ENV: &str = "BILLTIME_LOG";
const TUI_LOG_FILE: &str = "billtime-tui.log";

/// Default filter directive for an output mode
pub fn default_directive(mode: OutputMode) -> &'static str {
    match mode {
        OutputMode::Quiet => "billtime=error",
        OutputMode::Normal => "billtime=warn",
        OutputMode::Verbose => "billtime=info",
        OutputMode::VeryVerbose => "billtime=debug",
    }
}

/// Install the global subscriber for CLI runs
pub fn init(mode: OutputMode) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(mode)));

    // A subscriber may already be set (tests, embedding); that is fine.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// File the TUI logs to, inside the data directory
pub fn tui_log_path(data_dir: &Path) -> PathBuf {
    data_dir.join(TUI_LOG_FILE)
}

/// Subscriber for the TUI
///
/// The terminal belongs to the UI, so nothing is logged unless `BILLTIME_LOG`
/// is set, and then only to [`tui_log_path`].
pub fn init_for_tui(data_dir: &Path) {
    let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) else {
        return;
    };
    let file = match OpenOptions::new()
        .create(true)
        .append(true)
        .open(tui_log_path(data_dir))
    {
        Ok(file) => file,
        Err(_) => return,
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_by_mode() {
        assert_eq!(default_directive(OutputMode::Quiet), "billtime=error");
        assert_eq!(default_directive(OutputMode::Normal), "billtime=warn");
        assert_eq!(default_directive(OutputMode::VeryVerbose), "billtime=debug");
    }

    #[test]
    fn test_tui_log_lives_in_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(tui_log_path(dir.path()), dir.path().join("billtime-tui.log"));
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        init(OutputMode::Normal);
        init(OutputMode::Verbose);
    }
}
