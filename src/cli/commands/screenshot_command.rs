//! Screenshot command feature.
//!
//! This module owns and handles the "billtime screenshot" command behavior.

use chrono::{DateTime, Utc};

use crate::cli::ScreenshotAction;
use crate::output::{self, OutputMode};
use crate::screenshot;
use crate::theme::Theme;
use crate::tracker::Tracker;

pub(crate) fn handle_screenshot(
    tracker: &mut Tracker,
    action: ScreenshotAction,
    now: DateTime<Utc>,
    output_mode: OutputMode,
) -> anyhow::Result<()> {
    match action {
        ScreenshotAction::Add { file, caption } => {
            // Checked before reading so a large image is not loaded for nothing
            if tracker.timer().current_session().is_none() {
                return Err(crate::error::BilltimeError::NoActiveSession.into());
            }
            let shot = screenshot::load_from_file(&file, &caption, now)?;
            let id = tracker.attach_screenshot(shot)?;
            if output_mode != OutputMode::Quiet {
                println!("{} screenshot {}", Theme::success("Attached"), id);
            }
            Ok(())
        }
        ScreenshotAction::Remove { id } => {
            if tracker.remove_screenshot(&id)? {
                if output_mode != OutputMode::Quiet {
                    println!("{} screenshot {}", Theme::success("Removed"), id);
                }
            } else {
                eprintln!("{} No screenshot with id {}", Theme::warning("Warning:"), id);
            }
            Ok(())
        }
        ScreenshotAction::List => {
            let Some(session) = tracker.timer().current_session() else {
                println!("{}", Theme::muted("No active session"));
                return Ok(());
            };
            if session.screenshots.is_empty() {
                println!("{}", Theme::muted("No screenshots attached"));
            } else {
                output::print_screenshot_lines(&session.screenshots);
            }
            Ok(())
        }
    }
}
