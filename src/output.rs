use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::session::{FinalizedSession, Screenshot};
use crate::store::Totals;
use crate::theme::Theme;
use crate::time_utils::{
    elapsed_to_clock, format_currency, format_duration, format_short_date, format_time_of_day,
};
use crate::tracker::Tracker;

/// Output verbosity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Quiet,       // Only errors
    Normal,      // Standard output
    Verbose,     // More details
    VeryVerbose, // All details including screenshot ids
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonStatus {
    state: String,
    elapsed_ms: u64,
    elapsed: String,
    hourly_rate: f64,
    amount: f64,
    project_name: String,
    notes: String,
    session_id: Option<String>,
    started_at: Option<DateTime<Utc>>,
    screenshots: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonHistory<'a> {
    version: String,
    timestamp: String,
    sessions: &'a [FinalizedSession],
    totals: Totals,
}

pub fn print_status(tracker: &Tracker, now: DateTime<Utc>, mode: OutputMode) {
    if mode == OutputMode::Quiet {
        return;
    }

    let state = tracker.state();
    let elapsed = tracker.elapsed_at(now);
    let draft = tracker.draft();

    println!();
    println!(
        "  {}  {}",
        Theme::header(&elapsed_to_clock(elapsed)),
        Theme::state(state.label())
    );
    println!("{}", Theme::divider(40));

    match tracker.timer().current_session() {
        Some(session) => {
            println!("  {:<10} {}", Theme::muted("Project"), Theme::project(session.display_name()));
            println!(
                "  {:<10} {} at {}",
                Theme::muted("Started"),
                format_short_date(&session.start_time),
                format_time_of_day(&session.start_time)
            );
            if !session.notes.is_empty() {
                println!("  {:<10} {}", Theme::muted("Notes"), session.notes);
            }
            if !session.screenshots.is_empty() {
                println!(
                    "  {:<10} {}",
                    Theme::muted("Shots"),
                    session.screenshots.len()
                );
            }
        }
        None => {
            let name = if draft.project_name.trim().is_empty() {
                "Unnamed Project"
            } else {
                draft.project_name.as_str()
            };
            println!("  {:<10} {}", Theme::muted("Project"), Theme::project(name));
            if !draft.notes.is_empty() {
                println!("  {:<10} {}", Theme::muted("Notes"), draft.notes);
            }
        }
    }

    println!(
        "  {:<10} {}/hour",
        Theme::muted("Rate"),
        format_currency(tracker.effective_rate())
    );
    println!(
        "  {:<10} {}",
        Theme::muted("Amount"),
        Theme::money(&format_currency(tracker.live_amount(now)))
    );
    println!();
}

pub fn print_status_json(tracker: &Tracker, now: DateTime<Utc>) -> anyhow::Result<()> {
    let session = tracker.timer().current_session();
    let draft = tracker.draft();
    let elapsed = tracker.elapsed_at(now);
    let status = JsonStatus {
        state: tracker.state().label().to_lowercase(),
        elapsed_ms: elapsed,
        elapsed: elapsed_to_clock(elapsed),
        hourly_rate: tracker.effective_rate(),
        amount: tracker.live_amount(now),
        project_name: session
            .map(|s| s.project_name.clone())
            .unwrap_or_else(|| draft.project_name.clone()),
        notes: session
            .map(|s| s.notes.clone())
            .unwrap_or_else(|| draft.notes.clone()),
        session_id: session.map(|s| s.id.to_string()),
        started_at: session.map(|s| s.start_time),
        screenshots: session.map(|s| s.screenshots.len()).unwrap_or(0),
    };
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}

pub fn print_history(sessions: &[FinalizedSession], mode: OutputMode) {
    if mode == OutputMode::Quiet {
        return;
    }

    println!();
    println!("{}", Theme::header("Session History"));
    println!("{}", Theme::divider_bold(72));

    if sessions.is_empty() {
        println!();
        println!("  {}", Theme::muted("No sessions recorded yet"));
        println!(
            "  {}",
            Theme::muted("Start tracking time to see your session history here")
        );
        println!();
        return;
    }

    println!(
        "{:<15} {:<14} {:<24} {:>8} {:>10}",
        Theme::primary("ID"),
        Theme::primary("Date"),
        Theme::primary("Project"),
        Theme::primary("Time"),
        Theme::primary("Amount")
    );
    println!("{}", Theme::divider(72));

    for session in sessions {
        println!(
            "{:<15} {:<14} {:<24} {:>8} {:>10}",
            Theme::muted(session.id().as_str()),
            format_short_date(&session.start_time),
            Theme::project(&truncate(session.display_name(), 24)),
            Theme::duration(&format_duration(session.duration)),
            Theme::money(&format_currency(session.amount))
        );

        if mode != OutputMode::Normal && !session.notes.is_empty() {
            println!("  {}", Theme::muted(&session.notes));
        }
        if mode == OutputMode::VeryVerbose {
            print_screenshot_lines(&session.screenshots);
        }
    }

    let totals = Totals::of(sessions);
    println!("{}", Theme::divider(72));
    println!(
        "{:<55} {:>8} {:>10}",
        Theme::primary(&format!("Total ({} sessions)", sessions.len())),
        Theme::duration(&format_duration(totals.duration_ms)),
        Theme::money(&format_currency(totals.amount))
    );
    println!();
}

pub fn print_history_json(sessions: &[FinalizedSession]) -> anyhow::Result<()> {
    let output = JsonHistory {
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339(),
        sessions,
        totals: Totals::of(sessions),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub fn print_screenshot_lines(screenshots: &[Screenshot]) {
    for shot in screenshots {
        println!(
            "  {} {} {}",
            Theme::muted("•"),
            Theme::muted(&shot.id),
            shot.caption
        );
    }
}

/// Print the record a stop produced
pub fn print_stopped(session: Option<&FinalizedSession>, mode: OutputMode) {
    if mode == OutputMode::Quiet {
        return;
    }
    match session {
        Some(s) => println!(
            "{} {} · {} · {}",
            Theme::success("Saved"),
            Theme::project(s.display_name()),
            Theme::duration(&elapsed_to_clock(s.duration)),
            Theme::money(&format_currency(s.amount))
        ),
        None => println!("{}", Theme::muted("Nothing to save: no time was tracked")),
    }
}

/// Shorten `text` to at most `max` characters, marking the cut with `…`
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly10!", 10), "exactly10!");
        assert_eq!(truncate("a much longer project name", 10), "a much lo…");
    }
}
