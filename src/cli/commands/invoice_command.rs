//! Invoice command feature.
//!
//! This module owns and handles the "billtime invoice" command behavior.

use anyhow::Context;
use chrono::{DateTime, Utc};
use std::path::PathBuf;

use crate::config::Config;
use crate::invoice::{self, InvoiceDetails};
use crate::output::OutputMode;
use crate::session::SessionId;
use crate::store::Totals;
use crate::theme::Theme;
use crate::time_utils::{add_days, format_currency, format_duration};
use crate::tracker::Tracker;

pub(crate) struct InvoiceArgs {
    pub sessions: Vec<String>,
    pub output: Option<PathBuf>,
    pub number: Option<String>,
    pub client_name: Option<String>,
    pub client_email: Option<String>,
    pub client_address: Option<String>,
    pub notes: Option<String>,
    pub due_days: Option<i64>,
}

pub(crate) fn build_details(args: &InvoiceArgs, config: &Config, now: DateTime<Utc>) -> InvoiceDetails {
    let mut details = InvoiceDetails::new(now, &config.invoice);
    if let Some(number) = &args.number {
        details.invoice_number = number.clone();
    }
    if let Some(days) = args.due_days {
        details.due_date = add_days(&now, days);
    }
    details.client_name = args.client_name.clone().unwrap_or_default();
    details.client_email = args.client_email.clone().unwrap_or_default();
    details.client_address = args.client_address.clone().unwrap_or_default();
    details.notes = args.notes.clone().unwrap_or_default();
    details
}

pub(crate) fn handle_invoice(
    tracker: &Tracker,
    config: &Config,
    args: InvoiceArgs,
    now: DateTime<Utc>,
    output_mode: OutputMode,
) -> anyhow::Result<()> {
    let ids: Vec<SessionId> = args.sessions.iter().map(|id| SessionId::new(id.as_str())).collect();
    if let Some(missing) = ids.iter().find(|id| !tracker.store().contains(id)) {
        anyhow::bail!("No session with id {}", missing);
    }

    let sessions = tracker.store().select(&ids);
    if sessions.is_empty() {
        anyhow::bail!("No sessions to invoice. Track some time first.");
    }

    let details = build_details(&args, config, now);
    let path = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(details.file_name()));

    let html = invoice::render_html(&details, &sessions);
    invoice::write_invoice(&path, &html)
        .with_context(|| format!("Failed to write invoice to {}", path.display()))?;

    if output_mode != OutputMode::Quiet {
        let totals = Totals::of(&sessions);
        println!(
            "{} invoice {} ({} sessions, {}, {}) to {}",
            Theme::success("Wrote"),
            details.invoice_number,
            sessions.len(),
            format_duration(totals.duration_ms),
            Theme::money(&format_currency(totals.amount)),
            path.display()
        );
        println!("{}", Theme::muted("Open it in a browser to print or save as PDF."));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_build_details_applies_overrides() {
        let now = Utc.with_ymd_and_hms(2025, 3, 5, 12, 0, 0).unwrap();
        let args = InvoiceArgs {
            sessions: vec![],
            output: None,
            number: Some("INV-7".into()),
            client_name: Some("Acme".into()),
            client_email: None,
            client_address: None,
            notes: Some("Thanks!".into()),
            due_days: Some(7),
        };
        let details = build_details(&args, &Config::default(), now);
        assert_eq!(details.invoice_number, "INV-7");
        assert_eq!(details.client_name, "Acme");
        assert_eq!(details.notes, "Thanks!");
        assert_eq!(details.due_date, add_days(&now, 7));
    }
}
