//! Printable HTML invoices built from stored sessions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::Path;

use crate::config::InvoiceConfig;
use crate::error::Result;
use crate::session::FinalizedSession;
use crate::store::Totals;
use crate::time_utils::{
    add_days, format_currency, format_date, format_duration, format_short_date,
    generate_invoice_number,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceDetails {
    pub invoice_number: String,
    pub date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub client_name: String,
    pub client_email: String,
    pub client_address: String,
    pub your_name: String,
    pub your_email: String,
    pub your_address: String,
    pub payment_details: String,
    pub notes: String,
}

impl InvoiceDetails {
    /// Fresh invoice dated `now`, with sender details from the config
    pub fn new(now: DateTime<Utc>, config: &InvoiceConfig) -> Self {
        Self {
            invoice_number: generate_invoice_number(&now),
            date: now,
            due_date: add_days(&now, config.due_days),
            client_name: String::new(),
            client_email: String::new(),
            client_address: String::new(),
            your_name: config.your_name.clone(),
            your_email: config.your_email.clone(),
            your_address: config.your_address.clone(),
            payment_details: config.payment_details.clone(),
            notes: String::new(),
        }
    }

    /// Default output file name, e.g. `invoice-INV-20250305-1234.html`
    pub fn file_name(&self) -> String {
        let safe: String = self
            .invoice_number
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        format!("invoice-{}.html", safe)
    }
}

const STYLE: &str = "\
body { font-family: Arial, sans-serif; margin: 0; padding: 20px; }
.invoice-container { max-width: 800px; margin: 0 auto; }
table { width: 100%; border-collapse: collapse; margin-bottom: 20px; }
th, td { padding: 10px; text-align: left; border-bottom: 1px solid #ddd; }
th { background-color: #f8f9fa; }
.text-right { text-align: right; }
.total-row { font-weight: bold; }
.parties { display: flex; justify-content: space-between; margin-bottom: 30px; }
.screenshot-grid { display: grid; grid-template-columns: repeat(2, 1fr); gap: 15px; }
.screenshot-item { margin-bottom: 15px; }
.screenshot-item img { max-width: 100%; border: 1px solid #ddd; }
.screenshot-caption { margin-top: 5px; font-size: 0.9em; color: #555; }
@media print { button { display: none; } }
";

/// Escape text for HTML element content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Multi-line text with line breaks preserved
fn escape_multiline(text: &str) -> String {
    escape_html(text).replace('\n', "<br>")
}

/// Render the full invoice document for `sessions`
pub fn render_html(details: &InvoiceDetails, sessions: &[FinalizedSession]) -> String {
    let totals = Totals::of(sessions);
    let mut html = String::new();

    // Writing into a String cannot fail
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>Invoice {}</title>\n<style>\n{}</style>\n</head>\n<body>\n<div class=\"invoice-container\">\n",
        escape_html(&details.invoice_number),
        STYLE
    );

    let _ = write!(
        html,
        "<h1>INVOICE</h1>\n<p>Invoice #: {}<br>Date: {}<br>Due Date: {}</p>\n",
        escape_html(&details.invoice_number),
        format_date(&details.date),
        format_date(&details.due_date)
    );

    let _ = write!(
        html,
        "<div class=\"parties\">\n<div>\n<h3>From</h3>\n<p>{}<br>{}<br>{}</p>\n</div>\n<div>\n<h3>Bill To</h3>\n<p>{}<br>{}<br>{}</p>\n</div>\n</div>\n",
        escape_html(&details.your_name),
        escape_html(&details.your_email),
        escape_multiline(&details.your_address),
        escape_html(&details.client_name),
        escape_html(&details.client_email),
        escape_multiline(&details.client_address)
    );

    html.push_str(
        "<table>\n<thead>\n<tr><th>Date</th><th>Project</th><th>Description</th><th class=\"text-right\">Hours</th><th class=\"text-right\">Rate</th><th class=\"text-right\">Amount</th></tr>\n</thead>\n<tbody>\n",
    );
    for session in sessions {
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td class=\"text-right\">{}</td><td class=\"text-right\">{}/hr</td><td class=\"text-right\">{}</td></tr>",
            format_short_date(&session.start_time),
            escape_html(session.display_name()),
            escape_html(&session.notes),
            format_duration(session.duration),
            format_currency(session.hourly_rate),
            format_currency(session.amount)
        );
    }
    let _ = write!(
        html,
        "<tr class=\"total-row\"><td colspan=\"3\">Total</td><td class=\"text-right\">{}</td><td></td><td class=\"text-right\">{}</td></tr>\n</tbody>\n</table>\n",
        format_duration(totals.duration_ms),
        format_currency(totals.amount)
    );

    if !details.payment_details.trim().is_empty() {
        let _ = write!(
            html,
            "<h3>Payment Details</h3>\n<p>{}</p>\n",
            escape_multiline(&details.payment_details)
        );
    }
    if !details.notes.trim().is_empty() {
        let _ = write!(
            html,
            "<h3>Notes</h3>\n<p>{}</p>\n",
            escape_multiline(&details.notes)
        );
    }

    let screenshots: Vec<_> = sessions.iter().flat_map(|s| s.screenshots.iter()).collect();
    if !screenshots.is_empty() {
        html.push_str("<h3>Screenshots</h3>\n<div class=\"screenshot-grid\">\n");
        for shot in screenshots {
            let _ = write!(
                html,
                "<div class=\"screenshot-item\"><img src=\"{}\" alt=\"{}\"><div class=\"screenshot-caption\">{}</div></div>\n",
                escape_html(&shot.data_url),
                escape_html(&shot.caption),
                escape_html(&shot.caption)
            );
        }
        html.push_str("</div>\n");
    }

    html.push_str("</div>\n</body>\n</html>\n");
    html
}

pub fn write_invoice(path: &Path, html: &str) -> Result<()> {
    std::fs::write(path, html)?;
    Ok(())
}
