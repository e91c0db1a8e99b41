//! Time and money arithmetic shared by the timer, history and invoice views
//!
//! Everything here is pure. Durations are unsigned milliseconds, amounts are
//! dollars rounded to whole cents.

use chrono::{DateTime, Duration, Local, Timelike, Utc};

pub const MS_PER_SECOND: u64 = 1_000;
pub const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;
pub const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;

/// Format elapsed milliseconds as `HH:MM:SS`
///
/// Hours are not wrapped into days, so 100 hours renders as `100:00:00`.
pub fn elapsed_to_clock(ms: u64) -> String {
    let hours = ms / MS_PER_HOUR;
    let minutes = (ms % MS_PER_HOUR) / MS_PER_MINUTE;
    let seconds = (ms % MS_PER_MINUTE) / MS_PER_SECOND;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Round a dollar value to whole cents, half-up
///
/// The cent value is first snapped to six decimals so a product such as
/// `100.49999999999999` rounds as the `100.5` it stands for.
pub fn round_cents(value: f64) -> f64 {
    let cents = (value * 100.0 * 1e6).round() / 1e6;
    cents.round() / 100.0
}

/// Amount billed for `ms` of work at `hourly_rate`, rounded to cents
pub fn compute_amount(ms: u64, hourly_rate: f64) -> f64 {
    round_cents(ms as f64 * hourly_rate / MS_PER_HOUR as f64)
}

/// Format an amount as `$1,234.50`
pub fn format_currency(amount: f64) -> String {
    let cents = (round_cents(amount) * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    let dollars = group_thousands(cents / 100);
    format!("{}${}.{:02}", sign, dollars, cents % 100)
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Compact duration used in history rows: `2h 5m`, `45m`, `0m`
pub fn format_duration(ms: u64) -> String {
    let hours = ms / MS_PER_HOUR;
    let minutes = (ms % MS_PER_HOUR) / MS_PER_MINUTE;
    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

/// Long date in local time, e.g. `March 5, 2025`
pub fn format_date(timestamp: &DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%B %-d, %Y")
        .to_string()
}

/// Short date in local time, e.g. `Mar 5, 2025`
pub fn format_short_date(timestamp: &DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%b %-d, %Y")
        .to_string()
}

/// Time of day in local time, e.g. `02:30 PM`
pub fn format_time_of_day(timestamp: &DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%I:%M %p")
        .to_string()
}

/// Invoice number of the form `INV-YYYYMMDD-NNNN`
///
/// The suffix comes from the milliseconds elapsed in the current day, so two
/// numbers generated at the same instant are identical.
pub fn generate_invoice_number(now: &DateTime<Utc>) -> String {
    let ms_of_day = u64::from(now.num_seconds_from_midnight()) * MS_PER_SECOND
        + u64::from(now.timestamp_subsec_millis());
    format!("INV-{}-{:04}", now.format("%Y%m%d"), ms_of_day % 10_000)
}

pub fn add_days(timestamp: &DateTime<Utc>, days: i64) -> DateTime<Utc> {
    *timestamp + Duration::days(days)
}

/// Milliseconds between two instants, clamped at zero when the clock went backwards
pub fn millis_between(start: &DateTime<Utc>, end: &DateTime<Utc>) -> u64 {
    let delta = end.signed_duration_since(*start).num_milliseconds();
    u64::try_from(delta).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_elapsed_to_clock() {
        assert_eq!(elapsed_to_clock(0), "00:00:00");
        assert_eq!(elapsed_to_clock(3_661_000), "01:01:01");
        assert_eq!(elapsed_to_clock(999), "00:00:00");
        assert_eq!(elapsed_to_clock(59_999), "00:00:59");
    }

    #[test]
    fn test_elapsed_to_clock_does_not_roll_over_days() {
        assert_eq!(elapsed_to_clock(100 * MS_PER_HOUR), "100:00:00");
        assert_eq!(elapsed_to_clock(25 * MS_PER_HOUR + 30 * MS_PER_MINUTE), "25:30:00");
    }

    #[test]
    fn test_one_hour_bills_the_rate() {
        for rate in [0.0, 1.0, 12.5, 36.0, 50.0, 99.99, 150.75] {
            assert_eq!(compute_amount(MS_PER_HOUR, rate), rate);
        }
    }

    #[test]
    fn test_compute_amount_rounds_to_cents() {
        assert_eq!(compute_amount(8_000, 36.0), 0.08);
        assert_eq!(compute_amount(0, 80.0), 0.0);
        // 90 seconds at $50/h = 1.25
        assert_eq!(compute_amount(90_000, 50.0), 1.25);
        // 1 minute at $100/h = 1.6666.. -> 1.67
        assert_eq!(compute_amount(MS_PER_MINUTE, 100.0), 1.67);
    }

    #[test]
    fn test_round_cents_half_up() {
        assert_eq!(round_cents(0.125), 0.13);
        assert_eq!(round_cents(2.0), 2.0);
        assert_eq!(round_cents(1.994), 1.99);
        assert_eq!(round_cents(1.005), 1.01);
        assert_eq!(compute_amount(1_800_000, 2.01), 1.01);
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(0.08), "$0.08");
        assert_eq!(format_currency(50.0), "$50.00");
        assert_eq!(format_currency(1234.5), "$1,234.50");
        assert_eq!(format_currency(1_000_000.0), "$1,000,000.00");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0m");
        assert_eq!(format_duration(45 * MS_PER_MINUTE), "45m");
        assert_eq!(format_duration(2 * MS_PER_HOUR + 5 * MS_PER_MINUTE), "2h 5m");
    }

    #[test]
    fn test_generate_invoice_number() {
        let now = Utc.with_ymd_and_hms(2025, 3, 5, 0, 0, 12).unwrap();
        assert_eq!(generate_invoice_number(&now), "INV-20250305-2000");
    }

    #[test]
    fn test_add_days() {
        let start = Utc.with_ymd_and_hms(2025, 1, 30, 12, 0, 0).unwrap();
        let due = add_days(&start, 30);
        assert_eq!(due, Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_millis_between_clamps_backwards_clock() {
        let a = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        let b = a + Duration::milliseconds(1500);
        assert_eq!(millis_between(&a, &b), 1500);
        assert_eq!(millis_between(&b, &a), 0);
    }
}
