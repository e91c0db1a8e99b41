//! End-to-end workflow through the library API on an on-disk database

use billtime::config::InvoiceConfig;
use billtime::error::BilltimeError;
use billtime::draft::{DraftUpdate, SessionDraft};
use billtime::invoice::{self, InvoiceDetails};
use billtime::kv::SqliteKv;
use billtime::screenshot;
use billtime::timer::TimerState;
use billtime::tracker::Tracker;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::path::Path;

fn at(ms: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 5, 9, 0, 0).unwrap() + Duration::milliseconds(ms)
}

/// Each call opens the database afresh, like a separate CLI invocation
fn open(dir: &Path) -> Tracker {
    let kv = SqliteKv::open_in(dir).unwrap();
    Tracker::load(Box::new(kv), SessionDraft::with_rate(36.0))
}

#[test]
fn test_track_two_sessions_and_invoice() {
    let dir = tempfile::tempdir().unwrap();

    let mut t = open(dir.path());
    t.update_draft(DraftUpdate {
        project_name: Some("Acme <Site>".into()),
        rate_input: Some("36".into()),
        notes: Some("Landing page".into()),
    })
    .unwrap();
    t.start(at(0)).unwrap();

    let mut t = open(dir.path());
    t.pause(at(5_000)).unwrap();

    let mut t = open(dir.path());
    assert_eq!(t.state(), TimerState::Paused);
    t.start(at(10_000)).unwrap();

    let image = dir.path().join("shot.png");
    std::fs::write(&image, [0x89, b'P', b'N', b'G']).unwrap();
    let shot = screenshot::load_from_file(&image, "", at(11_000)).unwrap();
    t.attach_screenshot(shot).unwrap();

    let mut t = open(dir.path());
    let first = t.stop(at(13_000)).unwrap().unwrap();
    assert_eq!(first.duration, 8_000);
    assert_eq!(first.amount, 0.08);
    assert_eq!(first.screenshots.len(), 1);
    assert_eq!(first.screenshots[0].caption, "shot.png");

    // Second session a day later at the same rate
    let mut t = open(dir.path());
    t.start(at(86_400_000)).unwrap();
    t.stop(at(86_400_000 + 3_600_000)).unwrap();

    let t = open(dir.path());
    assert_eq!(t.store().len(), 2);
    assert_eq!(t.store().list()[1].id(), first.id());
    let totals = t.store().totals();
    assert_eq!(totals.duration_ms, 3_608_000);
    assert_eq!(totals.amount, 36.08);

    let details = InvoiceDetails::new(at(2 * 86_400_000), &InvoiceConfig::default());
    let html = invoice::render_html(&details, &t.store().select(&[]));
    assert!(html.contains("Acme &lt;Site&gt;"));
    assert!(html.contains("$36.08"));
    assert!(html.contains("data:image/png;base64,"));

    let out = dir.path().join(details.file_name());
    invoice::write_invoice(&out, &html).unwrap();
    assert!(std::fs::read_to_string(&out).unwrap().starts_with("<!DOCTYPE html>"));
}

#[test]
fn test_delete_older_session_recomputes_totals() {
    let dir = tempfile::tempdir().unwrap();

    let mut t = open(dir.path());
    t.start(at(0)).unwrap();
    let older = t.stop(at(60_000)).unwrap().unwrap();
    t.start(at(120_000)).unwrap();
    let newer = t.stop(at(240_000)).unwrap().unwrap();

    let mut t = open(dir.path());
    assert!(t.delete_session(older.id()).unwrap());
    assert!(!t.delete_session(older.id()).unwrap());

    let t = open(dir.path());
    assert_eq!(t.store().len(), 1);
    assert_eq!(t.store().list()[0].id(), newer.id());
    assert_eq!(t.store().totals().duration_ms, 120_000);
}

#[test]
fn test_missing_screenshot_leaves_session_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let mut t = open(dir.path());
    t.start(at(0)).unwrap();

    let image = dir.path().join("kept.png");
    std::fs::write(&image, [0x89, b'P', b'N', b'G']).unwrap();
    screenshot::load_from_file(&image, "kept", at(500))
        .and_then(|shot| t.attach_screenshot(shot))
        .unwrap();

    let missing = dir.path().join("missing.png");
    let result = screenshot::load_from_file(&missing, "", at(1_000))
        .and_then(|shot| t.attach_screenshot(shot));
    assert!(matches!(result, Err(BilltimeError::ScreenshotRead { .. })));

    let t = open(dir.path());
    assert_eq!(t.state(), TimerState::Running);
    let session = t.timer().current_session().unwrap();
    assert_eq!(session.screenshots.len(), 1);
    assert_eq!(session.screenshots[0].caption, "kept");
}

#[test]
fn test_resume_with_same_details_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let same = || DraftUpdate {
        project_name: Some("Acme".into()),
        rate_input: Some("36".into()),
        notes: None,
    };

    let mut t = open(dir.path());
    t.update_draft(same()).unwrap();
    t.start(at(0)).unwrap();
    t.pause(at(1_000)).unwrap();

    let mut t = open(dir.path());
    t.update_draft(same()).unwrap();
    t.start(at(2_000)).unwrap();
    assert_eq!(t.state(), TimerState::Running);
    assert_eq!(t.elapsed_at(at(3_000)), 2_000);
}
