//! Screenshot attachment
//!
//! Images are embedded as `data:` URLs so the session history and invoices stay
//! self-contained.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use std::path::Path;

use crate::error::{BilltimeError, Result};
use crate::session::Screenshot;

/// MIME type guessed from the file extension
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

pub fn to_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Read an image file into a [`Screenshot`]
///
/// A blank caption falls back to the file name. Nothing is created when the
/// file cannot be read.
pub fn load_from_file(path: &Path, caption: &str, now: DateTime<Utc>) -> Result<Screenshot> {
    let bytes = std::fs::read(path).map_err(|source| BilltimeError::ScreenshotRead {
        path: path.to_path_buf(),
        source,
    })?;

    let caption = if caption.trim().is_empty() {
        path.file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    } else {
        caption.to_string()
    };

    Ok(Screenshot {
        id: now.timestamp_millis().to_string(),
        data_url: to_data_url(mime_for_path(path), &bytes),
        caption,
        timestamp: now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 5, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_mime_for_path() {
        assert_eq!(mime_for_path(Path::new("a.PNG")), "image/png");
        assert_eq!(mime_for_path(Path::new("a.jpeg")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("a.svg")), "image/svg+xml");
        assert_eq!(mime_for_path(Path::new("noext")), "application/octet-stream");
    }

    #[test]
    fn test_load_from_file_defaults_caption_to_name() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mockup.png");
        std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

        let shot = load_from_file(&path, "", now()).unwrap();
        assert_eq!(shot.caption, "mockup.png");
        assert_eq!(shot.data_url, "data:image/png;base64,iVBORw==");
        assert_eq!(shot.timestamp, now());
        assert_eq!(shot.id, now().timestamp_millis().to_string());
    }

    #[test]
    fn test_load_from_file_keeps_caption() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("x.jpg");
        std::fs::write(&path, b"jpg").unwrap();
        let shot = load_from_file(&path, "Checkout flow", now()).unwrap();
        assert_eq!(shot.caption, "Checkout flow");
        assert!(shot.data_url.starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = load_from_file(&dir.path().join("nope.png"), "", now()).unwrap_err();
        assert!(matches!(err, BilltimeError::ScreenshotRead { .. }));
    }
}
