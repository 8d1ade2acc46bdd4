//! Small text and file system helpers.

use std::io;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Longest summary shown in article listings, in characters.
pub const SUMMARY_LIMIT: usize = 100;

/// Truncate `text` to `limit` characters, appending `...` when cut.
///
/// Counts characters rather than bytes so Hangul is never split mid-glyph.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_summary("short", 100), "short");
/// assert_eq!(truncate_summary("가나다라", 2), "가나...");
/// ```
pub fn truncate_summary(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        None => text.to_string(),
        Some((cut, _)) => format!("{}...", &text[..cut]),
    }
}

/// Collapse runs of whitespace (including newlines) into single spaces.
pub fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then writes and removes a probe file.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path).await?;
    let probe_path = path.join("..__probe_write__");
    fs::write(&probe_path, b"").await?;
    let _ = fs::remove_file(&probe_path).await;
    info!("Data directory is writable");
    Ok(())
}
