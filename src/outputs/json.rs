//! JSON export of keyword rankings.
//!
//! The exported file is what an external bar-chart or word-cloud renderer
//! consumes:
//!
//! ```json
//! {
//!   "query": "법인차 제도",
//!   "generated_on": "2025-03-10",
//!   "articles": 48,
//!   "terms": [{ "term": "법인차", "count": 31 }, ...]
//! }
//! ```

use crate::models::KeywordRanking;
use chrono::NaiveDate;
use serde::Serialize;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{error, info, instrument};

#[derive(Debug, Serialize)]
pub struct RankingExport<'a> {
    pub query: &'a str,
    pub generated_on: NaiveDate,
    /// Number of articles the ranking was computed from.
    pub articles: usize,
    pub terms: &'a KeywordRanking,
}

/// Write `export` as pretty-printed JSON to `path`, creating parent
/// directories as needed.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_ranking(export: &RankingExport<'_>, path: &Path) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(export)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = fs::create_dir_all(parent).await {
            error!(dir = %parent.display(), error = %e, "Failed to create JSON dir");
            return Err(e.into());
        }
    }

    fs::write(path, json).await?;
    info!(terms = export.terms.len(), "Wrote keyword JSON");
    Ok(())
}
