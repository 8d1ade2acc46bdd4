//! Data models for scraped news items and keyword rankings.
//!
//! This module defines the core data structures used throughout the application:
//! - [`ListingEntry`]: One search-result item as parsed from a listing page
//! - [`ArticleRecord`]: A normalized article, the unit of the persisted store
//! - [`KeywordCount`] / [`KeywordRanking`]: Ordered term frequencies
//!
//! `ArticleRecord` field order matches the persisted CSV column order
//! (`title, press, date, summary, url`).

use crate::dates::DateParseFailure;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Press name used when the listing omits it.
pub const UNKNOWN_PRESS: &str = "Unknown";

/// A news article as stored in the per-query archive.
///
/// Records are never mutated once created. The `url` is the identity key
/// used for deduplication when merging into the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    /// Headline text.
    pub title: String,
    /// Name of the publishing outlet, or [`UNKNOWN_PRESS`].
    pub press: String,
    /// Normalized publication date, serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    /// Summary snippet shown in the listing; may be empty.
    #[serde(default)]
    pub summary: String,
    /// Link to the article. Unique within a persisted collection.
    pub url: String,
}

/// One article as parsed from a search listing, before the date fallback
/// policy has been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub title: String,
    pub press: String,
    /// Result of normalizing the listing's date label.
    pub published: Result<NaiveDate, DateParseFailure>,
    pub summary: String,
    pub url: String,
}

impl ListingEntry {
    /// Convert into an [`ArticleRecord`], substituting `today` when the date
    /// label could not be normalized. The entry is never dropped.
    pub fn into_record(self, today: NaiveDate) -> ArticleRecord {
        let date = match self.published {
            Ok(date) => date,
            Err(failure) => {
                debug!(raw = %failure.raw, url = %self.url, "Unparsable date label; using today");
                today
            }
        };
        ArticleRecord {
            title: self.title,
            press: self.press,
            date,
            summary: self.summary,
            url: self.url,
        }
    }
}

/// A term together with the number of times it occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordCount {
    pub term: String,
    pub count: usize,
}

/// Terms ordered by descending count, ties in order of first appearance.
///
/// A ranking always holds at least one term; "nothing to show" is modelled
/// by the absence of a ranking rather than an empty one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct KeywordRanking(Vec<KeywordCount>);

impl KeywordRanking {
    /// Wrap an already ordered list, returning `None` if it is empty.
    pub fn from_ordered(terms: Vec<KeywordCount>) -> Option<Self> {
        if terms.is_empty() {
            None
        } else {
            Some(Self(terms))
        }
    }

    pub fn terms(&self) -> &[KeywordCount] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Highest count in the ranking.
    pub fn max_count(&self) -> usize {
        self.0.first().map(|k| k.count).unwrap_or(0)
    }
}
