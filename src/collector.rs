//! Collection runs over a bounded range of listing pages.
//!
//! A run requests pages `1..=pages` one after another and concatenates the
//! results in page order. A page that fails to load is logged and skipped;
//! the remaining pages are still collected. Deduplication is left to the
//! store.

use crate::models::ArticleRecord;
use crate::scrapers::ListingSource;
use chrono::NaiveDate;
use futures::stream::{self, StreamExt};
use std::ops::RangeInclusive;
use thiserror::Error;
use tracing::{info, instrument, warn};

/// Allowed number of pages per run.
pub const PAGE_RANGE: RangeInclusive<u32> = 1..=10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("search query must not be empty")]
    EmptyQuery,

    #[error("page count {0} is outside 1..=10")]
    PageCount(u32),
}

/// What to collect: a query and the number of result pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionRequest {
    query: String,
    pages: u32,
}

impl CollectionRequest {
    pub fn new(query: &str, pages: u32) -> Result<Self, RequestError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(RequestError::EmptyQuery);
        }
        if !PAGE_RANGE.contains(&pages) {
            return Err(RequestError::PageCount(pages));
        }
        Ok(Self {
            query: query.to_string(),
            pages,
        })
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn pages(&self) -> u32 {
        self.pages
    }
}

/// Result of a collection run.
#[derive(Debug, Default)]
pub struct CollectionOutcome {
    /// Records from all successful pages, in page order.
    pub articles: Vec<ArticleRecord>,
    /// Pages whose fetch failed and contributed nothing.
    pub failed_pages: Vec<u32>,
}

/// Collect the requested pages from `source`.
///
/// Unparsable date labels fall back to `today`.
#[instrument(level = "info", skip(source, today), fields(query = %request.query(), pages = request.pages()))]
pub async fn collect_articles<S: ListingSource>(
    source: &S,
    request: &CollectionRequest,
    today: NaiveDate,
) -> CollectionOutcome {
    let query = request.query();

    let pages: Vec<_> = stream::iter(1..=request.pages())
        .then(|page| async move { (page, source.fetch_page(query, page, today).await) })
        .collect()
        .await;

    let mut outcome = CollectionOutcome::default();
    for (page, result) in pages {
        match result {
            Ok(entries) => {
                info!(page, count = entries.len(), "Collected listing page");
                outcome
                    .articles
                    .extend(entries.into_iter().map(|e| e.into_record(today)));
            }
            Err(e) => {
                warn!(page, error = %e, "Listing page failed; continuing with remaining pages");
                outcome.failed_pages.push(page);
            }
        }
    }

    info!(
        count = outcome.articles.len(),
        failed = outcome.failed_pages.len(),
        "Collection run finished"
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::DateParseFailure;
    use crate::models::ListingEntry;
    use crate::scrapers::FetchError;
    use std::sync::Mutex;

    /// Serves `per_page` entries for every page except those in `failing`.
    struct ScriptedSource {
        per_page: usize,
        failing: Vec<u32>,
        requested: Mutex<Vec<u32>>,
    }

    impl ScriptedSource {
        fn new(per_page: usize, failing: Vec<u32>) -> Self {
            Self {
                per_page,
                failing,
                requested: Mutex::new(Vec::new()),
            }
        }
    }

    impl ListingSource for ScriptedSource {
        async fn fetch_page(
            &self,
            _query: &str,
            page: u32,
            today: NaiveDate,
        ) -> Result<Vec<ListingEntry>, FetchError> {
            self.requested.lock().unwrap().push(page);
            if self.failing.contains(&page) {
                return Err(FetchError::Status {
                    url: format!("https://search.example/?start={page}"),
                    status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                });
            }
            Ok((0..self.per_page)
                .map(|i| ListingEntry {
                    title: format!("기사 {page}-{i}"),
                    press: "Unknown".to_string(),
                    published: if i == 0 {
                        Err(DateParseFailure {
                            raw: "abc".to_string(),
                        })
                    } else {
                        Ok(today)
                    },
                    summary: String::new(),
                    url: format!("https://news.example/{page}/{i}"),
                })
                .collect())
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    #[test]
    fn test_request_validation() {
        assert_eq!(
            CollectionRequest::new("   ", 3),
            Err(RequestError::EmptyQuery)
        );
        assert_eq!(
            CollectionRequest::new("법인차", 0),
            Err(RequestError::PageCount(0))
        );
        assert_eq!(
            CollectionRequest::new("법인차", 11),
            Err(RequestError::PageCount(11))
        );
        let request = CollectionRequest::new(" 법인차 제도 ", 10).unwrap();
        assert_eq!(request.query(), "법인차 제도");
        assert_eq!(request.pages(), 10);
    }

    #[tokio::test]
    async fn test_pages_are_concatenated_in_order() {
        let source = ScriptedSource::new(2, vec![]);
        let request = CollectionRequest::new("법인차", 3).unwrap();
        let outcome = collect_articles(&source, &request, today()).await;

        let urls: Vec<&str> = outcome.articles.iter().map(|a| a.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://news.example/1/0",
                "https://news.example/1/1",
                "https://news.example/2/0",
                "https://news.example/2/1",
                "https://news.example/3/0",
                "https://news.example/3/1",
            ]
        );
        assert!(outcome.failed_pages.is_empty());
        assert_eq!(*source.requested.lock().unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_failed_page_does_not_abort_run() {
        let source = ScriptedSource::new(2, vec![3]);
        let request = CollectionRequest::new("법인차", 5).unwrap();
        let outcome = collect_articles(&source, &request, today()).await;

        let pages: Vec<&str> = outcome
            .articles
            .iter()
            .map(|a| a.url.split('/').nth(3).unwrap())
            .collect();
        assert_eq!(pages, vec!["1", "1", "2", "2", "4", "4", "5", "5"]);
        assert_eq!(outcome.failed_pages, vec![3]);
        assert_eq!(*source.requested.lock().unwrap(), vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_unparsable_dates_are_never_dropped() {
        let source = ScriptedSource::new(3, vec![]);
        let request = CollectionRequest::new("법인차", 2).unwrap();
        let outcome = collect_articles(&source, &request, today()).await;

        assert_eq!(outcome.articles.len(), 6);
        assert!(outcome.articles.iter().all(|a| a.date == today()));
    }

    #[tokio::test]
    async fn test_empty_pages_yield_empty_outcome() {
        let source = ScriptedSource::new(0, vec![]);
        let request = CollectionRequest::new("법인차", 4).unwrap();
        let outcome = collect_articles(&source, &request, today()).await;
        assert!(outcome.articles.is_empty());
        assert!(outcome.failed_pages.is_empty());
    }
}
