//! News search listing scrapers.
//!
//! A listing source turns one result page for a query into
//! [`ListingEntry`] values. The collection orchestrator only sees the
//! [`ListingSource`] trait, so pages can be served by the live scraper or
//! by a scripted source in tests.
//!
//! # Supported Sources
//!
//! | Source | Module | Method |
//! |--------|--------|--------|
//! | Naver News search | [`naver`] | HTML scraping |
//!
//! Each page is requested exactly once. A failed page is reported as a
//! [`FetchError`], which the orchestrator treats as recoverable.

use crate::models::ListingEntry;
use chrono::NaiveDate;
use thiserror::Error;

pub mod naver;

/// Number of results per listing page.
pub const PAGE_SIZE: u32 = 10;

/// Failure to fetch or read a single listing page.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} answered with HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("invalid search URL: {0}")]
    Url(#[from] url::ParseError),
}

/// A paginated news search.
pub trait ListingSource {
    /// Fetch page `page` (1-based) of the results for `query`.
    ///
    /// `today` anchors relative date labels such as `3일 전`.
    async fn fetch_page(
        &self,
        query: &str,
        page: u32,
        today: NaiveDate,
    ) -> Result<Vec<ListingEntry>, FetchError>;
}

/// 1-based result offset of the first item on `page`.
pub fn page_offset(page: u32) -> u32 {
    page.saturating_sub(1) * PAGE_SIZE + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_offset() {
        assert_eq!(page_offset(1), 1);
        assert_eq!(page_offset(2), 11);
        assert_eq!(page_offset(10), 91);
    }
}
