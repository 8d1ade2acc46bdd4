//! Naver News search scraper.
//!
//! Scrapes the news tab of [Naver search](https://search.naver.com). Each
//! result page lists up to [`PAGE_SIZE`] articles; page `n` is addressed
//! with `start=(n-1)*10+1`.
//!
//! # Listing Markup
//!
//! ```text
//! div.news_wrap.api_ani_send      one result
//! ├── a.news_tit[title][href]     headline and link (missing on ad slots)
//! ├── a.info.press                outlet name
//! ├── span.info ...               labels; the last one is the date
//! └── div.dsc_wrap                summary snippet
//! ```

use super::{FetchError, ListingSource, PAGE_SIZE, page_offset};
use crate::dates::normalize_date;
use crate::models::{ListingEntry, UNKNOWN_PRESS};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "https://search.naver.com/search.naver";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";

static ARTICLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.news_wrap.api_ani_send").expect("valid selector"));
static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.news_tit").expect("valid selector"));
static PRESS_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.info.press").expect("valid selector"));
static INFO_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("span.info").expect("valid selector"));
static SUMMARY_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.dsc_wrap").expect("valid selector"));

/// Live listing source backed by Naver News search.
#[derive(Debug, Clone)]
pub struct NaverNewsSource {
    client: Client,
    endpoint: String,
}

impl NaverNewsSource {
    /// Build a source that sends `user_agent` with every request.
    pub fn new(endpoint: &str, user_agent: &str, timeout: Duration) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        let agent = HeaderValue::from_str(user_agent)
            .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_USER_AGENT));
        headers.insert(USER_AGENT, agent);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    /// URL of result page `page` for `query`.
    pub fn page_url(&self, query: &str, page: u32) -> Result<Url, FetchError> {
        let start = page_offset(page).to_string();
        let url = Url::parse_with_params(
            &self.endpoint,
            &[("where", "news"), ("query", query), ("start", start.as_str())],
        )?;
        Ok(url)
    }
}

impl ListingSource for NaverNewsSource {
    #[instrument(level = "info", skip(self, today))]
    async fn fetch_page(
        &self,
        query: &str,
        page: u32,
        today: NaiveDate,
    ) -> Result<Vec<ListingEntry>, FetchError> {
        let url = self.page_url(query, page)?;
        debug!(%url, "Requesting listing page");

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let html = response.text().await?;
        let entries = parse_listing(&html, today);
        info!(count = entries.len(), page_size = PAGE_SIZE, "Parsed listing page");
        Ok(entries)
    }
}

/// Extract the articles of one listing page, in page order.
///
/// Containers without a headline anchor (ad slots and the like) are skipped.
pub fn parse_listing(html: &str, today: NaiveDate) -> Vec<ListingEntry> {
    let document = Html::parse_document(html);
    document
        .select(&ARTICLE_SELECTOR)
        .filter_map(|article| parse_article(article, today))
        .collect()
}

fn parse_article(article: ElementRef<'_>, today: NaiveDate) -> Option<ListingEntry> {
    let title_tag = article.select(&TITLE_SELECTOR).next()?;
    let url = title_tag.value().attr("href")?.trim().to_string();
    let title = match title_tag.value().attr("title") {
        Some(title) if !title.trim().is_empty() => title.trim().to_string(),
        _ => element_text(title_tag),
    };
    if title.is_empty() || url.is_empty() {
        debug!("Skipping result without headline or link");
        return None;
    }

    let press = article
        .select(&PRESS_SELECTOR)
        .next()
        .map(element_text)
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| UNKNOWN_PRESS.to_string());

    let raw_date = article
        .select(&INFO_SELECTOR)
        .last()
        .map(element_text)
        .unwrap_or_default();

    let summary = article
        .select(&SUMMARY_SELECTOR)
        .next()
        .map(element_text)
        .unwrap_or_default();

    Some(ListingEntry {
        title,
        press,
        published: normalize_date(&raw_date, today),
        summary,
        url,
    })
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
