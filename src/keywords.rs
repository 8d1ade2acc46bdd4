//! Keyword frequency over collected articles.
//!
//! Two views are produced:
//!
//! - [`rank_summary_keywords`]: runs of two or more Hangul syllables found in
//!   article summaries, top [`TOP_KEYWORDS`] by count.
//! - [`title_word_frequencies`]: whitespace-separated words of the titles
//!   after stripping everything but Hangul, all terms kept (word-cloud input).
//!
//! Both order terms by descending count and break ties by first appearance.
//! Both return `None` when no term qualifies.

use crate::models::{ArticleRecord, KeywordCount, KeywordRanking};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use tracing::debug;

/// Number of terms kept in the summary keyword ranking.
pub const TOP_KEYWORDS: usize = 20;

static HANGUL_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[가-힣]{2,}").expect("valid regex"));
static NON_HANGUL: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^가-힣\s]").expect("valid regex"));

/// Counts terms while remembering the order each was first seen in.
#[derive(Debug, Default)]
struct FrequencyTable {
    index: HashMap<String, usize>,
    counts: Vec<KeywordCount>,
}

impl FrequencyTable {
    fn add(&mut self, term: &str) {
        match self.index.get(term) {
            Some(&i) => self.counts[i].count += 1,
            None => {
                self.index.insert(term.to_string(), self.counts.len());
                self.counts.push(KeywordCount {
                    term: term.to_string(),
                    count: 1,
                });
            }
        }
    }

    /// Terms by descending count; the sort is stable so ties keep
    /// first-appearance order.
    fn into_ranked(self, limit: Option<usize>) -> Vec<KeywordCount> {
        let mut counts = self.counts;
        counts.sort_by(|a, b| b.count.cmp(&a.count));
        if let Some(limit) = limit {
            counts.truncate(limit);
        }
        counts
    }
}

/// Top keywords across the summaries of `articles`.
pub fn rank_summary_keywords(articles: &[ArticleRecord]) -> Option<KeywordRanking> {
    let mut table = FrequencyTable::default();
    for summary in articles.iter().map(|a| a.summary.as_str()) {
        for token in HANGUL_TOKEN.find_iter(summary) {
            table.add(token.as_str());
        }
    }
    debug!(distinct = table.counts.len(), "Counted summary keywords");
    KeywordRanking::from_ordered(table.into_ranked(Some(TOP_KEYWORDS)))
}

/// Frequency of every title word across `articles`.
pub fn title_word_frequencies(articles: &[ArticleRecord]) -> Option<KeywordRanking> {
    let joined = articles.iter().map(|a| a.title.as_str()).collect::<Vec<_>>().join(" ");
    let cleaned = NON_HANGUL.replace_all(&joined, "");

    let mut table = FrequencyTable::default();
    for word in cleaned.split_whitespace().filter(|w| w.chars().count() > 1) {
        table.add(word);
    }
    debug!(distinct = table.counts.len(), "Counted title words");
    KeywordRanking::from_ordered(table.into_ranked(None))
}
