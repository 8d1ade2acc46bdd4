//! Markdown listing of collected articles.
//!
//! Each article becomes a linked heading followed by its summary, cut to
//! [`SUMMARY_LIMIT`] characters:
//!
//! ```text
//! ### 🔗 [법인차 연두색 번호판 시행](https://news.example/1)
//! 📝 요약: 법인차 전용 번호판 제도가 ...
//!
//! ---
//! ```

use crate::models::ArticleRecord;
use crate::utils::{SUMMARY_LIMIT, single_line, truncate_summary};
use std::fmt::Write;

/// Render `articles` as a Markdown listing, in the given order.
pub fn article_listing(articles: &[ArticleRecord]) -> String {
    let mut md = String::new();
    writeln!(md, "## 📰 요약된 뉴스 리스트\n").unwrap();

    for article in articles {
        writeln!(
            md,
            "### 🔗 [{}]({})",
            escape_link_text(&article.title),
            article.url
        )
        .unwrap();
        writeln!(
            md,
            "📝 요약: {}\n",
            single_line(&truncate_summary(&article.summary, SUMMARY_LIMIT))
        )
        .unwrap();
        writeln!(md, "---\n").unwrap();
    }
    md
}

fn escape_link_text(text: &str) -> String {
    text.replace('[', "\\[").replace(']', "\\]")
}
