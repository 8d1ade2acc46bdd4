//! Command-line interface definitions.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Global options can also be provided via environment variables.

use crate::collector::PAGE_RANGE;
use crate::scrapers::naver::{DEFAULT_ENDPOINT, DEFAULT_USER_AGENT};
use crate::vehicles::{DEFAULT_DISTRICT, DEFAULT_PROVINCE};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// # Collect three pages of results and show the keyword ranking
/// naver_news_keywords collect "법인차 제도" --pages 3
///
/// # Re-render the archive without scraping, with the article listing
/// naver_news_keywords report "법인차 제도" --show-articles
///
/// # Title word frequencies for a word-cloud renderer
/// naver_news_keywords cloud "법인자동차 제도" --output cloud.json
///
/// # District registration summary
/// naver_news_keywords vehicles registrations.csv --district 서초구
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Directory holding one CSV archive per query
    #[arg(long, env = "NEWS_DATA_DIR", default_value = "news_data", global = true)]
    pub data_dir: PathBuf,

    /// News search endpoint
    #[arg(long, env = "NEWS_SEARCH_ENDPOINT", default_value = DEFAULT_ENDPOINT, global = true)]
    pub endpoint: String,

    /// User-Agent header sent with search requests
    #[arg(long, env = "NEWS_USER_AGENT", default_value = DEFAULT_USER_AGENT, global = true)]
    pub user_agent: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 15, global = true)]
    pub timeout_secs: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scrape result pages, merge them into the archive, and report keywords
    Collect {
        /// Search query
        query: String,

        /// Number of result pages to scrape (10 articles each)
        #[arg(short, long, default_value_t = 1, value_parser = page_count)]
        pages: u32,

        #[command(flatten)]
        output: ReportArgs,
    },

    /// Report on the archive for a query without scraping
    Report {
        /// Search query
        query: String,

        #[command(flatten)]
        output: ReportArgs,
    },

    /// Scrape result pages and count the words in their titles
    Cloud {
        /// Search query
        query: String,

        /// Number of result pages to scrape (10 articles each)
        #[arg(short, long, default_value_t = 5, value_parser = page_count)]
        pages: u32,

        /// Write the word frequencies as JSON to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Summarize monthly commercial passenger-car registrations for a district
    Vehicles {
        /// Registration CSV export (CP949 or UTF-8)
        csv: PathBuf,

        #[arg(long, default_value = DEFAULT_PROVINCE)]
        province: String,

        #[arg(long, default_value = DEFAULT_DISTRICT)]
        district: String,
    },
}

/// Output options shared by `collect` and `report`.
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Also print every article with its link and truncated summary
    #[arg(long)]
    pub show_articles: bool,

    /// Write the keyword ranking as JSON to this file
    #[arg(long)]
    pub keywords_json: Option<PathBuf>,
}

fn page_count(s: &str) -> Result<u32, String> {
    let pages: u32 = s.parse().map_err(|_| format!("`{s}` is not a number"))?;
    if PAGE_RANGE.contains(&pages) {
        Ok(pages)
    } else {
        Err(format!(
            "page count must be between {} and {}",
            PAGE_RANGE.start(),
            PAGE_RANGE.end()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_collect_parsing() {
        let cli = Cli::parse_from([
            "naver_news_keywords",
            "collect",
            "법인차 제도",
            "--pages",
            "3",
            "--show-articles",
        ]);

        match cli.command {
            Command::Collect {
                query,
                pages,
                output,
            } => {
                assert_eq!(query, "법인차 제도");
                assert_eq!(pages, 3);
                assert!(output.show_articles);
                assert!(output.keywords_json.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["naver_news_keywords", "cloud", "법인자동차 제도"]);
        assert_eq!(cli.timeout_secs, 15);
        match cli.command {
            Command::Cloud { pages, output, .. } => {
                assert_eq!(pages, 5);
                assert!(output.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cli_global_option_after_subcommand() {
        let cli = Cli::parse_from([
            "naver_news_keywords",
            "report",
            "q",
            "--data-dir",
            "/tmp/news",
        ]);
        assert_eq!(cli.data_dir, PathBuf::from("/tmp/news"));
    }

    #[test]
    fn test_cli_rejects_page_count_out_of_range() {
        assert!(Cli::try_parse_from(["naver_news_keywords", "collect", "q", "-p", "0"]).is_err());
        assert!(Cli::try_parse_from(["naver_news_keywords", "collect", "q", "-p", "11"]).is_err());
        assert!(Cli::try_parse_from(["naver_news_keywords", "collect", "q", "-p", "10"]).is_ok());
    }

    #[test]
    fn test_cli_vehicles_defaults() {
        let cli = Cli::parse_from(["naver_news_keywords", "vehicles", "cars.csv"]);
        match cli.command {
            Command::Vehicles {
                csv,
                province,
                district,
            } => {
                assert_eq!(csv, PathBuf::from("cars.csv"));
                assert_eq!(province, "서울");
                assert_eq!(district, "강남구");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
