//! # Naver News Keywords
//!
//! Collects Naver News search results for a query, keeps a deduplicated
//! per-query archive on disk, and ranks the keywords found in article
//! summaries.
//!
//! ## Usage
//!
//! ```sh
//! naver_news_keywords collect "법인차 제도" --pages 3 --show-articles
//! ```
//!
//! ## Architecture
//!
//! A collection run is a short pipeline:
//! 1. **Collecting**: Scrape result pages `1..=P` one after another; a failed
//!    page is logged and skipped
//! 2. **Merging**: Merge the new articles into the query's archive,
//!    deduplicated by URL, and write the archive back
//! 3. **Ranking**: Count Hangul keywords in the archived summaries
//! 4. **Output**: Print the preview table and keyword chart, optionally the
//!    article listing and a JSON export

use chrono::{Local, NaiveDate};
use clap::Parser;
use std::error::Error;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod collector;
mod dates;
mod keywords;
mod models;
mod outputs;
mod scrapers;
mod store;
mod utils;
mod vehicles;

use cli::{Cli, Command, ReportArgs};
use collector::{CollectionRequest, collect_articles};
use keywords::{TOP_KEYWORDS, rank_summary_keywords, title_word_frequencies};
use models::{ArticleRecord, KeywordRanking};
use outputs::json::{RankingExport, write_ranking};
use outputs::{markdown, report};
use scrapers::naver::NaverNewsSource;
use store::ArticleStore;
use utils::ensure_writable_dir;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let today = Local::now().date_naive();
    let result = match &args.command {
        Command::Collect {
            query,
            pages,
            output,
        } => run_collect(&args, query, *pages, output, today).await,
        Command::Report { query, output } => run_report(&args, query, output, today).await,
        Command::Cloud {
            query,
            pages,
            output,
        } => run_cloud(&args, query, *pages, output.as_deref(), today).await,
        Command::Vehicles {
            csv,
            province,
            district,
        } => run_vehicles(csv, province, district).await,
    };

    let elapsed = start_time.elapsed();
    if let Err(e) = result {
        error!(?elapsed, error = %e, "Command failed");
        return Err(e);
    }
    info!(?elapsed, "Execution complete");
    Ok(())
}

fn listing_source(args: &Cli) -> Result<NaverNewsSource, Box<dyn Error>> {
    let source = NaverNewsSource::new(
        &args.endpoint,
        &args.user_agent,
        Duration::from_secs(args.timeout_secs),
    )?;
    Ok(source)
}

/// Scrape, merge into the archive, and report.
#[instrument(level = "info", skip(args, output, today))]
async fn run_collect(
    args: &Cli,
    query: &str,
    pages: u32,
    output: &ReportArgs,
    today: NaiveDate,
) -> Result<(), Box<dyn Error>> {
    let request = CollectionRequest::new(query, pages)?;
    let store = ArticleStore::new(&args.data_dir);

    // Fail before scraping if the archive cannot be written.
    if let Err(e) = ensure_writable_dir(store.dir()).await {
        error!(
            path = %store.dir().display(),
            error = %e,
            "Data directory is not writable (fix perms or choose a different path)"
        );
        return Err(e.into());
    }

    let source = listing_source(args)?;
    let outcome = collect_articles(&source, &request, today).await;
    if !outcome.failed_pages.is_empty() {
        warn!(pages = ?outcome.failed_pages, "Some pages could not be collected");
        println!(
            "⚠️ {}개 페이지 수집 실패: {:?}",
            outcome.failed_pages.len(),
            outcome.failed_pages
        );
    }

    let collected = outcome.articles.len();
    let archive = store.merge_and_persist(request.query(), outcome.articles).await?;
    println!("✅ {collected}건 수집 완료! 전체 {}건 저장됨.", archive.len());

    render_archive(request.query(), &archive, output, today).await
}

/// Report on the archive without scraping.
#[instrument(level = "info", skip(args, output, today))]
async fn run_report(
    args: &Cli,
    query: &str,
    output: &ReportArgs,
    today: NaiveDate,
) -> Result<(), Box<dyn Error>> {
    let store = ArticleStore::new(&args.data_dir);
    let archive = store.load_or_empty(query.trim()).await?;
    if archive.is_empty() {
        println!("저장된 뉴스 데이터가 없습니다. 먼저 collect 명령으로 수집하세요.");
        return Ok(());
    }
    render_archive(query.trim(), &archive, output, today).await
}

async fn render_archive(
    query: &str,
    archive: &[ArticleRecord],
    output: &ReportArgs,
    today: NaiveDate,
) -> Result<(), Box<dyn Error>> {
    if archive.is_empty() {
        println!("수집된 기사가 없습니다.");
        return Ok(());
    }

    println!("\n최근 수집된 뉴스 미리보기");
    print!("{}", report::preview_table(archive));

    println!("\n키워드 분석 결과");
    match rank_summary_keywords(archive) {
        Some(ranking) => {
            print!("{}", report::keyword_chart("뉴스 키워드 분석", &ranking));
            if let Some(path) = &output.keywords_json {
                export_ranking(query, archive.len(), &ranking, path, today).await?;
            }
        }
        None => println!("키워드를 추출할 수 없습니다."),
    }

    if output.show_articles {
        println!();
        print!("{}", markdown::article_listing(archive));
    }
    Ok(())
}

/// Scrape result pages and count title words, without touching the archive.
#[instrument(level = "info", skip(args, output, today))]
async fn run_cloud(
    args: &Cli,
    query: &str,
    pages: u32,
    output: Option<&Path>,
    today: NaiveDate,
) -> Result<(), Box<dyn Error>> {
    let request = CollectionRequest::new(query, pages)?;
    let source = listing_source(args)?;
    let outcome = collect_articles(&source, &request, today).await;

    if outcome.articles.is_empty() {
        println!("기사를 찾을 수 없습니다.");
        return Ok(());
    }

    let Some(frequencies) = title_word_frequencies(&outcome.articles) else {
        println!("키워드를 추출할 수 없습니다.");
        return Ok(());
    };

    let top = KeywordRanking::from_ordered(
        frequencies.terms().iter().take(TOP_KEYWORDS).cloned().collect(),
    );
    if let Some(top) = top {
        print!("{}", report::keyword_chart("뉴스 제목 단어 빈도", &top));
    }
    if let Some(path) = output {
        export_ranking(request.query(), outcome.articles.len(), &frequencies, path, today).await?;
    }
    Ok(())
}

async fn export_ranking(
    query: &str,
    articles: usize,
    ranking: &KeywordRanking,
    path: &Path,
    today: NaiveDate,
) -> Result<(), Box<dyn Error>> {
    let export = RankingExport {
        query,
        generated_on: today,
        articles,
        terms: ranking,
    };
    write_ranking(&export, path).await?;
    println!("📁 {}", path.display());
    Ok(())
}

#[instrument(level = "info")]
async fn run_vehicles(csv: &Path, province: &str, district: &str) -> Result<(), Box<dyn Error>> {
    let series = vehicles::load_district_series(csv, province, district).await?;
    let summary = vehicles::summarize(&series)?;
    print!("{}", report::registration_panel(district, &summary));
    Ok(())
}
