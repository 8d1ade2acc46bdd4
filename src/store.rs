//! Per-query article archive on disk.
//!
//! Every query owns one CSV file under the data directory:
//!
//! ```text
//! news_data/
//! ├── %EB%B2%95%EC%9D%B8%EC%B0%A8_news.csv
//! └── ...
//! ```
//!
//! The file name is the percent-encoded query, so any query maps to a
//! single flat file name. Files are written as UTF-8 with a byte-order mark
//! (spreadsheet tools need it to detect Hangul correctly) and read back with
//! or without one.
//!
//! Writes replace the whole file. There is no locking: two runs for the same
//! query at the same time may overwrite each other's additions.

use crate::models::ArticleRecord;
use itertools::Itertools;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, info, instrument};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed archive {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// CSV-backed archive of collected articles, one file per query.
#[derive(Debug, Clone)]
pub struct ArticleStore {
    dir: PathBuf,
}

impl ArticleStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Archive file for `query`.
    pub fn path_for(&self, query: &str) -> PathBuf {
        self.dir
            .join(format!("{}_news.csv", urlencoding::encode(query.trim())))
    }

    /// Load the archive for `query`, or an empty set if none exists yet.
    #[instrument(level = "info", skip(self))]
    pub async fn load_or_empty(&self, query: &str) -> Result<Vec<ArticleRecord>, StoreError> {
        let path = self.path_for(query);
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No archive yet");
                return Ok(Vec::new());
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes[..]);
        let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(body);
        let records = reader
            .deserialize::<ArticleRecord>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| StoreError::Csv {
                path: path.clone(),
                source,
            })?;

        info!(path = %path.display(), count = records.len(), "Loaded archive");
        Ok(records)
    }

    /// Replace the archive for `query` with `records`.
    #[instrument(level = "info", skip(self, records), fields(count = records.len()))]
    pub async fn save(&self, query: &str, records: &[ArticleRecord]) -> Result<(), StoreError> {
        let path = self.path_for(query);
        let csv_error = |source| StoreError::Csv {
            path: path.clone(),
            source,
        };

        let mut writer = csv::Writer::from_writer(UTF8_BOM.to_vec());
        for record in records {
            writer.serialize(record).map_err(csv_error)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| csv_error(csv::Error::from(e.into_error())))?;

        fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| StoreError::Io {
                path: self.dir.clone(),
                source,
            })?;
        fs::write(&path, bytes)
            .await
            .map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;

        info!(path = %path.display(), "Saved archive");
        Ok(())
    }

    /// Merge `new` into the archive for `query`, persist, and return the
    /// full deduplicated set.
    #[instrument(level = "info", skip(self, new), fields(new = new.len()))]
    pub async fn merge_and_persist(
        &self,
        query: &str,
        new: Vec<ArticleRecord>,
    ) -> Result<Vec<ArticleRecord>, StoreError> {
        let prior = self.load_or_empty(query).await?;
        let prior_len = prior.len();
        let merged = merge_articles(prior, new);
        self.save(query, &merged).await?;

        info!(
            prior = prior_len,
            added = merged.len().saturating_sub(prior_len),
            total = merged.len(),
            "Merged collection into archive"
        );
        Ok(merged)
    }
}

/// Concatenate `prior` and `new`, keeping the first record for each URL.
///
/// Prior records win over re-scraped duplicates, and discovery order is
/// preserved.
pub fn merge_articles(prior: Vec<ArticleRecord>, new: Vec<ArticleRecord>) -> Vec<ArticleRecord> {
    prior
        .into_iter()
        .chain(new)
        .unique_by(|record| record.url.clone())
        .collect()
}
