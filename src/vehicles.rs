//! Monthly commercial passenger-car registrations for one district.
//!
//! Reads the national "vehicle registrations by province" CSV export. The
//! export is CP949 encoded, starts with five preamble rows and one header
//! row, and carries 23 columns per row:
//!
//! ```text
//! 0 month | 1 province | 2 district | 3..6 passenger (gov, private, commercial, total) | ...
//! ```
//!
//! Counts use thousands separators (`"1,234"`).

use chrono::NaiveDate;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, info, instrument};

const PREAMBLE_ROWS: usize = 5;
const MONTH_COLUMN: usize = 0;
const PROVINCE_COLUMN: usize = 1;
const DISTRICT_COLUMN: usize = 2;
const PASSENGER_COMMERCIAL_COLUMN: usize = 5;

/// Months compared on each side of the year-over-year summary.
pub const WINDOW_MONTHS: usize = 12;

pub const DEFAULT_PROVINCE: &str = "서울";
pub const DEFAULT_DISTRICT: &str = "강남구";

#[derive(Debug, Error)]
pub enum VehicleError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed registration CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("row {row}: {reason}")]
    Malformed { row: usize, reason: String },

    #[error("no rows for {province} {district}")]
    NoMatchingRows { province: String, district: String },

    #[error("need {needed} months of data, found {found}")]
    InsufficientData { found: usize, needed: usize },
}

/// Registrations counted in one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlyRegistration {
    /// First day of the month.
    pub month: NaiveDate,
    pub count: u64,
}

/// Comparison of the two most recent twelve-month windows.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationSummary {
    pub previous: Vec<MonthlyRegistration>,
    pub recent: Vec<MonthlyRegistration>,
    pub previous_avg: f64,
    pub recent_avg: f64,
}

impl RegistrationSummary {
    pub fn difference(&self) -> f64 {
        self.recent_avg - self.previous_avg
    }

    /// Percentage change of the recent average over the previous one.
    pub fn change_rate(&self) -> Option<f64> {
        if self.previous_avg == 0.0 {
            None
        } else {
            Some(self.difference() / self.previous_avg * 100.0)
        }
    }

    /// All months covered by the summary, oldest first.
    pub fn months(&self) -> impl Iterator<Item = &MonthlyRegistration> {
        self.previous.iter().chain(self.recent.iter())
    }
}

/// Load the monthly series for `province`/`district` from the CSV at `path`.
#[instrument(level = "info", skip_all, fields(path = %path.display(), %province, %district))]
pub async fn load_district_series(
    path: &Path,
    province: &str,
    district: &str,
) -> Result<Vec<MonthlyRegistration>, VehicleError> {
    let bytes = fs::read(path).await.map_err(|source| VehicleError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let series = parse_district_series(&bytes, province, district)?;
    info!(months = series.len(), "Loaded registration series");
    Ok(series)
}

/// Parse the export in `bytes`, keeping rows for `province`/`district`,
/// ordered by month.
pub fn parse_district_series(
    bytes: &[u8],
    province: &str,
    district: &str,
) -> Result<Vec<MonthlyRegistration>, VehicleError> {
    let text = decode(bytes);
    let body = text.splitn(PREAMBLE_ROWS + 1, '\n').nth(PREAMBLE_ROWS).unwrap_or("");

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(body.as_bytes());

    let mut series = Vec::new();
    for (i, row) in reader.records().enumerate() {
        let row = row?;
        let field = |idx: usize| row.get(idx).map(str::trim).unwrap_or("");
        if field(PROVINCE_COLUMN) != province || field(DISTRICT_COLUMN) != district {
            continue;
        }

        // Rows are numbered from the top of the file, preamble and header included.
        let row_number = i + PREAMBLE_ROWS + 2;
        let month = parse_month(field(MONTH_COLUMN)).ok_or_else(|| VehicleError::Malformed {
            row: row_number,
            reason: format!("unrecognized month {:?}", field(MONTH_COLUMN)),
        })?;
        let raw_count = field(PASSENGER_COMMERCIAL_COLUMN);
        let count = raw_count
            .replace(',', "")
            .parse::<u64>()
            .map_err(|e| VehicleError::Malformed {
                row: row_number,
                reason: format!("bad count {raw_count:?}: {e}"),
            })?;
        series.push(MonthlyRegistration { month, count });
    }

    if series.is_empty() {
        return Err(VehicleError::NoMatchingRows {
            province: province.to_string(),
            district: district.to_string(),
        });
    }
    series.sort_by_key(|m| m.month);
    Ok(series)
}

/// Compare the last twelve months against the twelve before them.
pub fn summarize(series: &[MonthlyRegistration]) -> Result<RegistrationSummary, VehicleError> {
    let needed = WINDOW_MONTHS * 2;
    if series.len() < needed {
        return Err(VehicleError::InsufficientData {
            found: series.len(),
            needed,
        });
    }

    let window = &series[series.len() - needed..];
    let (previous, recent) = window.split_at(WINDOW_MONTHS);
    Ok(RegistrationSummary {
        previous_avg: average(previous),
        recent_avg: average(recent),
        previous: previous.to_vec(),
        recent: recent.to_vec(),
    })
}

fn average(months: &[MonthlyRegistration]) -> f64 {
    let total: u64 = months.iter().map(|m| m.count).sum();
    total as f64 / months.len() as f64
}

fn decode(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.trim_start_matches('\u{feff}').to_string(),
        Err(_) => {
            debug!("Registration CSV is not UTF-8; decoding as CP949");
            let (text, _, _) = encoding_rs::EUC_KR.decode(bytes);
            text.into_owned()
        }
    }
}

fn parse_month(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d"))
        .or_else(|_| NaiveDate::parse_from_str(&format!("{raw}.01"), "%Y.%m.%d"))
        .or_else(|_| NaiveDate::parse_from_str(&format!("{raw}01"), "%Y%m%d"))
        .ok()
}
