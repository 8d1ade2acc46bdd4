//! Normalization of the date labels shown in news search listings.
//!
//! Listings label each item with one of three shapes:
//!
//! | Label | Meaning | Result |
//! |-------|---------|--------|
//! | `3일 전` | n days ago | `today - n days` |
//! | `5시간 전` | n hours ago | `today` |
//! | `2025.01.15.` | absolute date | that date |
//!
//! Anything else yields a [`DateParseFailure`]; the caller decides the
//! fallback (see [`crate::models::ListingEntry::into_record`]).

use chrono::{Duration, NaiveDate};
use thiserror::Error;

const DAYS_AGO_SUFFIX: &str = "일 전";
const HOURS_AGO_SUFFIX: &str = "시간 전";
const DOTTED_FORMAT: &str = "%Y.%m.%d.";

/// A date label that did not match any known shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized date label: {raw:?}")]
pub struct DateParseFailure {
    /// The label as it appeared in the listing.
    pub raw: String,
}

/// Normalize a listing date label relative to `today`.
pub fn normalize_date(raw: &str, today: NaiveDate) -> Result<NaiveDate, DateParseFailure> {
    let label = raw.trim();
    let failure = || DateParseFailure {
        raw: raw.to_string(),
    };

    if let Some(n) = label.strip_suffix(DAYS_AGO_SUFFIX) {
        let days: u32 = n.trim().parse().map_err(|_| failure())?;
        return today
            .checked_sub_signed(Duration::days(i64::from(days)))
            .ok_or_else(failure);
    }

    if let Some(n) = label.strip_suffix(HOURS_AGO_SUFFIX) {
        n.trim().parse::<u32>().map_err(|_| failure())?;
        return Ok(today);
    }

    if label.contains('.') {
        return NaiveDate::parse_from_str(label, DOTTED_FORMAT).map_err(|_| failure());
    }

    Err(failure())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    #[test]
    fn test_days_ago() {
        let d = normalize_date("3일 전", run_date()).unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2025, 3, 7).unwrap());
    }

    #[test]
    fn test_days_ago_crosses_month() {
        let d = normalize_date(" 12일 전 ", run_date()).unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2025, 2, 26).unwrap());
    }

    #[test]
    fn test_hours_ago_collapses_to_today() {
        assert_eq!(normalize_date("5시간 전", run_date()).unwrap(), run_date());
    }

    #[test]
    fn test_dotted_absolute_date() {
        let d = normalize_date("2025.01.15.", run_date()).unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());
    }

    #[test]
    fn test_invalid_dotted_date_fails() {
        assert!(normalize_date("2025.13.40.", run_date()).is_err());
        assert!(normalize_date("2025.01.15", run_date()).is_err());
    }

    #[test]
    fn test_unknown_shape_fails() {
        let err = normalize_date("abc", run_date()).unwrap_err();
        assert_eq!(err.raw, "abc");
        assert!(normalize_date("", run_date()).is_err());
        assert!(normalize_date("10분 전", run_date()).is_err());
    }

    #[test]
    fn test_non_numeric_relative_label_fails() {
        assert!(normalize_date("며칠 전", run_date()).is_err());
        assert!(normalize_date("몇시간 전", run_date()).is_err());
    }
}
