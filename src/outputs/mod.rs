//! Presentation of collected articles and keyword rankings.
//!
//! # Submodules
//!
//! - [`report`]: Plain-text panels for the terminal (keyword bar chart,
//!   article preview table, registration summary)
//! - [`markdown`]: Article listing with links and truncated summaries
//! - [`json`]: Keyword rankings for chart and word-cloud renderers
//!
//! Nothing here fetches or counts; every function renders data it is given.

pub mod json;
pub mod markdown;
pub mod report;
