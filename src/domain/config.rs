//! Run configuration and the named constants behind its defaults.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::domain::BucketSpec;
use crate::error::AppError;

pub const DATE_COLUMN: &str = "Date";
pub const CLOSE_COLUMN: &str = "Close";
pub const FORWARD_RETURN_COLUMN: &str = "F1M_Return";

pub const DEFAULT_MACRO_CSV: &str = "macro_data_25yrs.csv";
pub const DEFAULT_CACHE_PATH: &str = "SPY_close.csv";
pub const DEFAULT_SYMBOL: &str = "SPY";
pub const DEFAULT_START: &str = "2018-01-01";
pub const DEFAULT_END: &str = "2025-07-01";

/// Trading rows between a date and the price its forward return is measured at.
pub const DEFAULT_HORIZON: usize = 25;
pub const DEFAULT_CORR_THRESHOLD: f64 = 0.3;
pub const DEFAULT_TARGET_COLUMN: &str = "Inflation_Rate_%";
pub const DEFAULT_YIELD_COLUMN: &str = "10Y Treasury Yield";

pub const INFLATION_EDGES: [f64; 6] = [-0.01, 2.0, 4.0, 6.0, 8.0, f64::INFINITY];
pub const INFLATION_LABELS: [&str; 5] = ["(0,2]", "(2,4]", "(4,6]", "(6,8]", "8+"];
pub const YIELD_EDGES: [f64; 6] = [-0.01, 1.0, 2.0, 3.0, 4.0, f64::INFINITY];
pub const YIELD_LABELS: [&str; 5] = ["(0,1]", "(1,2]", "(2,3]", "(3,4]", "4+"];

pub const HISTOGRAM_BINS: usize = 20;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where the close-price series comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PriceSourceKind {
    /// Read the cache file when it exists, otherwise fetch from Yahoo.
    Auto,
    /// Always fetch from Yahoo Finance.
    Yahoo,
    /// Only read the cache file (fails if absent).
    Cache,
    /// Seeded random walk, for offline runs.
    Synthetic,
}

/// A full run's configuration as understood by the pipeline.
///
/// Built from CLI flags; `Default` mirrors the CLI defaults.
#[derive(Debug, Clone, Serialize)]
pub struct EdaConfig {
    pub macro_csv: PathBuf,
    pub symbol: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub horizon: usize,
    pub threshold: f64,
    pub target: String,
    pub yield_column: String,
    pub cache_path: PathBuf,
    pub source: PriceSourceKind,
    pub seed: u64,
    pub timeout_secs: u64,

    pub head: usize,
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_merged: Option<PathBuf>,
    pub export_summary: Option<PathBuf>,
}

impl Default for EdaConfig {
    fn default() -> Self {
        Self {
            macro_csv: PathBuf::from(DEFAULT_MACRO_CSV),
            symbol: DEFAULT_SYMBOL.to_string(),
            start: parse_default_date(DEFAULT_START),
            end: parse_default_date(DEFAULT_END),
            horizon: DEFAULT_HORIZON,
            threshold: DEFAULT_CORR_THRESHOLD,
            target: DEFAULT_TARGET_COLUMN.to_string(),
            yield_column: DEFAULT_YIELD_COLUMN.to_string(),
            cache_path: PathBuf::from(DEFAULT_CACHE_PATH),
            source: PriceSourceKind::Auto,
            seed: 42,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            head: 5,
            plot: true,
            plot_width: 36,
            plot_height: 10,
            export_merged: None,
            export_summary: None,
        }
    }
}

impl EdaConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.symbol.trim().is_empty() {
            return Err(AppError::config("Symbol must not be empty."));
        }
        if self.end <= self.start {
            return Err(AppError::config(format!(
                "Invalid date range: end {} must be after start {}.",
                self.end, self.start
            )));
        }
        if self.horizon == 0 {
            return Err(AppError::config("Horizon must be > 0."));
        }
        if !(self.threshold.is_finite() && (0.0..=1.0).contains(&self.threshold)) {
            return Err(AppError::config("Correlation threshold must be within [0, 1]."));
        }
        self.inflation_buckets().validate()?;
        self.yield_buckets().validate()?;
        Ok(())
    }

    /// Bucket spec for the target (inflation) column.
    pub fn inflation_buckets(&self) -> BucketSpec {
        BucketSpec::new(&self.target, &INFLATION_EDGES, &INFLATION_LABELS)
    }

    pub fn yield_buckets(&self) -> BucketSpec {
        BucketSpec::new(&self.yield_column, &YIELD_EDGES, &YIELD_LABELS)
    }
}

fn parse_default_date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap_or_default()
}
