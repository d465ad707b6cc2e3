//! Shared domain types.
//!
//! These types are kept lightweight so they can be:
//!
//! - passed by value between pipeline stages
//! - printed by the report module
//! - exported to CSV/JSON

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::config::{CLOSE_COLUMN, FORWARD_RETURN_COLUMN};
use crate::error::AppError;

/// One indicator column of the macro table (`None` = missing).
#[derive(Debug, Clone, PartialEq)]
pub struct MacroColumn {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// Date-indexed macro indicators, stored column-major.
///
/// Invariant: `dates` is strictly increasing and every column has
/// `dates.len()` values.
#[derive(Debug, Clone, PartialEq)]
pub struct MacroSeries {
    pub dates: Vec<NaiveDate>,
    pub columns: Vec<MacroColumn>,
}

impl MacroSeries {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&MacroColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Like [`MacroSeries::column`], but a missing column is fatal.
    pub fn require_column(&self, name: &str) -> Result<&MacroColumn, AppError> {
        self.column(name).ok_or_else(|| AppError::missing_column(name))
    }
}

/// A single close observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Daily closes for one symbol, ascending by date.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    pub symbol: String,
    pub points: Vec<PricePoint>,
}

/// A close plus the return realised over the following `horizon` rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnRecord {
    pub date: NaiveDate,
    pub close: f64,
    pub forward_return: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnSeries {
    pub symbol: String,
    pub horizon: usize,
    pub records: Vec<ReturnRecord>,
}

/// A macro row left-joined with the price-derived fields for the same date.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedRecord {
    pub date: NaiveDate,
    pub values: Vec<Option<f64>>,
    pub close: Option<f64>,
    pub forward_return: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MergedTable {
    pub macro_columns: Vec<String>,
    pub records: Vec<MergedRecord>,
}

impl MergedTable {
    /// Values of a macro column, `Close`, or `F1M_Return`, in row order.
    pub fn column_values(&self, name: &str) -> Option<Vec<Option<f64>>> {
        if name == FORWARD_RETURN_COLUMN {
            return Some(self.records.iter().map(|r| r.forward_return).collect());
        }
        if name == CLOSE_COLUMN {
            return Some(self.records.iter().map(|r| r.close).collect());
        }
        let idx = self.macro_columns.iter().position(|c| c == name)?;
        Some(self.records.iter().map(|r| r.values[idx]).collect())
    }

    pub fn require_values(&self, name: &str) -> Result<Vec<Option<f64>>, AppError> {
        self.column_values(name)
            .ok_or_else(|| AppError::missing_column(name))
    }
}

/// Pearson correlations between labelled columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub labels: Vec<String>,
    /// Row-major, `labels.len()` squared. NaN where undefined.
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.index_of(a)?;
        let j = self.index_of(b)?;
        Some(self.values[i][j])
    }

    /// The row of correlations against `label`, paired with column names.
    pub fn row(&self, label: &str) -> Option<Vec<(&str, f64)>> {
        let i = self.index_of(label)?;
        Some(
            self.labels
                .iter()
                .zip(self.values[i].iter())
                .map(|(l, &v)| (l.as_str(), v))
                .collect(),
        )
    }
}

/// The two column sets derived from a correlation matrix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureSets {
    pub target: String,
    pub threshold: f64,
    /// Columns with `|corr| > threshold` against the target (target included).
    pub high_corr: Vec<String>,
    /// All columns outside `high_corr`, plus the target.
    pub complement: Vec<String>,
}

/// Half-open `(lower, upper]` range buckets over one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketSpec {
    pub column: String,
    pub edges: Vec<f64>,
    pub labels: Vec<String>,
}

impl BucketSpec {
    pub fn new(column: &str, edges: &[f64], labels: &[&str]) -> Self {
        Self {
            column: column.to_string(),
            edges: edges.to_vec(),
            labels: labels.iter().map(|l| l.to_string()).collect(),
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.edges.len() < 2 {
            return Err(AppError::config(format!(
                "Bucket spec for `{}` needs at least two edges.",
                self.column
            )));
        }
        if self.labels.len() + 1 != self.edges.len() {
            return Err(AppError::config(format!(
                "Bucket spec for `{}` has {} edges but {} labels.",
                self.column,
                self.edges.len(),
                self.labels.len()
            )));
        }
        if self.edges.iter().any(|e| e.is_nan()) || self.edges.windows(2).any(|w| w[1] <= w[0]) {
            return Err(AppError::config(format!(
                "Bucket edges for `{}` must be strictly increasing.",
                self.column
            )));
        }
        Ok(())
    }

    /// Index of the bucket containing `value`, or `None` when it is out of range.
    pub fn assign(&self, value: f64) -> Option<usize> {
        if value.is_nan() {
            return None;
        }
        self.edges
            .windows(2)
            .position(|w| value > w[0] && value <= w[1])
    }

    pub fn label_for(&self, value: Option<f64>) -> Option<&str> {
        let idx = self.assign(value?)?;
        self.labels.get(idx).map(String::as_str)
    }
}

/// One row of a bucket summary table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketStat {
    pub label: String,
    /// Records whose value fell in this bucket.
    pub count: usize,
    /// Of those, records with a forward return.
    pub n_returns: usize,
    /// Mean forward return; `None` when no returns were available.
    pub mean_return: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketSummary {
    pub column: String,
    pub rows: Vec<BucketStat>,
}

/// Ordinary least squares line `y = intercept + slope * x`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendLine {
    pub x_column: String,
    pub y_column: String,
    pub intercept: f64,
    pub slope: f64,
    pub r_squared: f64,
    pub n: usize,
}

impl TrendLine {
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Date,
    Numeric,
    Text,
}

impl ColumnKind {
    pub fn label(self) -> &'static str {
        match self {
            ColumnKind::Date => "date",
            ColumnKind::Numeric => "numeric",
            ColumnKind::Text => "text",
        }
    }
}

/// Per-column ingest summary (the "info" view of the table).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    pub kind: ColumnKind,
    pub non_null: usize,
}

/// Descriptive statistics of one numeric column (missing values skipped).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnStats {
    pub name: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}
