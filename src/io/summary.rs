//! Write the run summary as JSON.
//!
//! The summary is the portable record of a run:
//! - the configuration it ran with
//! - both feature sets and both correlation matrices
//! - bucket tables and trend lines
//!
//! Undefined numbers (NaN correlations, empty-bucket means) serialize as `null`.

use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;

use crate::app::pipeline::RunOutput;
use crate::domain::{BucketSummary, CorrelationMatrix, EdaConfig, FeatureSets, TrendLine};
use crate::error::AppError;

#[derive(Debug, Serialize)]
pub struct SummaryFile<'a> {
    pub tool: &'static str,
    pub config: &'a EdaConfig,
    pub price_source: &'static str,
    pub macro_rows: usize,
    pub price_rows: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub missing_before: &'a [(String, usize)],
    pub missing_after: &'a [(String, usize)],
    pub features: &'a FeatureSets,
    pub macro_correlation: &'a CorrelationMatrix,
    pub return_correlation: &'a CorrelationMatrix,
    pub buckets: &'a [BucketSummary],
    pub trends: Vec<&'a TrendLine>,
}

impl<'a> SummaryFile<'a> {
    pub fn from_run(run: &'a RunOutput, config: &'a EdaConfig) -> Self {
        Self {
            tool: "eda",
            config,
            price_source: run.price_origin.label(),
            macro_rows: run.imputed.len(),
            price_rows: run.returns.records.len(),
            first_date: run.imputed.dates.first().copied(),
            last_date: run.imputed.dates.last().copied(),
            missing_before: &run.missing_before,
            missing_after: &run.missing_after,
            features: &run.features,
            macro_correlation: &run.macro_corr,
            return_correlation: &run.merged_corr,
            buckets: &run.buckets,
            trends: run.trends.iter().filter_map(|t| t.line.as_ref()).collect(),
        }
    }
}

pub fn write_summary_json(path: &Path, run: &RunOutput, config: &EdaConfig) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create summary JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, &SummaryFile::from_run(run, config))
        .map_err(|e| AppError::io(format!("Failed to write summary JSON: {e}")))?;

    Ok(())
}
