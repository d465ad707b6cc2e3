//! Shared pipeline logic used by every subcommand.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! macro ingest -> forward fill -> correlation/features -> price fetch ->
//! forward returns -> left join -> buckets/trends
//!
//! The front-end (`app.rs`) only decides what to print.

use log::{info, warn};

use crate::analysis;
use crate::data::{self, PriceOrigin};
use crate::domain::config::FORWARD_RETURN_COLUMN;
use crate::domain::{
    BucketSummary, ColumnStats, CorrelationMatrix, EdaConfig, FeatureSets, MacroSeries, MergedTable,
    PriceSeries, ReturnSeries, TrendLine,
};
use crate::error::AppError;
use crate::io::ingest::{IngestedMacro, load_macro_csv};

/// A trend fit against one indicator (`None` when there was nothing to fit).
#[derive(Debug, Clone)]
pub struct TrendFit {
    pub x_column: String,
    pub line: Option<TrendLine>,
}

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    /// Raw ingest (before imputation).
    pub ingest: IngestedMacro,
    pub missing_before: Vec<(String, usize)>,
    pub imputed: MacroSeries,
    pub missing_after: Vec<(String, usize)>,
    pub stats: Vec<ColumnStats>,
    pub macro_corr: CorrelationMatrix,
    pub features: FeatureSets,
    pub returns: ReturnSeries,
    pub price_origin: PriceOrigin,
    pub merged: MergedTable,
    pub merged_corr: CorrelationMatrix,
    /// Indicators ranked by |corr| with `F1M_Return`.
    pub return_ranking: Vec<(String, f64)>,
    pub buckets: Vec<BucketSummary>,
    pub trends: Vec<TrendFit>,
}

/// Execute the full pipeline: read the macro CSV, obtain closes, analyze.
pub fn run_eda(config: &EdaConfig) -> Result<RunOutput, AppError> {
    config.validate()?;

    // 1) Load macro data first so schema problems surface before any fetch.
    let ingest = load_macro_csv(&config.macro_csv)?;
    require_analysis_columns(&ingest.series, config)?;

    // 2) Obtain closes (cache, Yahoo or synthetic).
    let (prices, origin) = data::load_prices(config)?;

    run_eda_with_prices(config, ingest, prices, origin)
}

/// Execute the analysis on pre-loaded inputs.
///
/// Writes the price cache as a side effect, like [`run_eda`].
pub fn run_eda_with_prices(
    config: &EdaConfig,
    ingest: IngestedMacro,
    prices: PriceSeries,
    price_origin: PriceOrigin,
) -> Result<RunOutput, AppError> {
    require_analysis_columns(&ingest.series, config)?;
    if !ingest.row_errors.is_empty() {
        warn!("Skipped {} macro rows with errors", ingest.row_errors.len());
    }

    // 3) Forward-fill the indicators.
    let missing_before = analysis::missing_counts(&ingest.series);
    let imputed = analysis::impute_forward_fill(&ingest.series);
    let missing_after = analysis::missing_counts(&imputed);
    for (name, n) in &missing_after {
        if *n == imputed.len() {
            warn!("Column `{name}` has no values at all; it stays missing");
        }
    }

    // 4) Describe and correlate.
    let stats = analysis::describe(&imputed);
    let macro_corr = analysis::macro_correlation(&imputed);
    let features = analysis::select_features(&macro_corr, &config.target, config.threshold)?;
    info!(
        "{} of {} indicators pass |corr| > {} against `{}`",
        features.high_corr.len(),
        macro_corr.labels.len(),
        config.threshold,
        config.target
    );

    // 5) Forward returns + cache.
    let returns = prepare_returns(config, &prices)?;

    // 6) Align and summarize.
    let merged = analysis::left_join(&imputed, &returns);
    let matched = merged.records.iter().filter(|r| r.forward_return.is_some()).count();
    info!("{matched} of {} macro dates carry a forward return", merged.records.len());

    let merged_corr = analysis::merged_correlation(&merged)?;
    let return_ranking = analysis::rank_against(&merged_corr, FORWARD_RETURN_COLUMN);

    let bucket_specs = [config.inflation_buckets(), config.yield_buckets()];
    let buckets = bucket_specs
        .iter()
        .map(|spec| analysis::summarize_buckets(&merged, spec))
        .collect::<Result<Vec<_>, _>>()?;

    let mut trends = Vec::with_capacity(bucket_specs.len());
    for spec in &bucket_specs {
        let line = analysis::fit_trend(&merged, &spec.column, FORWARD_RETURN_COLUMN)?;
        if line.is_none() {
            warn!("Not enough data for a `{}` trend line", spec.column);
        }
        trends.push(TrendFit {
            x_column: spec.column.clone(),
            line,
        });
    }

    Ok(RunOutput {
        ingest,
        missing_before,
        imputed,
        missing_after,
        stats,
        macro_corr,
        features,
        returns,
        price_origin,
        merged,
        merged_corr,
        return_ranking,
        buckets,
        trends,
    })
}

/// Compute forward returns and persist them to the cache file.
pub fn prepare_returns(config: &EdaConfig, prices: &PriceSeries) -> Result<ReturnSeries, AppError> {
    let returns = analysis::forward_returns(prices, config.horizon);
    crate::io::cache::write_price_cache(&config.cache_path, &returns, config.start, config.end)?;
    info!(
        "Wrote {} {} rows to {}",
        returns.records.len(),
        returns.symbol,
        config.cache_path.display()
    );
    Ok(returns)
}

fn require_analysis_columns(series: &MacroSeries, config: &EdaConfig) -> Result<(), AppError> {
    series.require_column(&config.target)?;
    series.require_column(&config.yield_column)?;
    Ok(())
}
