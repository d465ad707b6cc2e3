//! Close-price sources: the on-disk cache, Yahoo Finance, or a synthetic walk.

pub mod sample;
pub mod yahoo;

use chrono::NaiveDate;
use log::{info, warn};

use crate::domain::{EdaConfig, PriceSeries, PriceSourceKind};
use crate::error::AppError;
use crate::io::cache::{read_cache_meta, read_price_cache};

pub use sample::generate_prices;
pub use yahoo::YahooClient;

/// Where a run's closes actually came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceOrigin {
    Cache,
    Yahoo,
    Synthetic,
}

impl PriceOrigin {
    pub fn label(self) -> &'static str {
        match self {
            PriceOrigin::Cache => "cache",
            PriceOrigin::Yahoo => "yahoo",
            PriceOrigin::Synthetic => "synthetic",
        }
    }
}

/// Resolve `config.source` to a close series over `start <= date < end`.
pub fn load_prices(config: &EdaConfig) -> Result<(PriceSeries, PriceOrigin), AppError> {
    match config.source {
        PriceSourceKind::Auto if cache_covers(config) => {
            info!("Reading cached closes from {}", config.cache_path.display());
            read_cache(config)
        }
        PriceSourceKind::Auto => {
            warn!(
                "No {} cache for {}..{} at {}; fetching from Yahoo",
                config.symbol,
                config.start,
                config.end,
                config.cache_path.display()
            );
            fetch_yahoo(config)
        }
        PriceSourceKind::Cache => read_cache(config),
        PriceSourceKind::Yahoo => fetch_yahoo(config),
        PriceSourceKind::Synthetic => {
            info!("Generating synthetic closes (seed {})", config.seed);
            let series = generate_prices(&config.symbol, config.start, config.end, config.seed)?;
            Ok((series, PriceOrigin::Synthetic))
        }
    }
}

/// The cache exists and its sidecar holds this symbol over the whole window.
fn cache_covers(config: &EdaConfig) -> bool {
    if !config.cache_path.exists() {
        return false;
    }
    match read_cache_meta(&config.cache_path) {
        Ok(Some(meta)) => meta.covers(&config.symbol, config.start, config.end),
        Ok(None) => false,
        Err(e) => {
            warn!("Ignoring price cache: {e}");
            false
        }
    }
}

fn read_cache(config: &EdaConfig) -> Result<(PriceSeries, PriceOrigin), AppError> {
    if let Ok(Some(meta)) = read_cache_meta(&config.cache_path) {
        if !meta.covers(&config.symbol, config.start, config.end) {
            warn!(
                "Price cache spans {}..{}, narrower than the requested {}..{}",
                meta.start, meta.end, config.start, config.end
            );
        }
    }
    let series = read_price_cache(&config.cache_path, &config.symbol)?;
    let series = clip_to_window(series, config.start, config.end)?;
    Ok((series, PriceOrigin::Cache))
}

/// Keep `start <= date < end`, the bounds the Yahoo fetch uses.
fn clip_to_window(series: PriceSeries, start: NaiveDate, end: NaiveDate) -> Result<PriceSeries, AppError> {
    let points: Vec<_> = series
        .points
        .into_iter()
        .filter(|p| p.date >= start && p.date < end)
        .collect();
    if points.is_empty() {
        return Err(AppError::data_unavailable(format!(
            "Price cache has no {} closes for {start}..{end}.",
            series.symbol
        )));
    }
    Ok(PriceSeries {
        symbol: series.symbol,
        points,
    })
}

fn fetch_yahoo(config: &EdaConfig) -> Result<(PriceSeries, PriceOrigin), AppError> {
    let client = YahooClient::from_env(config.timeout_secs)?;
    let series = client.fetch_closes(&config.symbol, config.start, config.end)?;
    Ok((series, PriceOrigin::Yahoo))
}
