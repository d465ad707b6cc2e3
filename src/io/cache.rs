//! The `Date,Close,F1M_Return` price cache.
//!
//! Written on every run (overwriting) and read back by `--source auto|cache`
//! so later runs skip the network fetch. A JSON sidecar next to the CSV
//! records which symbol and date window the rows belong to.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::config::{CLOSE_COLUMN, DATE_COLUMN, FORWARD_RETURN_COLUMN};
use crate::domain::{PricePoint, PriceSeries, ReturnSeries};
use crate::error::AppError;
use crate::io::ingest::parse_date;

/// What a cache file holds: `start <= date < end` closes of `symbol`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheMeta {
    pub symbol: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub horizon: usize,
}

impl CacheMeta {
    /// True when the cache can answer a request for `symbol` over `start..end`.
    pub fn covers(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> bool {
        self.symbol == symbol && self.start <= start && self.end >= end
    }
}

/// Sidecar path: `SPY_close.csv` -> `SPY_close.meta.json`.
pub fn cache_meta_path(path: &Path) -> PathBuf {
    path.with_extension("meta.json")
}

pub fn write_price_cache(
    path: &Path,
    returns: &ReturnSeries,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create price cache '{}': {e}", path.display())))?;
    write_cache_rows(BufWriter::new(file), returns)?;

    let meta = CacheMeta {
        symbol: returns.symbol.clone(),
        start,
        end,
        horizon: returns.horizon,
    };
    let meta_path = cache_meta_path(path);
    let file = File::create(&meta_path)
        .map_err(|e| AppError::io(format!("Failed to create cache metadata '{}': {e}", meta_path.display())))?;
    serde_json::to_writer_pretty(file, &meta)
        .map_err(|e| AppError::io(format!("Failed to write cache metadata: {e}")))
}

fn write_cache_rows<W: Write>(out: W, returns: &ReturnSeries) -> Result<(), AppError> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record([DATE_COLUMN, CLOSE_COLUMN, FORWARD_RETURN_COLUMN])
        .map_err(|e| AppError::io(format!("Failed to write price cache header: {e}")))?;

    for r in &returns.records {
        wtr.write_record([
            r.date.to_string(),
            r.close.to_string(),
            r.forward_return.map(|v| v.to_string()).unwrap_or_default(),
        ])
        .map_err(|e| AppError::io(format!("Failed to write price cache row: {e}")))?;
    }
    wtr.flush()
        .map_err(|e| AppError::io(format!("Failed to flush price cache: {e}")))
}

/// Sidecar of the cache at `path`; `None` when the cache predates sidecars.
pub fn read_cache_meta(path: &Path) -> Result<Option<CacheMeta>, AppError> {
    let meta_path = cache_meta_path(path);
    if !meta_path.exists() {
        return Ok(None);
    }
    let file = File::open(&meta_path)
        .map_err(|e| AppError::io(format!("Failed to open cache metadata '{}': {e}", meta_path.display())))?;
    let meta = serde_json::from_reader(file)
        .map_err(|e| AppError::invalid_data(format!("Malformed cache metadata '{}': {e}", meta_path.display())))?;
    Ok(Some(meta))
}

/// Read cached closes of `symbol`.
///
/// The sidecar must name the same symbol; anything else is `InvalidData`.
pub fn read_price_cache(path: &Path, symbol: &str) -> Result<PriceSeries, AppError> {
    match read_cache_meta(path)? {
        Some(meta) if meta.symbol == symbol => {}
        Some(meta) => {
            return Err(AppError::invalid_data(format!(
                "Price cache '{}' holds {}, not {symbol}.",
                path.display(),
                meta.symbol
            )));
        }
        None => {
            return Err(AppError::invalid_data(format!(
                "Price cache '{}' has no metadata; cannot tell which symbol it holds.",
                path.display()
            )));
        }
    }

    let file = File::open(path)
        .map_err(|e| AppError::io(format!("Failed to open price cache '{}': {e}", path.display())))?;
    parse_price_cache(file, symbol)
}

/// Read closes back; `F1M_Return` is ignored and recomputed by the caller.
fn parse_price_cache<R: Read>(input: R, symbol: &str) -> Result<PriceSeries, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| AppError::invalid_data(format!("Failed to read price cache headers: {e}")))?
        .clone();
    let position = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}') == name)
            .ok_or_else(|| AppError::missing_column(name))
    };
    let date_idx = position(DATE_COLUMN)?;
    let close_idx = position(CLOSE_COLUMN)?;

    let mut points = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let line = idx + 2;
        let record =
            result.map_err(|e| AppError::invalid_data(format!("Price cache line {line}: {e}")))?;
        let date = record
            .get(date_idx)
            .ok_or_else(|| AppError::invalid_data(format!("Price cache line {line}: missing date")))
            .and_then(|s| parse_date(s).map_err(|e| AppError::invalid_data(format!("Price cache line {line}: {e}"))))?;
        // A blank close mirrors a null close from the provider.
        let Some(close) = record
            .get(close_idx)
            .filter(|s| !s.is_empty())
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|v| v.is_finite())
        else {
            continue;
        };
        points.push(PricePoint { date, close });
    }

    if points.is_empty() {
        return Err(AppError::data_unavailable("Price cache holds no closes."));
    }
    points.sort_by_key(|p| p.date);

    Ok(PriceSeries {
        symbol: symbol.to_string(),
        points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::forward_returns;
    use crate::error::ErrorKind;

    fn series() -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2018, 1, 2).unwrap();
        PriceSeries {
            symbol: "SPY".to_string(),
            points: (0..4)
                .map(|i| PricePoint {
                    date: start + chrono::Days::new(i),
                    close: 268.77 + i as f64 * 1.3,
                })
                .collect(),
        }
    }

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("macro-eda-cache-{name}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir.join("SPY_close.csv")
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn cache_rows_have_blank_missing_returns() {
        let returns = forward_returns(&series(), 2);
        let mut buf = Vec::new();
        write_cache_rows(&mut buf, &returns).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Date,Close,F1M_Return");
        assert_eq!(lines.len(), 5);
        assert!(lines[1].starts_with("2018-01-02,268.77,0.0"));
        assert!(lines[4].ends_with(','));
    }

    #[test]
    fn cache_round_trip_preserves_closes() {
        let prices = series();
        let mut buf = Vec::new();
        write_cache_rows(&mut buf, &forward_returns(&prices, 2)).unwrap();
        let back = parse_price_cache(buf.as_slice(), "SPY").unwrap();
        assert_eq!(back, prices);
    }

    #[test]
    fn empty_cache_is_data_unavailable() {
        let err = parse_price_cache("Date,Close,F1M_Return\n".as_bytes(), "SPY").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DataUnavailable);
    }

    #[test]
    fn cache_without_close_column_is_rejected() {
        let err = parse_price_cache("Date,Price\n2020-01-02,1.0\n".as_bytes(), "SPY").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingColumn);
    }

    #[test]
    fn sidecar_records_symbol_and_window() {
        let path = scratch("meta");
        let returns = forward_returns(&series(), 2);
        write_price_cache(&path, &returns, d(2018, 1, 1), d(2018, 2, 1)).unwrap();

        let meta = read_cache_meta(&path).unwrap().unwrap();
        assert_eq!(meta.symbol, "SPY");
        assert_eq!(meta.horizon, 2);
        assert!(meta.covers("SPY", d(2018, 1, 10), d(2018, 1, 20)));
        assert!(!meta.covers("QQQ", d(2018, 1, 10), d(2018, 1, 20)));
        assert!(!meta.covers("SPY", d(2017, 12, 1), d(2018, 1, 20)));

        assert_eq!(read_price_cache(&path, "SPY").unwrap().points.len(), 4);
    }

    #[test]
    fn cache_of_another_symbol_is_invalid_data() {
        let path = scratch("other");
        write_price_cache(&path, &forward_returns(&series(), 2), d(2018, 1, 1), d(2018, 2, 1)).unwrap();
        let err = read_price_cache(&path, "QQQ").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn cache_without_sidecar_is_invalid_data() {
        let path = scratch("bare");
        std::fs::write(&path, "Date,Close,F1M_Return\n2018-01-02,268.77,\n").unwrap();
        let _ = std::fs::remove_file(cache_meta_path(&path));
        assert!(read_cache_meta(&path).unwrap().is_none());
        let err = read_price_cache(&path, "SPY").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }
}
