//! Yahoo Finance chart API integration for daily closes.

use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveTime};
use log::{debug, info};
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::domain::{PricePoint, PriceSeries};
use crate::error::AppError;

const BASE_URL: &str = "https://query2.finance.yahoo.com/v8/finance/chart";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

pub struct YahooClient {
    client: Client,
    base_url: String,
}

impl YahooClient {
    /// Build a client; `YAHOO_CHART_URL` (environment or `.env`) overrides the endpoint.
    pub fn from_env(timeout_secs: u64) -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let base_url = std::env::var("YAHOO_CHART_URL").unwrap_or_else(|_| BASE_URL.to_string());
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AppError::data_unavailable(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, base_url })
    }

    /// Fetch daily closes for `symbol` with `start <= date < end`.
    ///
    /// One attempt only: any failure or an empty answer is `DataUnavailable`.
    pub fn fetch_closes(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<PriceSeries, AppError> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), symbol);
        let period1 = start.and_time(NaiveTime::MIN).and_utc().timestamp();
        let period2 = end.and_time(NaiveTime::MIN).and_utc().timestamp();
        info!("Fetching {symbol} closes {start}..{end} from {url}");

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("period1", period1.to_string()),
                ("period2", period2.to_string()),
                ("interval", "1d".to_string()),
                ("includeAdjustedClose", "true".to_string()),
            ])
            .send()
            .map_err(|e| AppError::data_unavailable(format!("Yahoo request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::data_unavailable(format!(
                "Yahoo request for {symbol} failed with status {}.",
                resp.status()
            )));
        }

        let body: ChartResponse = resp
            .json()
            .map_err(|e| AppError::data_unavailable(format!("Failed to parse Yahoo response: {e}")))?;

        let points: Vec<PricePoint> = parse_chart(symbol, body)?
            .into_iter()
            .filter(|p| p.date >= start && p.date < end)
            .collect();
        if points.is_empty() {
            return Err(AppError::data_unavailable(format!(
                "No {symbol} closes returned for {start}..{end}."
            )));
        }
        debug!("Received {} closes for {symbol}", points.len());

        Ok(PriceSeries {
            symbol: symbol.to_string(),
            points,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
    adjclose: Option<Vec<AdjCloseData>>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseData {
    adjclose: Vec<Option<f64>>,
}

/// Turn a chart response into ascending closes.
///
/// Adjusted closes are preferred when the response carries them. Rows with a
/// null close (holidays, halted sessions) are skipped.
fn parse_chart(symbol: &str, resp: ChartResponse) -> Result<Vec<PricePoint>, AppError> {
    let result = match (resp.chart.result, resp.chart.error) {
        (_, Some(err)) => {
            return Err(AppError::data_unavailable(format!(
                "Yahoo error for {symbol}: {}: {}",
                err.code, err.description
            )));
        }
        (Some(result), None) => result,
        (None, None) => {
            return Err(AppError::data_unavailable(format!(
                "Yahoo returned an empty result for {symbol}."
            )));
        }
    };

    let data = result
        .into_iter()
        .next()
        .ok_or_else(|| AppError::data_unavailable(format!("Yahoo result array is empty for {symbol}.")))?;

    let timestamps = data
        .timestamp
        .ok_or_else(|| AppError::data_unavailable(format!("Yahoo returned no timestamps for {symbol}.")))?;

    let closes = match data.indicators.adjclose.and_then(|v| v.into_iter().next()) {
        Some(adj) => adj.adjclose,
        None => data
            .indicators
            .quote
            .into_iter()
            .next()
            .map(|q| q.close)
            .ok_or_else(|| AppError::data_unavailable(format!("Yahoo returned no quotes for {symbol}.")))?,
    };

    let mut out = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        let Some(close) = closes.get(i).copied().flatten().filter(|c| c.is_finite()) else {
            continue;
        };
        let date = DateTime::from_timestamp(ts, 0)
            .map(|dt| dt.naive_utc().date())
            .ok_or_else(|| AppError::data_unavailable(format!("Invalid Yahoo timestamp: {ts}")))?;
        out.push(PricePoint { date, close });
    }

    out.sort_by_key(|p| p.date);
    out.dedup_by_key(|p| p.date);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn parse(json: &str) -> Result<Vec<PricePoint>, AppError> {
        let resp: ChartResponse = serde_json::from_str(json).unwrap();
        parse_chart("SPY", resp)
    }

    #[test]
    fn parses_closes_and_skips_nulls() {
        // 2024-01-02, 2024-01-03, 2024-01-04 at 14:30 UTC.
        let json = r#"{"chart":{"result":[{
            "timestamp":[1704205800,1704292200,1704378600],
            "indicators":{"quote":[{"close":[472.65,null,467.28]}]}
        }],"error":null}}"#;
        let points = parse(json).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(points[1].date, NaiveDate::from_ymd_opt(2024, 1, 4).unwrap());
        assert_eq!(points[1].close, 467.28);
    }

    #[test]
    fn prefers_adjusted_closes() {
        let json = r#"{"chart":{"result":[{
            "timestamp":[1704205800],
            "indicators":{"quote":[{"close":[472.65]}],"adjclose":[{"adjclose":[466.10]}]}
        }],"error":null}}"#;
        let points = parse(json).unwrap();
        assert_eq!(points[0].close, 466.10);
    }

    #[test]
    fn api_error_is_data_unavailable() {
        let json = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        let err = parse(json).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DataUnavailable);
        assert!(err.to_string().contains("Not Found"));
    }

    #[test]
    fn missing_timestamps_is_data_unavailable() {
        let json = r#"{"chart":{"result":[{"indicators":{"quote":[{"close":[]}]}}],"error":null}}"#;
        assert_eq!(parse(json).unwrap_err().kind(), ErrorKind::DataUnavailable);
    }
}
