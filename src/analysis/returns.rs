//! Forward-return labels.

use crate::domain::{PriceSeries, ReturnRecord, ReturnSeries};

/// Attach `close[t + horizon] / close[t] - 1` to every row `t`.
///
/// The horizon counts rows (trading days), not calendar days. The last
/// `horizon` rows have no future close and carry `None`, as does any row whose
/// base close is zero or non-finite.
pub fn forward_returns(prices: &PriceSeries, horizon: usize) -> ReturnSeries {
    let closes: Vec<f64> = prices.points.iter().map(|p| p.close).collect();
    let records = prices
        .points
        .iter()
        .enumerate()
        .map(|(t, p)| ReturnRecord {
            date: p.date,
            close: p.close,
            forward_return: closes
                .get(t + horizon)
                .and_then(|&future| pct_change(p.close, future)),
        })
        .collect();

    ReturnSeries {
        symbol: prices.symbol.clone(),
        horizon,
        records,
    }
}

fn pct_change(base: f64, future: f64) -> Option<f64> {
    if !(base.is_finite() && future.is_finite()) || base == 0.0 {
        return None;
    }
    Some(future / base - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PricePoint;
    use chrono::NaiveDate;

    fn linear_prices(n: usize) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        PriceSeries {
            symbol: "SPY".to_string(),
            points: (0..n)
                .map(|i| PricePoint {
                    date: start + chrono::Days::new(i as u64),
                    close: 100.0 + i as f64,
                })
                .collect(),
        }
    }

    #[test]
    fn forward_return_looks_ahead_by_horizon() {
        let prices = linear_prices(60);
        let out = forward_returns(&prices, 25);
        assert_eq!(out.records.len(), 60);
        for t in 0..35 {
            let expected = (100.0 + (t + 25) as f64) / (100.0 + t as f64) - 1.0;
            let got = out.records[t].forward_return.unwrap();
            assert!((got - expected).abs() < 1e-12, "t={t}");
        }
    }

    #[test]
    fn last_horizon_rows_are_missing() {
        let out = forward_returns(&linear_prices(60), 25);
        assert!(out.records[34].forward_return.is_some());
        assert!(out.records[35..].iter().all(|r| r.forward_return.is_none()));
        assert_eq!(out.records[35..].len(), 25);
    }

    #[test]
    fn series_shorter_than_horizon_has_no_returns() {
        let out = forward_returns(&linear_prices(10), 25);
        assert!(out.records.iter().all(|r| r.forward_return.is_none()));
    }
}
