//! Synthetic close series for offline runs.
//!
//! A geometric random walk over weekdays, seeded from the symbol, the date
//! range and the user seed so that identical inputs reproduce identical prices.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{PricePoint, PriceSeries};
use crate::error::AppError;

const START_PRICE: f64 = 100.0;
/// Daily log-return drift and volatility, roughly an equity index.
const DAILY_DRIFT: f64 = 0.0004;
const DAILY_VOL: f64 = 0.011;

pub fn generate_prices(symbol: &str, start: NaiveDate, end: NaiveDate, seed: u64) -> Result<PriceSeries, AppError> {
    if end <= start {
        return Err(AppError::config("Invalid date range for synthetic prices."));
    }

    let mut rng = StdRng::seed_from_u64(walk_seed(symbol, start, end, seed));
    let normal = Normal::new(DAILY_DRIFT, DAILY_VOL)
        .map_err(|e| AppError::config(format!("Noise distribution error: {e}")))?;

    let mut points = Vec::new();
    let mut close = START_PRICE;
    let mut date = start;
    while date < end {
        if !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            if !points.is_empty() {
                close *= normal.sample(&mut rng).exp();
            }
            points.push(PricePoint { date, close });
        }
        date = match date.checked_add_days(Days::new(1)) {
            Some(d) => d,
            None => break,
        };
    }

    if points.is_empty() {
        return Err(AppError::data_unavailable(format!(
            "No trading days between {start} and {end}."
        )));
    }

    Ok(PriceSeries {
        symbol: symbol.to_string(),
        points,
    })
}

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Fixed mix of the inputs (FNV-1a over the symbol, then splitmix64 rounds),
/// so a seed reproduces the same walk regardless of toolchain.
fn walk_seed(symbol: &str, start: NaiveDate, end: NaiveDate, seed: u64) -> u64 {
    let mut h = FNV_OFFSET;
    for b in symbol.bytes() {
        h ^= u64::from(b);
        h = h.wrapping_mul(FNV_PRIME);
    }
    for part in [day_number(start), day_number(end), seed] {
        h = splitmix64(h ^ part);
    }
    h
}

fn day_number(date: NaiveDate) -> u64 {
    u64::from(date.num_days_from_ce().unsigned_abs())
}

fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}
