//! Descriptive statistics for the macro table.

use crate::domain::{ColumnStats, MacroSeries};
use crate::math::{mean, present, quantile_sorted, sample_std};

pub fn column_stats(name: &str, values: &[Option<f64>]) -> ColumnStats {
    let mut xs = present(values);
    xs.sort_by(f64::total_cmp);

    ColumnStats {
        name: name.to_string(),
        count: xs.len(),
        mean: mean(&xs),
        std: sample_std(&xs),
        min: xs.first().copied(),
        q25: quantile_sorted(&xs, 0.25),
        median: quantile_sorted(&xs, 0.5),
        q75: quantile_sorted(&xs, 0.75),
        max: xs.last().copied(),
    }
}

pub fn describe(series: &MacroSeries) -> Vec<ColumnStats> {
    series
        .columns
        .iter()
        .map(|c| column_stats(&c.name, &c.values))
        .collect()
}
