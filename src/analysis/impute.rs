//! Forward-fill imputation of the macro table.

use crate::domain::{MacroColumn, MacroSeries};

/// Carry the last observed value forward over gaps.
///
/// Leading gaps stay missing: there is no earlier value to carry.
pub fn forward_fill(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut last = None;
    values
        .iter()
        .map(|v| {
            if v.is_some() {
                last = *v;
            }
            last
        })
        .collect()
}

/// Forward-fill every indicator column independently, in date order.
pub fn impute_forward_fill(series: &MacroSeries) -> MacroSeries {
    MacroSeries {
        dates: series.dates.clone(),
        columns: series
            .columns
            .iter()
            .map(|c| MacroColumn {
                name: c.name.clone(),
                values: forward_fill(&c.values),
            })
            .collect(),
    }
}

/// Missing-value count per column, in column order.
pub fn missing_counts(series: &MacroSeries) -> Vec<(String, usize)> {
    series
        .columns
        .iter()
        .map(|c| (c.name.clone(), c.values.iter().filter(|v| v.is_none()).count()))
        .collect()
}
