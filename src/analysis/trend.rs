//! OLS trend of the forward return against an indicator.

use crate::domain::{MergedTable, TrendLine};
use crate::error::AppError;
use crate::math::{complete_pairs, fit_line};

/// Fit `y = a + b·x` over merged rows where both columns are present.
///
/// `Ok(None)` when there is nothing to fit (fewer than two pairs or a constant
/// `x`); unknown columns are `MissingColumn`.
pub fn fit_trend(table: &MergedTable, x_column: &str, y_column: &str) -> Result<Option<TrendLine>, AppError> {
    let x = table.require_values(x_column)?;
    let y = table.require_values(y_column)?;
    let (xs, ys) = complete_pairs(&x, &y);

    Ok(fit_line(&xs, &ys).map(|fit| TrendLine {
        x_column: x_column.to_string(),
        y_column: y_column.to_string(),
        intercept: fit.intercept,
        slope: fit.slope,
        r_squared: fit.r_squared,
        n: xs.len(),
    }))
}
