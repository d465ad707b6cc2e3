//! Correlation matrices and correlation-driven feature selection.

use crate::domain::config::FORWARD_RETURN_COLUMN;
use crate::domain::{CorrelationMatrix, FeatureSets, MacroSeries, MergedTable};
use crate::error::AppError;
use crate::math::{complete_pairs, pearson, present, sample_std};

/// Pairwise-complete Pearson correlation over labelled columns.
///
/// Each pair uses only the rows where both columns are present. The matrix
/// is symmetric by construction; the diagonal is exactly 1 unless the column
/// is constant (or has fewer than two values), in which case it is NaN.
pub fn correlation_matrix(columns: &[(String, Vec<Option<f64>>)]) -> CorrelationMatrix {
    let n = columns.len();
    let mut values = vec![vec![f64::NAN; n]; n];

    for i in 0..n {
        let own = present(&columns[i].1);
        values[i][i] = match sample_std(&own) {
            Some(s) if s > 0.0 => 1.0,
            _ => f64::NAN,
        };
        for j in (i + 1)..n {
            let (xs, ys) = complete_pairs(&columns[i].1, &columns[j].1);
            let r = pearson(&xs, &ys);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    CorrelationMatrix {
        labels: columns.iter().map(|(name, _)| name.clone()).collect(),
        values,
    }
}

/// Correlation over every macro indicator.
pub fn macro_correlation(series: &MacroSeries) -> CorrelationMatrix {
    let columns: Vec<(String, Vec<Option<f64>>)> = series
        .columns
        .iter()
        .map(|c| (c.name.clone(), c.values.clone()))
        .collect();
    correlation_matrix(&columns)
}

/// Correlation over the macro indicators plus `F1M_Return` on the merged table.
pub fn merged_correlation(table: &MergedTable) -> Result<CorrelationMatrix, AppError> {
    let mut columns = Vec::with_capacity(table.macro_columns.len() + 1);
    for name in table
        .macro_columns
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(FORWARD_RETURN_COLUMN))
    {
        columns.push((name.to_string(), table.require_values(name)?));
    }
    Ok(correlation_matrix(&columns))
}

/// Split columns by the strength of their correlation with `target`.
///
/// `high_corr` holds `{c : |corr[target][c]| > threshold}` in column order; the
/// target is always a member. `complement` holds every other column, with the
/// target added back in its original position.
pub fn select_features(
    matrix: &CorrelationMatrix,
    target: &str,
    threshold: f64,
) -> Result<FeatureSets, AppError> {
    let row = matrix
        .row(target)
        .ok_or_else(|| AppError::missing_column(target))?;

    let mut high_corr = Vec::new();
    let mut complement = Vec::new();
    for (label, r) in row {
        let is_target = label == target;
        // NaN never exceeds the threshold.
        if is_target || r.abs() > threshold {
            high_corr.push(label.to_string());
        }
        if is_target || !(r.abs() > threshold) {
            complement.push(label.to_string());
        }
    }

    Ok(FeatureSets {
        target: target.to_string(),
        threshold,
        high_corr,
        complement,
    })
}

/// Other columns ranked by absolute correlation with `label`, strongest first.
/// Undefined (NaN) correlations sort last.
pub fn rank_against(matrix: &CorrelationMatrix, label: &str) -> Vec<(String, f64)> {
    let Some(row) = matrix.row(label) else {
        return Vec::new();
    };
    let mut ranked: Vec<(String, f64)> = row
        .into_iter()
        .filter(|(l, _)| *l != label)
        .map(|(l, r)| (l.to_string(), r))
        .collect();
    ranked.sort_by(|a, b| {
        let ka = if a.1.is_nan() { -1.0 } else { a.1.abs() };
        let kb = if b.1.is_nan() { -1.0 } else { b.1.abs() };
        kb.partial_cmp(&ka).unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::DEFAULT_CORR_THRESHOLD;

    fn col(name: &str, values: &[f64]) -> (String, Vec<Option<f64>>) {
        (name.to_string(), values.iter().map(|&v| Some(v)).collect())
    }

    fn sample() -> Vec<(String, Vec<Option<f64>>)> {
        vec![
            col("Inflation_Rate_%", &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]),
            col("10Y", &[0.5, 1.1, 1.4, 2.2, 2.4, 3.1]),
            col("Noise", &[1.0, -1.0, -1.0, 1.0, 1.0, -1.0]),
            col("Flat", &[2.0, 2.0, 2.0, 2.0, 2.0, 2.0]),
        ]
    }

    #[test]
    fn matrix_is_symmetric_with_unit_diagonal() {
        let m = correlation_matrix(&sample());
        let n = m.labels.len();
        for i in 0..n {
            for j in 0..n {
                let (a, b) = (m.values[i][j], m.values[j][i]);
                assert!(a == b || (a.is_nan() && b.is_nan()), "({i},{j})");
                if !a.is_nan() {
                    assert!((-1.0..=1.0).contains(&a));
                }
            }
        }
        assert_eq!(m.values[0][0], 1.0);
        assert_eq!(m.values[1][1], 1.0);
        assert_eq!(m.values[2][2], 1.0);
        assert!(m.values[3][3].is_nan(), "constant column has undefined correlation");
        assert!(m.values[0][3].is_nan());
    }

    #[test]
    fn pairwise_complete_observations() {
        let cols = vec![
            ("a".to_string(), vec![Some(1.0), Some(2.0), None, Some(4.0)]),
            ("b".to_string(), vec![Some(2.0), Some(4.0), Some(100.0), Some(8.0)]),
        ];
        let m = correlation_matrix(&cols);
        assert!((m.get("a", "b").unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn threshold_filter_matches_definition() {
        let m = correlation_matrix(&sample());
        let target = "Inflation_Rate_%";
        let sets = select_features(&m, target, DEFAULT_CORR_THRESHOLD).unwrap();

        let expected: Vec<String> = m
            .labels
            .iter()
            .filter(|c| m.get(target, c).unwrap().abs() > DEFAULT_CORR_THRESHOLD)
            .cloned()
            .collect();
        assert_eq!(sets.high_corr, expected);
        assert!(sets.high_corr.contains(&target.to_string()));
        assert!(sets.high_corr.contains(&"10Y".to_string()));
        assert!(!sets.high_corr.contains(&"Noise".to_string()));
        assert!(!sets.high_corr.contains(&"Flat".to_string()));
    }

    #[test]
    fn complement_is_difference_plus_target() {
        let m = correlation_matrix(&sample());
        let sets = select_features(&m, "Inflation_Rate_%", 0.3).unwrap();
        for label in &m.labels {
            let in_high = sets.high_corr.contains(label);
            let in_comp = sets.complement.contains(label);
            if label == "Inflation_Rate_%" {
                assert!(in_high && in_comp);
            } else {
                assert!(in_high != in_comp, "{label} must be in exactly one set");
            }
        }
    }

    #[test]
    fn threshold_can_leave_only_the_target() {
        let m = correlation_matrix(&sample());
        let sets = select_features(&m, "Inflation_Rate_%", 1.0).unwrap();
        assert_eq!(sets.high_corr, vec!["Inflation_Rate_%".to_string()]);
        assert_eq!(sets.complement.len(), m.labels.len());
    }

    #[test]
    fn unknown_target_is_a_missing_column() {
        let m = correlation_matrix(&sample());
        let err = select_features(&m, "CPI", 0.3).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::MissingColumn);
    }

    #[test]
    fn ranking_puts_strongest_first_and_nan_last() {
        let m = correlation_matrix(&sample());
        let ranked = rank_against(&m, "Inflation_Rate_%");
        assert_eq!(ranked[0].0, "10Y");
        assert_eq!(ranked.last().unwrap().0, "Flat");
    }
}
