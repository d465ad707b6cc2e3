//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the analysis code stays clean and testable
//! - output changes are localized

use crate::app::pipeline::TrendFit;
use crate::data::PriceOrigin;
use crate::domain::{BucketSummary, ColumnStats, CorrelationMatrix, FeatureSets, MacroSeries, ReturnSeries};
use crate::io::ingest::IngestedMacro;

const NAME_WIDTH: usize = 24;
const MAX_ROW_ERRORS: usize = 10;

/// Header block: input shape, column kinds and skipped rows.
pub fn format_overview(ingest: &IngestedMacro) -> String {
    let mut out = String::new();

    out.push_str("=== eda - Macro Indicators vs Forward Equity Returns ===\n");
    out.push_str(&format!(
        "Rows: read={} used={} | indicators={}\n",
        ingest.rows_read,
        ingest.rows_used,
        ingest.series.columns.len()
    ));
    if let (Some(first), Some(last)) = (ingest.series.dates.first(), ingest.series.dates.last()) {
        out.push_str(&format!("Dates: {first} .. {last}\n"));
    }

    out.push_str("\nColumns:\n");
    out.push_str(&format!("{:<NAME_WIDTH$} {:<8} {:>8}\n", "column", "dtype", "non-null"));
    out.push_str(&format!("{:-<NAME_WIDTH$} {:-<8} {:-<8}\n", "", "", ""));
    for info in &ingest.column_info {
        out.push_str(&format!(
            "{:<NAME_WIDTH$} {:<8} {:>8}\n",
            truncate(&info.name, NAME_WIDTH),
            info.kind.label(),
            info.non_null
        ));
    }

    if !ingest.row_errors.is_empty() {
        out.push_str(&format!("\nSkipped rows ({}):\n", ingest.row_errors.len()));
        for e in ingest.row_errors.iter().take(MAX_ROW_ERRORS) {
            out.push_str(&format!("  line {}: {}\n", e.line, e.message));
        }
        if ingest.row_errors.len() > MAX_ROW_ERRORS {
            out.push_str(&format!("  ... and {} more\n", ingest.row_errors.len() - MAX_ROW_ERRORS));
        }
    }

    out
}

/// First `n` rows of the series.
pub fn format_head(series: &MacroSeries, n: usize) -> String {
    let mut out = String::new();
    let mut header = format!("{:<10}", "Date");
    for c in &series.columns {
        header.push_str(&format!(" {:>12}", truncate(&c.name, 12)));
    }
    out.push_str(header.trim_end());
    out.push('\n');

    for (i, date) in series.dates.iter().take(n).enumerate() {
        let mut line = date.to_string();
        for c in &series.columns {
            line.push_str(&format!(" {:>12}", fmt_opt(c.values[i], 4)));
        }
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// Per-column missing counts before and after forward fill.
pub fn format_missing(before: &[(String, usize)], after: &[(String, usize)]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<NAME_WIDTH$} {:>8} {:>8}\n", "column", "before", "after"));
    for ((name, b), (_, a)) in before.iter().zip(after) {
        out.push_str(&format!("{:<NAME_WIDTH$} {b:>8} {a:>8}\n", truncate(name, NAME_WIDTH)));
    }
    out
}

pub fn format_describe(stats: &[ColumnStats]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<NAME_WIDTH$} {:>6} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}\n",
        "column", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
    ));
    for s in stats {
        out.push_str(&format!(
            "{:<NAME_WIDTH$} {:>6} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}\n",
            truncate(&s.name, NAME_WIDTH),
            s.count,
            fmt_opt(s.mean, 3),
            fmt_opt(s.std, 3),
            fmt_opt(s.min, 3),
            fmt_opt(s.q25, 3),
            fmt_opt(s.median, 3),
            fmt_opt(s.q75, 3),
            fmt_opt(s.max, 3),
        ));
    }
    out
}

/// Numeric correlation table; columns are referenced by row index.
pub fn format_correlation(matrix: &CorrelationMatrix) -> String {
    let mut out = String::new();
    let mut header = format!("{:>3} {:<NAME_WIDTH$}", "", "");
    for j in 0..matrix.labels.len() {
        header.push_str(&format!(" {j:>6}"));
    }
    out.push_str(header.trim_end());
    out.push('\n');

    for (i, (label, row)) in matrix.labels.iter().zip(&matrix.values).enumerate() {
        let mut line = format!("{i:>3} {:<NAME_WIDTH$}", truncate(label, NAME_WIDTH));
        for &r in row {
            line.push_str(&format!(" {:>6}", fmt_f(r, 2)));
        }
        out.push_str(&line);
        out.push('\n');
    }
    out
}

pub fn format_features(features: &FeatureSets) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "High correlation with `{}` (|corr| > {}):\n  {}\n",
        features.target,
        features.threshold,
        features.high_corr.join(", ")
    ));
    out.push_str(&format!("Complement (+ target):\n  {}\n", features.complement.join(", ")));
    out
}

/// Indicators ordered by |corr| with the forward return.
pub fn format_return_ranking(ranking: &[(String, f64)], return_column: &str) -> String {
    let mut out = format!("Correlation with {return_column}:\n");
    for (name, r) in ranking {
        out.push_str(&format!("  {:<NAME_WIDTH$} {:>7}\n", truncate(name, NAME_WIDTH), fmt_f(*r, 3)));
    }
    out
}

/// Bucket table; an empty bucket shows its mean as `NaN`.
pub fn format_buckets(summary: &BucketSummary) -> String {
    let mut out = format!("Mean forward return by {} range:\n", summary.column);
    out.push_str(&format!("  {:<8} {:>6} {:>9} {:>10}\n", "range", "rows", "returns", "mean"));
    for row in &summary.rows {
        out.push_str(&format!(
            "  {:<8} {:>6} {:>9} {:>10}\n",
            row.label,
            row.count,
            row.n_returns,
            fmt_opt(row.mean_return, 5)
        ));
    }
    out
}

pub fn format_trends(trends: &[TrendFit], return_column: &str) -> String {
    let mut out = String::from("Trend lines:\n");
    for t in trends {
        match &t.line {
            Some(line) => out.push_str(&format!(
                "  {return_column} = {:.5} + {:.5} * {} (R2={:.4}, n={})\n",
                line.intercept, line.slope, t.x_column, line.r_squared, line.n
            )),
            None => out.push_str(&format!("  {}: unavailable (not enough data)\n", t.x_column)),
        }
    }
    out
}

pub fn format_prices(returns: &ReturnSeries, origin: PriceOrigin) -> String {
    let mut out = format!(
        "Prices: {} rows of {} from {} (horizon={} rows)\n",
        returns.records.len(),
        returns.symbol,
        origin.label(),
        returns.horizon
    );
    if let (Some(first), Some(last)) = (returns.records.first(), returns.records.last()) {
        out.push_str(&format!(
            "  {} close={:.2} .. {} close={:.2}\n",
            first.date, first.close, last.date, last.close
        ));
    }
    out
}

fn fmt_opt(v: Option<f64>, decimals: usize) -> String {
    v.map(|x| fmt_f(x, decimals)).unwrap_or_else(|| "NaN".to_string())
}

fn fmt_f(v: f64, decimals: usize) -> String {
    if v.is_finite() {
        format!("{v:.decimals$}")
    } else {
        "NaN".to_string()
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BucketStat, TrendLine};

    #[test]
    fn empty_bucket_mean_prints_nan() {
        let summary = BucketSummary {
            column: "Inflation_Rate_%".to_string(),
            rows: vec![
                BucketStat {
                    label: "(0,2]".to_string(),
                    count: 3,
                    n_returns: 2,
                    mean_return: Some(0.04),
                },
                BucketStat {
                    label: "8+".to_string(),
                    count: 0,
                    n_returns: 0,
                    mean_return: None,
                },
            ],
        };
        let txt = format_buckets(&summary);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines[2], "  (0,2]         3         2    0.04000");
        assert_eq!(lines[3], "  8+            0         0        NaN");
    }

    #[test]
    fn trends_report_unavailable_fits() {
        let trends = vec![
            TrendFit {
                x_column: "CPI".to_string(),
                line: Some(TrendLine {
                    x_column: "CPI".to_string(),
                    y_column: "F1M_Return".to_string(),
                    intercept: 0.01,
                    slope: -0.002,
                    r_squared: 0.25,
                    n: 40,
                }),
            },
            TrendFit {
                x_column: "Yield".to_string(),
                line: None,
            },
        ];
        let txt = format_trends(&trends, "F1M_Return");
        assert!(txt.contains("F1M_Return = 0.01000 + -0.00200 * CPI (R2=0.2500, n=40)"));
        assert!(txt.contains("Yield: unavailable"));
    }

    #[test]
    fn truncate_marks_cut_names() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("Unemployment Rate", 8), "Unemplo.");
    }

    #[test]
    fn correlation_prints_nan_cells() {
        let matrix = CorrelationMatrix {
            labels: vec!["a".to_string(), "flat".to_string()],
            values: vec![vec![1.0, f64::NAN], vec![f64::NAN, f64::NAN]],
        };
        let txt = format_correlation(&matrix);
        assert!(txt.lines().nth(1).unwrap().ends_with("1.00    NaN"));
    }
}
