//! Multi-panel charts built on [`GridLayout`].

use chrono::Datelike;

use crate::domain::config::HISTOGRAM_BINS;
use crate::domain::{ColumnStats, MacroSeries, MergedTable, TrendLine};
use crate::math::stats::{complete_pairs, present};
use crate::plot::ascii::{render_line_chart, render_scatter};
use crate::plot::dist::{render_boxplot, render_histogram};
use crate::plot::grid::GridLayout;

const MAX_COLS: usize = 3;
const GAP: usize = 2;

/// One line chart per indicator, dates on the x axis.
pub fn line_panels(series: &MacroSeries, width: usize, height: usize) -> String {
    let xs: Vec<f64> = series.dates.iter().map(|d| d.num_days_from_ce() as f64).collect();
    let panels: Vec<String> = series
        .columns
        .iter()
        .map(|c| {
            let points: Vec<(f64, Option<f64>)> = xs.iter().copied().zip(c.values.iter().copied()).collect();
            render_line_chart(&c.name, &points, width, height)
        })
        .collect();
    GridLayout::for_items(panels.len(), MAX_COLS).compose(&panels, GAP)
}

pub fn histogram_panels(series: &MacroSeries, width: usize, height: usize) -> String {
    let panels: Vec<String> = series
        .columns
        .iter()
        .map(|c| render_histogram(&c.name, &present(&c.values), HISTOGRAM_BINS, width, height))
        .collect();
    GridLayout::for_items(panels.len(), MAX_COLS).compose(&panels, GAP)
}

pub fn boxplot_panels(stats: &[ColumnStats], width: usize) -> String {
    let panels: Vec<String> = stats.iter().map(|s| render_boxplot(s, width)).collect();
    GridLayout::for_items(panels.len(), MAX_COLS).compose(&panels, GAP)
}

/// Pairwise scatter plots over `columns`; the diagonal is left blank.
pub fn scatter_matrix(series: &MacroSeries, columns: &[String], width: usize, height: usize) -> String {
    let selected: Vec<_> = columns.iter().filter_map(|name| series.column(name)).collect();
    let k = selected.len();
    if k == 0 {
        return "(no columns)\n".to_string();
    }
    let layout = GridLayout::new(k, k);

    let mut panels = Vec::with_capacity(k * k);
    for index in 0..layout.capacity() {
        let Some((row, col)) = layout.position(index) else {
            break;
        };
        let (y, x) = (selected[row], selected[col]);
        if row == col {
            panels.push(format!("{}\n", y.name));
            continue;
        }
        let (xs, ys) = complete_pairs(&x.values, &y.values);
        panels.push(render_scatter(&format!("{} ~ {}", y.name, x.name), &xs, &ys, None, width, height));
    }
    layout.compose(&panels, GAP)
}

/// Forward return against an indicator, with the fitted line when there is one.
pub fn trend_panel(
    table: &MergedTable,
    x_column: &str,
    y_column: &str,
    trend: Option<&TrendLine>,
    width: usize,
    height: usize,
) -> String {
    let (Some(x), Some(y)) = (table.column_values(x_column), table.column_values(y_column)) else {
        return format!("{y_column} ~ {x_column}\n(no data)\n");
    };
    let (xs, ys) = complete_pairs(&x, &y);
    let title = match trend {
        Some(t) => format!("{y_column} ~ {x_column} (slope={:.4}, R2={:.3})", t.slope, t.r_squared),
        None => format!("{y_column} ~ {x_column} (no trend)"),
    };
    render_scatter(&title, &xs, &ys, trend, width, height)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::MacroColumn;

    fn series() -> MacroSeries {
        let dates = (1..=4)
            .map(|d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap())
            .collect();
        MacroSeries {
            dates,
            columns: vec![
                MacroColumn {
                    name: "a".to_string(),
                    values: vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0)],
                },
                MacroColumn {
                    name: "b".to_string(),
                    values: vec![Some(4.0), Some(3.0), None, Some(1.0)],
                },
            ],
        }
    }

    #[test]
    fn line_panels_place_charts_side_by_side() {
        let txt = line_panels(&series(), 12, 4);
        let first = txt.lines().next().unwrap();
        assert!(first.starts_with("a ["));
        assert!(first.contains("b ["));
    }

    #[test]
    fn scatter_matrix_hides_the_diagonal() {
        let names = vec!["a".to_string(), "b".to_string()];
        let txt = scatter_matrix(&series(), &names, 12, 4);
        assert!(txt.contains("b ~ a"));
        assert!(txt.contains("a ~ b"));
        assert!(!txt.contains("a ~ a"));
        assert!(!txt.contains("b ~ b"));
    }

    #[test]
    fn scatter_matrix_of_one_column_is_just_its_name() {
        let txt = scatter_matrix(&series(), &["a".to_string()], 12, 4);
        assert_eq!(txt, "a\n\n");
    }
}
