//! Distribution charts: fixed-bin histograms and one-line boxplots.

use crate::domain::ColumnStats;
use crate::plot::ascii::{empty_panel, map_x, range};

/// Bin finite values into `bins` equal-width bins over their range.
///
/// Returns `(min, max, counts)`; the maximum falls into the last bin.
pub fn histogram_counts(values: &[f64], bins: usize) -> Option<(f64, f64, Vec<usize>)> {
    let bins = bins.max(1);
    let (min, max) = range(values.iter().copied())?;
    let mut counts = vec![0usize; bins];
    for &v in values.iter().filter(|v| v.is_finite()) {
        let u = (v - min) / (max - min);
        let idx = ((u * bins as f64).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }
    Some((min, max, counts))
}

/// Vertical bar histogram; each bin spans an equal share of `width`.
pub fn render_histogram(title: &str, values: &[f64], bins: usize, width: usize, height: usize) -> String {
    let width = width.max(bins.max(1));
    let height = height.max(2);
    let Some((min, max, counts)) = histogram_counts(values, bins) else {
        return empty_panel(title, width);
    };
    let peak = counts.iter().copied().max().unwrap_or(0).max(1);
    let bins = counts.len();

    let mut grid = vec![vec![' '; width]; height];
    for (b, &count) in counts.iter().enumerate() {
        let bar = ((count as f64 / peak as f64) * height as f64).round() as usize;
        let x0 = b * width / bins;
        let x1 = ((b + 1) * width / bins).max(x0 + 1);
        for row in grid.iter_mut().rev().take(bar) {
            for cell in &mut row[x0..x1] {
                *cell = '#';
            }
        }
    }

    let mut out = format!("{title} [{min:.2}, {max:.2}] peak={peak}\n");
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out
}

/// Boxplot on one line: `|` at min/median/max, `[ ]` around the quartiles.
pub fn render_boxplot(stats: &ColumnStats, width: usize) -> String {
    let width = width.max(5);
    let (Some(min), Some(q25), Some(median), Some(q75), Some(max)) =
        (stats.min, stats.q25, stats.median, stats.q75, stats.max)
    else {
        return empty_panel(&stats.name, width);
    };
    let (lo, hi) = if max > min { (min, max) } else { (min - 0.5, max + 0.5) };
    let at = |v: f64| map_x(v, lo, hi, width);

    let mut line = vec![' '; width];
    for cell in &mut line[at(min)..=at(max)] {
        *cell = '-';
    }
    for cell in &mut line[at(q25)..=at(q75)] {
        *cell = '=';
    }
    line[at(q25)] = '[';
    line[at(q75)] = ']';
    line[at(median)] = '|';
    line[at(min)] = '|';
    line[at(max)] = '|';

    let mean = stats.mean.map(|m| format!("{m:.2}")).unwrap_or_else(|| "-".to_string());
    format!(
        "{}\n{}\nmin={min:.2} q1={q25:.2} med={median:.2} q3={q75:.2} max={max:.2} mean={mean}\n",
        stats.name,
        line.into_iter().collect::<String>()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(min: f64, q25: f64, median: f64, q75: f64, max: f64) -> ColumnStats {
        ColumnStats {
            name: "cpi".to_string(),
            count: 5,
            mean: Some(median),
            std: Some(1.0),
            min: Some(min),
            q25: Some(q25),
            median: Some(median),
            q75: Some(q75),
            max: Some(max),
        }
    }

    #[test]
    fn histogram_puts_max_in_last_bin() {
        let (min, max, counts) = histogram_counts(&[0.0, 1.0, 2.0, 3.0, 4.0], 4).unwrap();
        assert_eq!((min, max), (0.0, 4.0));
        assert_eq!(counts, vec![1, 1, 1, 2]);
    }

    #[test]
    fn histogram_ignores_non_finite() {
        let (_, _, counts) = histogram_counts(&[1.0, f64::NAN, 2.0], 2).unwrap();
        assert_eq!(counts.iter().sum::<usize>(), 2);
        assert!(histogram_counts(&[f64::NAN], 2).is_none());
    }

    #[test]
    fn histogram_bars_scale_to_peak() {
        let txt = render_histogram("h", &[0.0, 1.0, 1.0], 2, 4, 2);
        let body: Vec<&str> = txt.lines().skip(1).collect();
        assert_eq!(body, vec!["  ##", "####"]);
    }

    #[test]
    fn boxplot_marks_five_numbers() {
        let txt = render_boxplot(&stats(0.0, 25.0, 50.0, 75.0, 100.0), 11);
        let line = txt.lines().nth(1).unwrap();
        assert_eq!(line, "|--[=|==]-|");
    }

    #[test]
    fn boxplot_without_stats_is_placeholder() {
        let mut s = stats(0.0, 0.0, 0.0, 0.0, 0.0);
        s.min = None;
        assert!(render_boxplot(&s, 10).contains("(no data)"));
    }
}
