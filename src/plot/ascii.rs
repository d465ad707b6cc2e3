//! ASCII plotting for terminal output.
//!
//! Deliberately "dumb" fixed-size grids, optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - series lines and trend lines: `-`/`*` strokes
//! - scatter points: `o`

use crate::domain::TrendLine;

/// Render a time series as a line; gaps (`None`) break the line.
pub fn render_line_chart(title: &str, points: &[(f64, Option<f64>)], width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(4);
    let present: Vec<(f64, f64)> = points
        .iter()
        .filter_map(|&(x, y)| y.filter(|v| v.is_finite()).map(|v| (x, v)))
        .collect();

    let Some((x_min, x_max)) = range(present.iter().map(|p| p.0)) else {
        return empty_panel(title, width);
    };
    let (y_min, y_max) = range(present.iter().map(|p| p.1)).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];
    let mut prev: Option<(usize, usize)> = None;
    for &(x, y) in points {
        match y.filter(|v| v.is_finite()) {
            Some(v) => {
                let cx = map_x(x, x_min, x_max, width);
                let cy = map_y(v, y_min, y_max, height);
                match prev {
                    Some((x0, y0)) => draw_line(&mut grid, x0, y0, cx, cy, '*'),
                    None => grid[cy][cx] = '*',
                }
                prev = Some((cx, cy));
            }
            None => prev = None,
        }
    }

    finish(format!("{title} [{y_min:.2}, {y_max:.2}]"), grid)
}

/// Render `(x, y)` points with an optional fitted trend line underneath.
pub fn render_scatter(
    title: &str,
    xs: &[f64],
    ys: &[f64],
    trend: Option<&TrendLine>,
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(4);

    let Some((x_min, x_max)) = range(xs.iter().copied()) else {
        return empty_panel(title, width);
    };
    let mut y_values: Vec<f64> = ys.to_vec();
    if let Some(t) = trend {
        y_values.push(t.predict(x_min));
        y_values.push(t.predict(x_max));
    }
    let (y_min, y_max) = range(y_values.into_iter()).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Draw the trend first so points overlay it.
    if let Some(t) = trend {
        let x0 = map_x(x_min, x_min, x_max, width);
        let y0 = map_y(t.predict(x_min), y_min, y_max, height);
        let x1 = map_x(x_max, x_min, x_max, width);
        let y1 = map_y(t.predict(x_max), y_min, y_max, height);
        draw_line(&mut grid, x0, y0, x1, y1, '-');
    }

    for (&x, &y) in xs.iter().zip(ys) {
        if !(x.is_finite() && y.is_finite()) {
            continue;
        }
        let cx = map_x(x, x_min, x_max, width);
        let cy = map_y(y, y_min, y_max, height);
        grid[cy][cx] = 'o';
    }

    finish(
        format!("{title} x=[{x_min:.2}, {x_max:.2}] y=[{y_min:.3}, {y_max:.3}]"),
        grid,
    )
}

pub(crate) fn empty_panel(title: &str, width: usize) -> String {
    format!("{title}\n{:^width$}\n", "(no data)")
}

fn finish(header: String, grid: Vec<Vec<char>>) -> String {
    let mut out = header;
    out.push('\n');
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out
}

/// Finite min/max of the values; a zero-width range is widened so it maps.
pub(crate) fn range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values.filter(|v| v.is_finite()) {
        min = min.min(v);
        max = max.max(v);
    }
    if !(min.is_finite() && max.is_finite()) {
        return None;
    }
    if max > min {
        Some((min, max))
    } else {
        Some((min - 0.5, max + 0.5))
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

pub(crate) fn map_x(t: f64, t_min: f64, t_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((t - t_min) / (t_max - t_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scatter_golden_snapshot_small() {
        let trend = TrendLine {
            x_column: "x".to_string(),
            y_column: "y".to_string(),
            intercept: 100.0,
            slope: 0.0,
            r_squared: 0.0,
            n: 2,
        };
        let txt = render_scatter("t", &[1.0, 10.0], &[100.0, 110.0], Some(&trend), 10, 5);
        let expected = concat!(
            "t x=[1.00, 10.00] y=[99.500, 110.500]\n",
            "         o\n",
            "          \n",
            "          \n",
            "          \n",
            "o---------\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn line_chart_breaks_on_gaps() {
        let points = [(0.0, Some(1.0)), (1.0, None), (2.0, Some(1.0))];
        let txt = render_line_chart("cpi", &points, 10, 4);
        let body: Vec<&str> = txt.lines().skip(1).collect();
        let stars: usize = body.iter().map(|l| l.matches('*').count()).sum();
        assert_eq!(stars, 2, "no stroke may bridge the gap");
    }

    #[test]
    fn empty_series_renders_placeholder() {
        let txt = render_line_chart("cpi", &[(0.0, None)], 12, 4);
        assert!(txt.contains("(no data)"));
    }
}
