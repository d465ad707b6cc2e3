//! Correlation heatmap as shaded text cells.
//!
//! Each cell is three characters: the sign of `r` followed by two shade
//! characters scaled by `|r|` over `0..1`. Undefined correlations print `  ?`.

use crate::domain::CorrelationMatrix;

const SHADES: [char; 6] = [' ', '.', ':', '=', '#', '@'];
const MAX_LABEL: usize = 24;

pub fn shade_cell(r: f64) -> String {
    if !r.is_finite() {
        return "  ?".to_string();
    }
    let level = (r.abs().min(1.0) * (SHADES.len() - 1) as f64).round() as usize;
    let sign = if r < 0.0 { '-' } else { '+' };
    let ch = SHADES[level];
    format!("{sign}{ch}{ch}")
}

pub fn render_heatmap(title: &str, matrix: &CorrelationMatrix) -> String {
    if matrix.labels.is_empty() {
        return format!("{title}\n(no columns)\n");
    }
    let label_width = matrix
        .labels
        .iter()
        .map(|l| l.chars().count().min(MAX_LABEL))
        .max()
        .unwrap_or(0);

    let mut out = format!("{title}\n");
    out.push_str(&" ".repeat(label_width + 5));
    for j in 0..matrix.labels.len() {
        out.push_str(&format!("{j:>3} "));
    }
    out.push('\n');

    for (i, (label, row)) in matrix.labels.iter().zip(&matrix.values).enumerate() {
        let short: String = label.chars().take(MAX_LABEL).collect();
        out.push_str(&format!("{i:>3} {short:<label_width$} "));
        for &r in row {
            out.push_str(&shade_cell(r));
            out.push(' ');
        }
        out.truncate(out.trim_end().len());
        out.push('\n');
    }
    out.push_str("scale: ' ' 0 .. '@' 1, sign prefix, '?' undefined\n");
    out
}
