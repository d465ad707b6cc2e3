//! Small-multiples layout.
//!
//! Every multi-panel chart (line, histogram, boxplot, scatter matrix) places
//! its panels through [`GridLayout`]: row-major positions for `count` items on
//! a `rows x cols` grid, then side-by-side composition of the text panels.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub rows: usize,
    pub cols: usize,
}

impl GridLayout {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows: rows.max(1),
            cols: cols.max(1),
        }
    }

    /// The smallest grid of at most `max_cols` columns holding `count` items.
    pub fn for_items(count: usize, max_cols: usize) -> Self {
        let cols = max_cols.max(1).min(count.max(1));
        Self::new(count.div_ceil(cols), cols)
    }

    pub fn capacity(&self) -> usize {
        self.rows * self.cols
    }

    /// Zero-based `(row, col)` of item `index`, or `None` past the grid.
    pub fn position(&self, index: usize) -> Option<(usize, usize)> {
        (index < self.capacity()).then(|| (index / self.cols, index % self.cols))
    }

    /// Lay out `panels` row-major; panels beyond the capacity are dropped.
    pub fn compose(&self, panels: &[String], gap: usize) -> String {
        let width = panels
            .iter()
            .flat_map(|p| p.lines())
            .map(|l| l.chars().count())
            .max()
            .unwrap_or(0);

        let mut rows: Vec<Vec<&String>> = vec![Vec::new(); self.rows];
        for (i, panel) in panels.iter().enumerate() {
            if let Some((r, _)) = self.position(i) {
                rows[r].push(panel);
            }
        }

        let mut out = String::new();
        for row in rows.into_iter().filter(|r| !r.is_empty()) {
            let split: Vec<Vec<&str>> = row.iter().map(|p| p.lines().collect()).collect();
            let height = split.iter().map(Vec::len).max().unwrap_or(0);
            for line_idx in 0..height {
                let mut line = String::new();
                for (col, lines) in split.iter().enumerate() {
                    let text = lines.get(line_idx).copied().unwrap_or("");
                    line.push_str(text);
                    if col + 1 < split.len() {
                        let pad = width - text.chars().count() + gap;
                        line.push_str(&" ".repeat(pad));
                    }
                }
                out.push_str(line.trim_end());
                out.push('\n');
            }
            out.push('\n');
        }
        out
    }
}
