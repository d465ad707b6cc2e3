//! Terminal charts.
//!
//! Everything here returns a `String`; callers decide where it goes.

pub mod ascii;
pub mod dist;
pub mod grid;
pub mod heatmap;
pub mod panels;

pub use ascii::{render_line_chart, render_scatter};
pub use dist::{histogram_counts, render_boxplot, render_histogram};
pub use grid::GridLayout;
pub use heatmap::render_heatmap;
pub use panels::{boxplot_panels, histogram_panels, line_panels, scatter_matrix, trend_panel};
