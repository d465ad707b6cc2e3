//! Mathematical utilities: least squares and missing-aware statistics.

pub mod ols;
pub mod stats;

pub use ols::*;
pub use stats::*;
