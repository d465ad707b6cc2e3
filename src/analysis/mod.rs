//! Analysis stages of the EDA pipeline.
//!
//! Each stage takes immutable inputs and returns a new value:
//!
//! ```text
//! impute -> correlation/features -> returns -> merge -> buckets/trends
//! ```

pub mod bucket;
pub mod correlation;
pub mod describe;
pub mod impute;
pub mod merge;
pub mod returns;
pub mod trend;

pub use bucket::{bucket_labels, summarize_buckets};
pub use correlation::{correlation_matrix, macro_correlation, merged_correlation, rank_against, select_features};
pub use describe::{column_stats, describe};
pub use impute::{forward_fill, impute_forward_fill, missing_counts};
pub use merge::left_join;
pub use returns::forward_returns;
pub use trend::fit_trend;
