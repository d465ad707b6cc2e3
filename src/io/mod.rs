//! Input/output helpers.
//!
//! - macro CSV ingest + validation (`ingest`)
//! - the forward-return price cache (`cache`)
//! - merged-table CSV export (`export`)
//! - run summary JSON (`summary`)

pub mod cache;
pub mod export;
pub mod ingest;
pub mod summary;

pub use cache::*;
pub use export::*;
pub use ingest::*;
pub use summary::*;
