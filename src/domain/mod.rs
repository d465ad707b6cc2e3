//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - run configuration and its named defaults (`EdaConfig`, `config::*`)
//! - the input tables (`MacroSeries`, `PriceSeries`)
//! - derived outputs (`ReturnSeries`, `MergedTable`, `CorrelationMatrix`, buckets)

pub mod config;
pub mod types;

pub use config::{EdaConfig, PriceSourceKind};
pub use types::*;
