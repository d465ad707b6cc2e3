//! Command-line parsing for the macro/equity-return EDA tool.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the analysis code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::PriceSourceKind;
use crate::domain::config::{
    DEFAULT_CACHE_PATH, DEFAULT_CORR_THRESHOLD, DEFAULT_END, DEFAULT_HORIZON, DEFAULT_MACRO_CSV, DEFAULT_START,
    DEFAULT_SYMBOL, DEFAULT_TARGET_COLUMN, DEFAULT_TIMEOUT_SECS, DEFAULT_YIELD_COLUMN,
};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "eda", version, about = "Macro indicators vs forward equity returns (EDA)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the full pipeline: diagnostics, correlations, buckets, trends and charts.
    Run(RunArgs),
    /// Print only feature sets, bucket tables and trend lines (useful for scripting).
    Buckets(RunArgs),
    /// Fetch prices and rewrite the forward-return cache; no analysis.
    Fetch(RunArgs),
}

/// Options shared by every subcommand.
#[derive(Debug, Parser, Clone)]
pub struct RunArgs {
    /// Macro indicators CSV (`Date` plus one column per indicator).
    #[arg(long, value_name = "CSV", default_value = DEFAULT_MACRO_CSV)]
    pub macro_csv: PathBuf,

    /// Equity symbol whose forward returns are analyzed.
    #[arg(long, default_value = DEFAULT_SYMBOL)]
    pub symbol: String,

    /// First price date (inclusive, YYYY-MM-DD).
    #[arg(long, default_value = DEFAULT_START)]
    pub start: String,

    /// Last price date (exclusive, YYYY-MM-DD).
    #[arg(long, default_value = DEFAULT_END)]
    pub end: String,

    /// Forward-return horizon in trading rows.
    #[arg(long, default_value_t = DEFAULT_HORIZON)]
    pub horizon: usize,

    /// Feature selection threshold on |corr| with the target.
    #[arg(long, default_value_t = DEFAULT_CORR_THRESHOLD)]
    pub threshold: f64,

    /// Target indicator for feature selection and inflation buckets.
    #[arg(long, default_value = DEFAULT_TARGET_COLUMN)]
    pub target: String,

    /// Indicator used for the yield buckets.
    #[arg(long, default_value = DEFAULT_YIELD_COLUMN)]
    pub yield_column: String,

    /// Forward-return cache CSV (`Date,Close,F1M_Return`), rewritten every run.
    #[arg(long, value_name = "CSV", default_value = DEFAULT_CACHE_PATH)]
    pub cache: PathBuf,

    /// Where closes come from.
    #[arg(long, value_enum, default_value_t = PriceSourceKind::Auto)]
    pub source: PriceSourceKind,

    /// Random seed for the synthetic price source.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// HTTP timeout for the price fetch.
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Rows shown in the data preview.
    #[arg(long, default_value_t = 5)]
    pub head: usize,

    /// Disable the terminal charts.
    #[arg(long)]
    pub no_plot: bool,

    /// Chart panel width (columns).
    #[arg(long, default_value_t = 36)]
    pub width: usize,

    /// Chart panel height (rows).
    #[arg(long, default_value_t = 10)]
    pub height: usize,

    /// Export merged rows (with bucket labels) to CSV.
    #[arg(long = "export-merged", value_name = "CSV")]
    pub export_merged: Option<PathBuf>,

    /// Export the run summary to JSON.
    #[arg(long = "export-summary", value_name = "JSON")]
    pub export_summary: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_come_from_config_constants() {
        let cli = Cli::parse_from(["eda", "run"]);
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.symbol, "SPY");
        assert_eq!(args.horizon, 25);
        assert_eq!(args.threshold, 0.3);
        assert_eq!(args.target, "Inflation_Rate_%");
        assert_eq!(args.source, PriceSourceKind::Auto);
        assert!(!args.no_plot);
    }

    #[test]
    fn parses_source_and_exports() {
        let cli = Cli::parse_from([
            "eda",
            "buckets",
            "--source",
            "synthetic",
            "--export-summary",
            "out.json",
            "--horizon",
            "10",
        ]);
        let Command::Buckets(args) = cli.command else {
            panic!("expected buckets");
        };
        assert_eq!(args.source, PriceSourceKind::Synthetic);
        assert_eq!(args.horizon, 10);
        assert_eq!(args.export_summary, Some(PathBuf::from("out.json")));
    }
}
