//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - runs the shared pipeline
//! - prints reports/charts
//! - writes optional exports

use chrono::NaiveDate;
use clap::Parser;
use log::info;

use crate::cli::{Command, RunArgs};
use crate::domain::EdaConfig;
use crate::domain::config::FORWARD_RETURN_COLUMN;
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `eda` binary.
pub fn run() -> Result<(), AppError> {
    // `eda` and `eda --horizon 10` behave like `eda run ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Run(args) => handle_run(&args, OutputMode::Full),
        Command::Buckets(args) => handle_run(&args, OutputMode::BucketsOnly),
        Command::Fetch(args) => handle_fetch(&args),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Full,
    BucketsOnly,
}

fn handle_run(args: &RunArgs, mode: OutputMode) -> Result<(), AppError> {
    let config = eda_config_from_args(args)?;
    let run = pipeline::run_eda(&config)?;
    let (w, h) = (config.plot_width, config.plot_height);
    let plot = mode == OutputMode::Full && config.plot;

    if mode == OutputMode::Full {
        println!("{}", crate::report::format_overview(&run.ingest));
        println!("Head:\n{}", crate::report::format_head(&run.ingest.series, config.head));
        println!(
            "Missing values:\n{}",
            crate::report::format_missing(&run.missing_before, &run.missing_after)
        );
        println!("Describe:\n{}", crate::report::format_describe(&run.stats));

        if plot {
            println!("{}", crate::plot::line_panels(&run.imputed, w, h));
            println!("{}", crate::plot::histogram_panels(&run.imputed, w, h));
            println!("{}", crate::plot::boxplot_panels(&run.stats, w));
        }

        println!("Correlation:\n{}", crate::report::format_correlation(&run.macro_corr));
        if plot {
            println!("{}", crate::plot::render_heatmap("Correlation heatmap", &run.macro_corr));
        }
    }

    println!("{}", crate::report::format_features(&run.features));

    if plot {
        println!(
            "{}",
            crate::plot::scatter_matrix(&run.imputed, &run.features.high_corr, w, h)
        );
    }

    if mode == OutputMode::Full {
        println!("{}", crate::report::format_prices(&run.returns, run.price_origin));
        println!(
            "{}",
            crate::report::format_return_ranking(&run.return_ranking, FORWARD_RETURN_COLUMN)
        );
        if plot {
            println!(
                "{}",
                crate::plot::render_heatmap("Correlation heatmap with forward return", &run.merged_corr)
            );
        }
    }

    for summary in &run.buckets {
        println!("{}", crate::report::format_buckets(summary));
    }
    println!("{}", crate::report::format_trends(&run.trends, FORWARD_RETURN_COLUMN));

    if plot {
        for t in &run.trends {
            println!(
                "{}",
                crate::plot::trend_panel(&run.merged, &t.x_column, FORWARD_RETURN_COLUMN, t.line.as_ref(), w, h)
            );
        }
    }

    // Optional exports.
    if let Some(path) = &config.export_merged {
        let specs = [config.inflation_buckets(), config.yield_buckets()];
        crate::io::export::write_merged_csv(path, &run.merged, &specs)?;
        info!("Wrote merged rows to {}", path.display());
    }
    if let Some(path) = &config.export_summary {
        crate::io::summary::write_summary_json(path, &run, &config)?;
        info!("Wrote run summary to {}", path.display());
    }

    Ok(())
}

fn handle_fetch(args: &RunArgs) -> Result<(), AppError> {
    let config = eda_config_from_args(args)?;
    config.validate()?;
    let (prices, origin) = crate::data::load_prices(&config)?;
    let returns = pipeline::prepare_returns(&config, &prices)?;
    println!("{}", crate::report::format_prices(&returns, origin));
    Ok(())
}

pub fn eda_config_from_args(args: &RunArgs) -> Result<EdaConfig, AppError> {
    Ok(EdaConfig {
        macro_csv: args.macro_csv.clone(),
        symbol: args.symbol.clone(),
        start: parse_cli_date("--start", &args.start)?,
        end: parse_cli_date("--end", &args.end)?,
        horizon: args.horizon,
        threshold: args.threshold,
        target: args.target.clone(),
        yield_column: args.yield_column.clone(),
        cache_path: args.cache.clone(),
        source: args.source,
        seed: args.seed,
        timeout_secs: args.timeout_secs,
        head: args.head,
        plot: !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_merged: args.export_merged.clone(),
        export_summary: args.export_summary.clone(),
    })
}

fn parse_cli_date(flag: &str, value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|e| AppError::config(format!("Invalid {flag} date '{value}' (expected YYYY-MM-DD): {e}")))
}

/// Rewrite argv so `eda` defaults to `eda run`.
///
/// Rules:
/// - `eda`                      -> `eda run`
/// - `eda --horizon 10 ...`     -> `eda run --horizon 10 ...`
/// - `eda --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("run".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "run" | "buckets" | "fetch");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "run flags".
    if arg1.starts_with('-') {
        argv.insert(1, "run".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_run() {
        assert_eq!(rewrite_args(argv(&["eda"])), argv(&["eda", "run"]));
        assert_eq!(
            rewrite_args(argv(&["eda", "--horizon", "10"])),
            argv(&["eda", "run", "--horizon", "10"])
        );
    }

    #[test]
    fn explicit_subcommands_and_help_are_untouched() {
        assert_eq!(rewrite_args(argv(&["eda", "fetch"])), argv(&["eda", "fetch"]));
        assert_eq!(rewrite_args(argv(&["eda", "--help"])), argv(&["eda", "--help"]));
    }

    #[test]
    fn bad_cli_date_is_config_error() {
        let cli = crate::cli::Cli::parse_from(["eda", "run", "--start", "2018-13-01"]);
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        let err = eda_config_from_args(&args).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::InvalidConfig);
    }
}
