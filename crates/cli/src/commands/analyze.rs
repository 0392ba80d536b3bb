//! Single-window analyze command.
//!
//! Analyzes the window of `window_months` distinct periods ending at (or
//! at the last period before) the base date, then writes per-fund results,
//! rankings, aggregates, tests, and the exclusion report.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;
use tracing::info;

use fund_bench_analysis::engine::{compute_single_window, window_ending_at};
use fund_bench_analysis::window::{distinct_periods, flag_outliers};
use fund_bench_data::{load_funds, load_returns, ReportWriter};

use super::{CommonArgs, OUTLIER_THRESHOLD};

/// Arguments for the analyze command.
#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Base date the window ends at (ISO format); defaults to the latest
    /// period in the panel
    #[arg(long)]
    pub base_date: Option<NaiveDate>,

    /// Also write the full analysis as JSON next to the CSV reports
    #[arg(long)]
    pub json: bool,
}

/// Runs the analyze command.
///
/// # Errors
/// Returns an error on unreadable input, insufficient history, internally
/// inconsistent data, or report-writing failure.
pub fn run_analyze(args: AnalyzeArgs) -> Result<()> {
    let config = args.common.load_config()?;
    let funds = load_funds(Path::new(&args.common.attributes))?;
    let returns = load_returns(Path::new(&args.common.returns))?;

    let outliers = flag_outliers(&returns, OUTLIER_THRESHOLD);
    if !outliers.is_empty() {
        info!(count = outliers.len(), "outlier returns flagged, not removed");
    }

    let periods = distinct_periods(&returns);
    let base_date = args
        .base_date
        .or_else(|| periods.last().copied())
        .context("Return panel contains no periods")?;

    let window = window_ending_at(&periods, base_date, config.window_months)?;
    info!(
        start = %window.start_date,
        end = %window.end_date,
        months = config.window_months,
        "analyzing single window"
    );

    let analysis = compute_single_window(&funds, &returns, &window, &config)?;

    let writer = ReportWriter::new(Path::new(&args.common.output_dir))?;
    writer.write_fund_results(&analysis.fund_results)?;
    writer.write_ranking(&analysis.hedge_reports)?;
    writer.write_aggregates(&analysis.hedge_reports)?;
    writer.write_tests(&analysis.hedge_reports)?;
    writer.write_excluded(&analysis.excluded)?;
    writer.write_outliers(&outliers)?;

    if args.json {
        let path = Path::new(&args.common.output_dir).join("analysis.json");
        let file = std::fs::File::create(&path)
            .with_context(|| format!("Failed to create JSON file: {}", path.display()))?;
        serde_json::to_writer_pretty(file, &analysis)?;
    }

    for report in &analysis.hedge_reports {
        match &report.aggregates {
            Some(aggregates) => info!(
                hedge_status = %report.hedge_status,
                active = report.active_count,
                passive = report.passive_count,
                excess_all_equal = aggregates.excess_all_equal,
                excess_top_half_equal = aggregates.excess_top_half_equal,
                "window aggregates"
            ),
            None => info!(
                hedge_status = %report.hedge_status,
                reason = report.skipped.as_deref().unwrap_or(""),
                "hedge status skipped"
            ),
        }
    }
    info!(output_dir = %args.common.output_dir, "analyze complete");
    Ok(())
}
