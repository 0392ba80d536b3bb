//! Rolling-window command.
//!
//! Slides the configured window across the whole panel, writes the
//! per-window rows, coverage gaps, and the cross-window summary.

use std::path::Path;

use anyhow::Result;
use clap::Args;
use tracing::info;

use fund_bench_analysis::rolling::{run_rolling as roll, summarize};
use fund_bench_analysis::window::flag_outliers;
use fund_bench_data::{load_funds, load_returns, ReportWriter};

use super::{CommonArgs, OUTLIER_THRESHOLD};

/// Arguments for the rolling command.
#[derive(Args, Debug, Clone)]
pub struct RollingArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Minimum window count before a robustness warning (overrides config)
    #[arg(long)]
    pub min_windows: Option<usize>,
}

/// Runs the rolling command.
///
/// # Errors
/// Returns an error on unreadable input, insufficient history for a single
/// window, internally inconsistent data, or report-writing failure.
pub fn run_rolling(args: RollingArgs) -> Result<()> {
    let mut config = args.common.load_config()?;
    if let Some(min_windows) = args.min_windows {
        config = config.with_min_windows(min_windows);
    }

    let funds = load_funds(Path::new(&args.common.attributes))?;
    let returns = load_returns(Path::new(&args.common.returns))?;
    let outliers = flag_outliers(&returns, OUTLIER_THRESHOLD);

    let analysis = roll(&funds, &returns, &config)?;
    let summaries = summarize(&analysis);

    let writer = ReportWriter::new(Path::new(&args.common.output_dir))?;
    writer.write_outliers(&outliers)?;
    writer.write_rolling(&analysis.results)?;
    writer.write_coverage_gaps(&analysis.coverage_gaps)?;
    writer.write_rolling_summary(&summaries)?;

    for summary in &summaries {
        info!(
            hedge_status = %summary.hedge_status,
            windows = summary.window_count,
            mean_excess_all_equal = summary.excess_all_equal.mean,
            mean_excess_top_half_equal = summary.excess_top_half_equal.mean,
            "rolling summary"
        );
    }
    info!(
        windows = analysis.window_count,
        gaps = analysis.coverage_gaps.len(),
        exclusions = analysis.exclusion_count,
        output_dir = %args.common.output_dir,
        "rolling complete"
    );
    Ok(())
}
