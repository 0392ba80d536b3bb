//! CSV report writers for single-window and rolling analysis output.
//!
//! One file per report, flat headers, values formatted with `to_string`.
//! Absent AUM serializes as an empty field so round-trips preserve the
//! absent-vs-zero distinction.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use csv::Writer;
use tracing::info;

use fund_bench_analysis::cohort::FundWindowResult;
use fund_bench_analysis::engine::HedgeReport;
use fund_bench_analysis::rolling::{CoverageGap, RollingResult, RollingSummary};
use fund_bench_analysis::window::ExcludedFund;
use fund_bench_core::MonthlyReturn;

/// Writes analysis reports as CSV files under one output directory.
pub struct ReportWriter {
    output_dir: PathBuf,
}

impl ReportWriter {
    /// Creates the output directory if needed.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created.
    pub fn new(output_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(output_dir).with_context(|| {
            format!("Failed to create output directory: {}", output_dir.display())
        })?;
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
        })
    }

    fn writer(&self, file_name: &str) -> Result<Writer<File>> {
        let path = self.output_dir.join(file_name);
        let file = File::create(&path)
            .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
        Ok(Writer::from_writer(file))
    }

    /// Writes per-fund window results to `fund_results.csv`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created or writing fails.
    pub fn write_fund_results(&self, results: &[FundWindowResult]) -> Result<()> {
        let mut writer = self.writer("fund_results.csv")?;
        writer.write_record([
            "fund_id",
            "fund_name",
            "fund_type",
            "currency_hedge",
            "expense_ratio",
            "aum",
            "annualized_return",
            "cumulative_return",
        ])?;
        for result in results {
            writer.write_record(&[
                result.fund_id.clone(),
                result.fund_name.clone(),
                result.fund_type.to_string(),
                result.currency_hedge.to_string(),
                result.expense_ratio.to_string(),
                result.aum.map(|v| v.to_string()).unwrap_or_default(),
                result.annualized_return.to_string(),
                result.cumulative_return.to_string(),
            ])?;
        }
        writer.flush()?;
        info!(count = results.len(), "wrote fund_results.csv");
        Ok(())
    }

    /// Writes the active rankings of every hedge report to `ranking.csv`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created or writing fails.
    pub fn write_ranking(&self, reports: &[HedgeReport]) -> Result<()> {
        let mut writer = self.writer("ranking.csv")?;
        writer.write_record([
            "hedge_status",
            "rank",
            "is_top_half",
            "fund_id",
            "fund_name",
            "annualized_return",
        ])?;
        for report in reports {
            for ranked in &report.ranking {
                writer.write_record(&[
                    report.hedge_status.to_string(),
                    ranked.rank.to_string(),
                    ranked.is_top_half.to_string(),
                    ranked.fund.fund_id.clone(),
                    ranked.fund.fund_name.clone(),
                    ranked.fund.annualized_return.to_string(),
                ])?;
            }
        }
        writer.flush()?;
        Ok(())
    }

    /// Writes the exclusion report to `excluded_funds.csv`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created or writing fails.
    pub fn write_excluded(&self, excluded: &[ExcludedFund]) -> Result<()> {
        let mut writer = self.writer("excluded_funds.csv")?;
        writer.write_record(["fund_id", "observed", "reason"])?;
        for fund in excluded {
            writer.write_record(&[
                fund.fund_id.clone(),
                fund.observed.to_string(),
                fund.reason.to_string(),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Writes per-hedge-status aggregates to `aggregates.csv`. Reports
    /// whose pair was skipped are omitted.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created or writing fails.
    pub fn write_aggregates(&self, reports: &[HedgeReport]) -> Result<()> {
        let mut writer = self.writer("aggregates.csv")?;
        writer.write_record([
            "hedge_status",
            "active_count",
            "passive_count",
            "top_half_count",
            "active_all_mean_equal",
            "active_top_half_mean_equal",
            "passive_mean_equal",
            "excess_all_equal",
            "excess_top_half_equal",
            "active_all_mean_aum",
            "active_top_half_mean_aum",
            "passive_mean_aum",
            "excess_all_aum",
            "excess_top_half_aum",
        ])?;
        for report in reports {
            let Some(a) = &report.aggregates else {
                continue;
            };
            writer.write_record(&[
                report.hedge_status.to_string(),
                report.active_count.to_string(),
                report.passive_count.to_string(),
                report.top_half_count.to_string(),
                a.active_all_mean_equal.to_string(),
                a.active_top_half_mean_equal.to_string(),
                a.passive_mean_equal.to_string(),
                a.excess_all_equal.to_string(),
                a.excess_top_half_equal.to_string(),
                a.active_all_mean_aum.to_string(),
                a.active_top_half_mean_aum.to_string(),
                a.passive_mean_aum.to_string(),
                a.excess_all_aum.to_string(),
                a.excess_top_half_aum.to_string(),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Writes significance tests to `significance_tests.csv`, one row per
    /// (hedge status, comparison) that ran.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created or writing fails.
    pub fn write_tests(&self, reports: &[HedgeReport]) -> Result<()> {
        let mut writer = self.writer("significance_tests.csv")?;
        writer.write_record([
            "hedge_status",
            "comparison",
            "t_stat",
            "p_value_t",
            "cohens_d",
            "u_stat",
            "p_value_u",
            "significant",
        ])?;
        for report in reports {
            let Some(tests) = &report.tests else {
                continue;
            };
            let rows = [
                ("active_all_vs_passive", tests.all_vs_passive),
                ("active_top_half_vs_passive", tests.top_half_vs_passive),
            ];
            for (comparison, result) in rows {
                let Some(t) = result else { continue };
                writer.write_record(&[
                    report.hedge_status.to_string(),
                    comparison.to_string(),
                    t.t_stat.to_string(),
                    t.p_value_t.to_string(),
                    t.cohens_d.to_string(),
                    t.u_stat.to_string(),
                    t.p_value_u.to_string(),
                    t.significant.to_string(),
                ])?;
            }
        }
        writer.flush()?;
        Ok(())
    }

    /// Writes the per-window rolling rows to `rolling_windows.csv`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created or writing fails.
    pub fn write_rolling(&self, results: &[RollingResult]) -> Result<()> {
        let mut writer = self.writer("rolling_windows.csv")?;
        writer.write_record([
            "window_start",
            "window_end",
            "hedge_status",
            "active_count",
            "passive_count",
            "top_half_count",
            "excess_all_equal",
            "excess_top_half_equal",
            "excess_all_aum",
            "excess_top_half_aum",
            "p_value_t_top_half",
        ])?;
        for row in results {
            let p_top = row
                .tests
                .as_ref()
                .and_then(|t| t.top_half_vs_passive)
                .map(|t| t.p_value_t.to_string())
                .unwrap_or_default();
            writer.write_record(&[
                row.window_start.to_string(),
                row.window_end.to_string(),
                row.hedge_status.to_string(),
                row.active_count.to_string(),
                row.passive_count.to_string(),
                row.top_half_count.to_string(),
                row.aggregates.excess_all_equal.to_string(),
                row.aggregates.excess_top_half_equal.to_string(),
                row.aggregates.excess_all_aum.to_string(),
                row.aggregates.excess_top_half_aum.to_string(),
                p_top,
            ])?;
        }
        writer.flush()?;
        info!(count = results.len(), "wrote rolling_windows.csv");
        Ok(())
    }

    /// Writes the cross-window summary to `rolling_summary.csv`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created or writing fails.
    pub fn write_rolling_summary(&self, summaries: &[RollingSummary]) -> Result<()> {
        let mut writer = self.writer("rolling_summary.csv")?;
        writer.write_record([
            "hedge_status",
            "window_count",
            "series",
            "mean",
            "std_dev",
            "min",
            "max",
            "top_half_significant_share",
        ])?;
        for summary in summaries {
            let share = summary
                .top_half_significant_share
                .map(|s| s.to_string())
                .unwrap_or_default();
            let series = [
                ("excess_all_equal", summary.excess_all_equal),
                ("excess_top_half_equal", summary.excess_top_half_equal),
                ("excess_all_aum", summary.excess_all_aum),
                ("excess_top_half_aum", summary.excess_top_half_aum),
            ];
            for (name, stats) in series {
                writer.write_record(&[
                    summary.hedge_status.to_string(),
                    summary.window_count.to_string(),
                    name.to_string(),
                    stats.mean.to_string(),
                    stats.std_dev.to_string(),
                    stats.min.to_string(),
                    stats.max.to_string(),
                    share.clone(),
                ])?;
            }
        }
        writer.flush()?;
        Ok(())
    }

    /// Writes flagged outlier returns to `outlier_returns.csv`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created or writing fails.
    pub fn write_outliers(&self, outliers: &[MonthlyReturn]) -> Result<()> {
        let mut writer = self.writer("outlier_returns.csv")?;
        writer.write_record(["fund_id", "period_end", "return_fraction"])?;
        for row in outliers {
            writer.write_record(&[
                row.fund_id.clone(),
                row.period_end.to_string(),
                row.return_fraction.to_string(),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Writes skipped (window, hedge status) pairs to `coverage_gaps.csv`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created or writing fails.
    pub fn write_coverage_gaps(&self, gaps: &[CoverageGap]) -> Result<()> {
        let mut writer = self.writer("coverage_gaps.csv")?;
        writer.write_record(["window_end", "hedge_status", "reason"])?;
        for gap in gaps {
            writer.write_record(&[
                gap.window_end.to_string(),
                gap.hedge_status.to_string(),
                gap.reason.clone(),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fund_bench_analysis::window::ExclusionReason;
    use fund_bench_core::{FundType, HedgeStatus};
    use tempfile::tempdir;

    fn read(dir: &Path, name: &str) -> String {
        std::fs::read_to_string(dir.join(name)).unwrap()
    }

    fn result(id: &str, aum: Option<f64>) -> FundWindowResult {
        FundWindowResult {
            fund_id: id.to_string(),
            fund_name: format!("Fund {id}"),
            fund_type: FundType::Active,
            currency_hedge: HedgeStatus::Unhedged,
            expense_ratio: 0.0125,
            aum,
            annualized_return: 0.08,
            cumulative_return: 0.26,
        }
    }

    // ============================================================
    // ReportWriter Tests
    // ============================================================

    #[test]
    fn fund_results_round_trip_header_and_rows() {
        let dir = tempdir().unwrap();
        let writer = ReportWriter::new(dir.path()).unwrap();
        writer
            .write_fund_results(&[result("F001", Some(350.5))])
            .unwrap();
        let contents = read(dir.path(), "fund_results.csv");
        assert!(contents.starts_with("fund_id,fund_name,fund_type"));
        assert!(contents.contains("F001,Fund F001,active,unhedged,0.0125,350.5"));
    }

    #[test]
    fn absent_aum_writes_empty_field() {
        let dir = tempdir().unwrap();
        let writer = ReportWriter::new(dir.path()).unwrap();
        writer.write_fund_results(&[result("F002", None)]).unwrap();
        let contents = read(dir.path(), "fund_results.csv");
        assert!(contents.contains("unhedged,0.0125,,0.08"));
    }

    #[test]
    fn excluded_report_carries_reason_text() {
        let dir = tempdir().unwrap();
        let writer = ReportWriter::new(dir.path()).unwrap();
        writer
            .write_excluded(&[ExcludedFund {
                fund_id: "F003".to_string(),
                observed: 34,
                reason: ExclusionReason::IncompleteRecord,
            }])
            .unwrap();
        let contents = read(dir.path(), "excluded_funds.csv");
        assert!(contents.contains("F003,34,incomplete record"));
    }

    #[test]
    fn nested_output_directory_is_created() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("reports").join("latest");
        let writer = ReportWriter::new(&nested).unwrap();
        writer.write_excluded(&[]).unwrap();
        assert!(nested.join("excluded_funds.csv").exists());
    }
}
