//! Window validation over the monthly return panel.
//!
//! A fund is window-eligible iff its records inside the window match the
//! window's period set exactly. Funds with gaps or duplicate periods are
//! excluded from that window only and reported; exclusion is never fatal.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use fund_bench_core::{AnalysisWindow, MonthlyReturn};

/// Why a fund was excluded from one window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    /// Fewer records than window periods, or periods that do not line up
    /// with the window's period set.
    IncompleteRecord,
    /// The same period appears more than once. Silently averaging or
    /// picking one would misstate the compounding, so the fund is dropped.
    DuplicatePeriods,
    /// A growth factor went non-positive during compounding.
    NonPositiveGrowth,
}

impl std::fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IncompleteRecord => write!(f, "incomplete record"),
            Self::DuplicatePeriods => write!(f, "duplicate periods"),
            Self::NonPositiveGrowth => write!(f, "non-positive growth factor"),
        }
    }
}

/// One excluded fund with the evidence for the exclusion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcludedFund {
    /// The excluded fund.
    pub fund_id: String,
    /// Records observed inside the window.
    pub observed: usize,
    /// Why the fund was dropped.
    pub reason: ExclusionReason,
}

/// Output of window validation: per-fund ordered return arrays for
/// eligible funds, plus the exclusion report.
#[derive(Debug, Clone, Default)]
pub struct WindowPanel {
    /// Ordered (by `period_end` ascending) returns per eligible fund,
    /// ready for compounding. Keyed deterministically by fund id.
    pub eligible: BTreeMap<String, Vec<f64>>,
    /// Funds observed in the window but not eligible.
    pub excluded: Vec<ExcludedFund>,
}

/// Validates the return panel against one window.
///
/// Filters to `period_end` within the window, groups by fund, orders each
/// group ascending, and admits a fund only when its period sequence equals
/// the window's period set. Funds absent from the window entirely are not
/// reported; funds present but incomplete or duplicated are.
#[must_use]
pub fn validate_window(returns: &[MonthlyReturn], window: &AnalysisWindow) -> WindowPanel {
    let mut by_fund: HashMap<&str, Vec<(NaiveDate, f64)>> = HashMap::new();
    for row in returns {
        if window.contains(row.period_end) {
            by_fund
                .entry(row.fund_id.as_str())
                .or_default()
                .push((row.period_end, row.return_fraction));
        }
    }

    let mut panel = WindowPanel::default();
    for (fund_id, mut rows) in by_fund {
        rows.sort_by_key(|(period_end, _)| *period_end);

        let has_duplicates = rows.windows(2).any(|pair| pair[0].0 == pair[1].0);
        if has_duplicates {
            debug!(fund_id, observed = rows.len(), "excluding fund: duplicate periods");
            panel.excluded.push(ExcludedFund {
                fund_id: fund_id.to_string(),
                observed: rows.len(),
                reason: ExclusionReason::DuplicatePeriods,
            });
            continue;
        }

        let matches_window = rows.len() == window.len()
            && rows
                .iter()
                .zip(&window.periods)
                .all(|((period_end, _), expected)| period_end == expected);
        if !matches_window {
            debug!(fund_id, observed = rows.len(), "excluding fund: incomplete record");
            panel.excluded.push(ExcludedFund {
                fund_id: fund_id.to_string(),
                observed: rows.len(),
                reason: ExclusionReason::IncompleteRecord,
            });
            continue;
        }

        panel.eligible.insert(
            fund_id.to_string(),
            rows.into_iter().map(|(_, r)| r).collect(),
        );
    }

    // Sort the report for deterministic output.
    panel.excluded.sort_by(|a, b| a.fund_id.cmp(&b.fund_id));
    panel
}

/// Distinct period-end dates across the panel, ascending. This is the date
/// axis rolling windows slide over.
#[must_use]
pub fn distinct_periods(returns: &[MonthlyReturn]) -> Vec<NaiveDate> {
    let mut periods: Vec<NaiveDate> = returns.iter().map(|r| r.period_end).collect();
    periods.sort_unstable();
    periods.dedup();
    periods
}

/// Flags monthly returns beyond `threshold` in magnitude.
///
/// A data-quality check carried over from the reference study (±50% in a
/// single month). Flagged rows are reported and logged, never removed;
/// extreme but genuine returns still compound.
#[must_use]
pub fn flag_outliers(returns: &[MonthlyReturn], threshold: f64) -> Vec<MonthlyReturn> {
    let outliers: Vec<MonthlyReturn> = returns
        .iter()
        .filter(|r| r.return_fraction.abs() > threshold)
        .cloned()
        .collect();
    if !outliers.is_empty() {
        warn!(
            count = outliers.len(),
            threshold, "monthly returns beyond outlier threshold"
        );
    }
    outliers
}
