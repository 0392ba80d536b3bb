//! Domain types for the fund performance analysis engine.
//!
//! A panel consists of a fund attribute table ([`Fund`]) and a monthly
//! return table ([`MonthlyReturn`]), keyed by `fund_id`. Both are immutable
//! for the duration of an analysis run.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// Management style of a fund. Closed set: any other tag in input data is a
/// data-integrity fault and fails deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FundType {
    /// Actively managed fund.
    Active,
    /// Passive index-tracking fund (the benchmark cohort).
    Passive,
}

impl std::fmt::Display for FundType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Passive => write!(f, "passive"),
        }
    }
}

/// Currency hedge classification of a fund. Closed set, same rejection
/// policy as [`FundType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HedgeStatus {
    /// Currency-hedged share class.
    Hedged,
    /// Unhedged share class.
    Unhedged,
}

impl HedgeStatus {
    /// Both hedge statuses, in the order analyses iterate them.
    pub const ALL: [HedgeStatus; 2] = [HedgeStatus::Unhedged, HedgeStatus::Hedged];
}

impl std::fmt::Display for HedgeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hedged => write!(f, "hedged"),
            Self::Unhedged => write!(f, "unhedged"),
        }
    }
}

/// One row of the fund attribute table.
///
/// `aum` is the capital-weighting basis at the latest reference date.
/// `None` means the value is absent from the source data: the fund is then
/// excluded from capital-weighted means entirely. `Some(0.0)` is a present
/// zero weight and participates in the weighted denominator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fund {
    /// Unique fund identifier; the join key for the return panel.
    pub fund_id: String,
    /// Descriptive name, carried through unmodified.
    pub fund_name: String,
    /// Active or passive.
    pub fund_type: FundType,
    /// Hedged or unhedged.
    pub currency_hedge: HedgeStatus,
    /// Annual expense ratio as a fraction, carried through unmodified.
    pub expense_ratio: f64,
    /// Assets under management; `None` when absent from the source data.
    pub aum: Option<f64>,
}

/// One fund-month observation of the return panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyReturn {
    /// References [`Fund::fund_id`].
    pub fund_id: String,
    /// Month-end date of the observation.
    pub period_end: NaiveDate,
    /// Simple return over the month as a fraction (0.01 = +1%).
    pub return_fraction: f64,
}

/// A contiguous span of month-end periods taken from the panel's date axis.
///
/// The period set is carried explicitly: a fund is window-eligible iff its
/// filtered records match these periods exactly (no gaps, no duplicates,
/// no extras).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisWindow {
    /// First period-end in the window.
    pub start_date: NaiveDate,
    /// Last period-end in the window.
    pub end_date: NaiveDate,
    /// All period-ends in the window, ascending.
    pub periods: Vec<NaiveDate>,
}

impl AnalysisWindow {
    /// Builds a window from an ascending, non-empty period list.
    ///
    /// # Errors
    /// Returns [`AnalysisError::InsufficientHistory`] for an empty list.
    pub fn from_periods(periods: Vec<NaiveDate>) -> Result<Self, AnalysisError> {
        let (Some(&start_date), Some(&end_date)) = (periods.first(), periods.last()) else {
            return Err(AnalysisError::InsufficientHistory {
                required: 1,
                available: 0,
            });
        };
        debug_assert!(periods.windows(2).all(|w| w[0] < w[1]));
        Ok(Self {
            start_date,
            end_date,
            periods,
        })
    }

    /// Number of periods in the window.
    #[must_use]
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    /// True when the window holds no periods (never for constructed windows).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// True when `date` falls inside `[start_date, end_date]`.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}
