//! Error taxonomy for the analysis engine.
//!
//! Two fatal classes abort a run: a data-integrity fault at the attribute
//! join and insufficient total history. Everything else is a domain error
//! local to one fund or one cohort/window pair; callers exclude the fund or
//! skip the pair and continue.

use thiserror::Error;

/// Errors produced by the analysis engine.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A fund_id in the return panel has no matching attribute row. The
    /// input is internally inconsistent; fatal.
    #[error("fund {fund_id} has return records but no attribute row")]
    DataIntegrity {
        /// The orphaned fund identifier.
        fund_id: String,
    },

    /// Fewer distinct periods exist than the analysis needs. Fatal.
    #[error("insufficient history: need {required} distinct periods, found {available}")]
    InsufficientHistory {
        /// Periods required.
        required: usize,
        /// Periods available in the panel.
        available: usize,
    },

    /// A growth factor `1 + r` was non-positive during compounding.
    /// Geometric compounding is undefined past a -100% period.
    #[error("non-positive growth factor 1 + {return_fraction} at period index {period_index}")]
    NonPositiveGrowth {
        /// Zero-based index of the offending return within the window.
        period_index: usize,
        /// The offending return fraction.
        return_fraction: f64,
    },

    /// Annualization was asked for an empty return series.
    #[error("cannot annualize an empty return series")]
    EmptyReturnSeries,

    /// An aggregate was asked for an empty cohort.
    #[error("cohort is empty; mean is undefined")]
    EmptyCohort,

    /// A capital-weighted mean had no present weights, or all present
    /// weights were zero.
    #[error("no usable weights for capital-weighted mean")]
    NoUsableWeights,

    /// A two-sample test needs at least 2 observations per sample.
    #[error("sample has {n} observations, need at least 2")]
    SampleTooSmall {
        /// Observed sample size.
        n: usize,
    },

    /// Pooled standard deviation is zero; t statistic and effect size are
    /// undefined.
    #[error("pooled standard deviation is zero; samples have no variance")]
    ZeroPooledVariance,

    /// Every observation across both samples is tied; the rank test's
    /// normal approximation is undefined.
    #[error("rank variance is zero; all observations are tied")]
    ZeroRankVariance,

    /// A statistical distribution could not be constructed.
    #[error("distribution error: {0}")]
    Distribution(String),
}

impl AnalysisError {
    /// True for errors local to one fund or one cohort/window pair.
    /// Domain errors exclude the fund or skip the pair; they never abort
    /// the run.
    #[must_use]
    pub fn is_domain(&self) -> bool {
        !matches!(
            self,
            Self::DataIntegrity { .. } | Self::InsufficientHistory { .. }
        )
    }
}
