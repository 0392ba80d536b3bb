//! Performance analysis engine for active vs passive fund comparison.
//!
//! Pipeline, leaf first: window validation ([`window`]), geometric
//! annualization ([`annualize`]), cohort segmentation ([`cohort`]),
//! weighted aggregation ([`aggregate`]), significance testing
//! ([`testing`]), a single-window driver ([`engine`]), and the rolling
//! orchestrator with its summary reduction ([`rolling`]).
//!
//! Every stage is a pure function of its inputs; the orchestrator assembles
//! stage outputs without shared mutable state, so independent windows could
//! be fanned out across threads without locking.

pub mod aggregate;
pub mod annualize;
pub mod cohort;
pub mod engine;
pub mod rolling;
pub mod testing;
pub mod window;

pub use aggregate::WindowAggregates;
pub use annualize::{annualize, compound};
pub use cohort::{segment, FundWindowResult, HedgeCohorts};
pub use engine::{compute_single_window, window_ending_at, HedgeReport, RankedFund, WindowAnalysis};
pub use rolling::{
    run_rolling, summarize, CoverageGap, ExcessStats, RollingAnalysis, RollingResult,
    RollingSummary,
};
pub use testing::{compare, CohortTests, TestResult};
pub use window::{
    distinct_periods, flag_outliers, validate_window, ExcludedFund, ExclusionReason, WindowPanel,
};
