pub mod config;
pub mod error;
pub mod stats;
pub mod types;

pub use config::{AnalysisConfig, ConfigLoader};
pub use error::AnalysisError;
pub use stats::{
    mann_whitney_u, mean, pooled_std, sample_std_dev, sample_variance, two_sample_t,
    weighted_mean, MannWhitney, TwoSampleT,
};
pub use types::{AnalysisWindow, Fund, FundType, HedgeStatus, MonthlyReturn};
