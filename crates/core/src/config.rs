//! Analysis configuration.
//!
//! Defaults mirror the reference study: 36-month windows, a 12-window
//! minimum for robustness claims, and a 5% significance level. The loader
//! merges `config/FundBench.toml` and `FUND_BENCH_*` environment variables
//! over the defaults.

use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Tunable parameters of an analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Window length in months. Annualization assumes monthly periods
    /// (12 periods per year).
    pub window_months: usize,
    /// Minimum rolling window count before a robustness warning is logged.
    pub min_windows: usize,
    /// Significance level for the t-test flag.
    pub alpha: f64,
    /// Whether cohort significance tests run at all.
    pub run_tests: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            window_months: 36,
            min_windows: 12,
            alpha: 0.05,
            run_tests: true,
        }
    }
}

impl AnalysisConfig {
    /// Sets the window length in months.
    #[must_use]
    pub fn with_window_months(mut self, window_months: usize) -> Self {
        self.window_months = window_months;
        self
    }

    /// Sets the minimum rolling window count.
    #[must_use]
    pub fn with_min_windows(mut self, min_windows: usize) -> Self {
        self.min_windows = min_windows;
        self
    }

    /// Sets the significance level.
    #[must_use]
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Enables or disables significance testing.
    #[must_use]
    pub fn with_tests(mut self, run_tests: bool) -> Self {
        self.run_tests = run_tests;
        self
    }
}

/// Loads [`AnalysisConfig`] from files and the environment.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads configuration by merging defaults, `config/FundBench.toml`,
    /// and `FUND_BENCH_*` environment variables.
    ///
    /// # Errors
    /// Returns an error if a configuration source cannot be read or parsed.
    pub fn load() -> Result<AnalysisConfig> {
        let config: AnalysisConfig = Figment::from(Serialized::defaults(AnalysisConfig::default()))
            .merge(Toml::file("config/FundBench.toml"))
            .merge(Env::prefixed("FUND_BENCH_"))
            .extract()?;
        Ok(config)
    }

    /// Loads configuration from a specific TOML file, still honoring
    /// environment overrides.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from(path: &str) -> Result<AnalysisConfig> {
        let config: AnalysisConfig = Figment::from(Serialized::defaults(AnalysisConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("FUND_BENCH_"))
            .extract()?;
        Ok(config)
    }
}
