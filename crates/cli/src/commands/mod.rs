mod analyze;
mod rolling;

pub use analyze::{run_analyze, AnalyzeArgs};
pub use rolling::{run_rolling, RollingArgs};

use anyhow::Result;
use clap::Args;
use fund_bench_core::{AnalysisConfig, ConfigLoader};

/// Monthly return magnitude beyond which a row is flagged as a data-quality
/// outlier (±50%). Flagged rows still participate in the analysis.
pub const OUTLIER_THRESHOLD: f64 = 0.5;

/// Input and configuration options shared by both commands.
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Fund attribute CSV file
    #[arg(long)]
    pub attributes: String,

    /// Monthly return panel CSV file
    #[arg(long)]
    pub returns: String,

    /// Output directory for CSV reports
    #[arg(short, long, default_value = "output")]
    pub output_dir: String,

    /// Config file path
    #[arg(short, long, default_value = "config/FundBench.toml")]
    pub config: String,

    /// Window length in months (overrides config)
    #[arg(long)]
    pub window_months: Option<usize>,

    /// Significance level for the t-test flag (overrides config)
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Disable significance testing
    #[arg(long)]
    pub no_tests: bool,
}

impl CommonArgs {
    /// Loads the config file and applies command-line overrides on top.
    ///
    /// # Errors
    /// Returns an error if the config file cannot be read or parsed.
    pub fn load_config(&self) -> Result<AnalysisConfig> {
        let mut config = ConfigLoader::load_from(&self.config)?;
        if let Some(window_months) = self.window_months {
            config = config.with_window_months(window_months);
        }
        if let Some(alpha) = self.alpha {
            config = config.with_alpha(alpha);
        }
        if self.no_tests {
            config = config.with_tests(false);
        }
        Ok(config)
    }
}
