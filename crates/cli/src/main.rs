use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{AnalyzeArgs, RollingArgs};

#[derive(Parser)]
#[command(name = "fund-bench")]
#[command(about = "Active vs passive fund performance analysis", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a single window ending at a base date
    Analyze(AnalyzeArgs),
    /// Roll the window across the full panel and summarize
    Rolling(RollingArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze(args) => commands::run_analyze(args),
        Commands::Rolling(args) => commands::run_rolling(args),
    }
}
