use clap::{Parser, Subcommand};
use crypto_pulse_core::{ConfigLoader, DEFAULT_CONFIG_PATH};

mod commands;

use commands::{AnalyzeArgs, LabelsArgs, ScoresArgs, TrendingArgs};

#[derive(Parser)]
#[command(name = "crypto-pulse")]
#[command(
    about = "Correlate Reddit cryptocurrency discussion with daily prices",
    long_about = None
)]
struct Cli {
    /// Config file path
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List selectable labels and whether prices exist for them
    Labels(LabelsArgs),
    /// Rank labels by popularity score over a date range
    Trending(TrendingArgs),
    /// Show the daily score series for one label
    Scores(ScoresArgs),
    /// Merge scores with prices and report lead/lag correlation
    Analyze(AnalyzeArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ConfigLoader::load_from(&cli.config)?;

    match cli.command {
        Commands::Labels(args) => commands::run_labels(args, &config)?,
        Commands::Trending(args) => commands::run_trending(args, &config)?,
        Commands::Scores(args) => commands::run_scores(args, &config)?,
        Commands::Analyze(args) => commands::run_analyze(args, &config)?,
    }

    Ok(())
}
