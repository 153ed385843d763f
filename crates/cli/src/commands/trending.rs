//! Trending CLI command.
//!
//! Ranks labels by raw popularity score over the selected window.

use anyhow::Result;
use clap::Args;
use crypto_pulse_analysis::{rank_labels, top_labels, LabelScore};
use crypto_pulse_core::AppConfig;
use serde::Serialize;

use super::common::{load_events, print_json, DataArgs, OutputFormat, WindowArgs};

/// Arguments for the trending command.
#[derive(Args, Debug, Clone)]
pub struct TrendingArgs {
    #[command(flatten)]
    pub data: DataArgs,

    #[command(flatten)]
    pub window: WindowArgs,

    /// Number of labels to show (defaults to `analysis.top_n`)
    #[arg(long)]
    pub top: Option<usize>,

    /// Show every label instead of the top N
    #[arg(long, conflicts_with = "top")]
    pub all: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct TrendingOutput<'a> {
    start: chrono::NaiveDate,
    end: chrono::NaiveDate,
    labels: &'a [LabelScore],
}

/// Runs the trending command.
///
/// # Errors
/// Returns an error if the window is invalid or the corpus cannot be loaded.
pub fn run_trending(args: TrendingArgs, config: &AppConfig) -> Result<()> {
    let window = args.window.resolve(config)?;
    let events = load_events(&args.data, config)?;

    let ranking = rank_labels(&events, &window);
    let shown = if args.all {
        &ranking[..]
    } else {
        top_labels(&ranking, args.top.unwrap_or(config.analysis.top_n))
    };

    tracing::info!(
        "Ranked {} labels for {}, showing {}",
        ranking.len(),
        window,
        shown.len()
    );

    match args.format {
        OutputFormat::Json => print_json(&TrendingOutput {
            start: window.start(),
            end: window.end(),
            labels: shown,
        })?,
        OutputFormat::Text => {
            println!("\nCryptocurrencies by Popularity Score ({window})\n");
            println!("{:>4}  {:<12} {:>12} {:>8}", "#", "Label", "Score", "Events");
            println!("{}", "─".repeat(40));
            for (rank, entry) in shown.iter().enumerate() {
                println!(
                    "{:>4}  {:<12} {:>12} {:>8}",
                    rank + 1,
                    entry.label,
                    entry.score,
                    entry.events
                );
            }
        }
    }

    Ok(())
}
