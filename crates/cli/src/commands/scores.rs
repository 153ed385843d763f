//! Scores CLI command.
//!
//! Prints the daily score series for one label without touching prices.

use anyhow::{Context, Result};
use clap::Args;
use crypto_pulse_analysis::{PredictiveBands, ScoreMode, Selection, SelectionReport};
use crypto_pulse_core::AppConfig;
use crypto_pulse_data::CsvStorage;
use std::path::PathBuf;

use super::common::{check_label, load_events, print_json, DataArgs, OutputFormat, WindowArgs};

/// Arguments for the scores command.
#[derive(Args, Debug, Clone)]
pub struct ScoresArgs {
    /// Cryptocurrency label, e.g. BTC
    #[arg(long)]
    pub label: String,

    /// Score type: popularity or sentiment
    #[arg(long, default_value = "popularity")]
    pub mode: ScoreMode,

    #[command(flatten)]
    pub data: DataArgs,

    #[command(flatten)]
    pub window: WindowArgs,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Also write the series to this CSV file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Runs the scores command.
///
/// # Errors
/// Returns an error if inputs cannot be loaded or the CSV cannot be written.
pub fn run_scores(args: ScoresArgs, config: &AppConfig) -> Result<()> {
    let window = args.window.resolve(config)?;
    let events = load_events(&args.data, config)?;
    check_label(&events, &args.label);

    let selection = Selection::new(args.label, window, args.mode);
    let report = SelectionReport::build(
        &events,
        None,
        selection,
        PredictiveBands::from(&config.analysis),
    );

    if let Some(path) = &args.output {
        CsvStorage::write_scores(path, &report.scores)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("Wrote {} daily scores to {}", report.scores.len(), path.display());
    }

    match args.format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Text => print!("{}", report.to_text()),
    }

    Ok(())
}
