//! Analyze CLI command.
//!
//! Runs the full pipeline for one selection: daily scores, merge with the
//! label's daily prices, gradients, and lead/lag correlation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use crypto_pulse_analysis::{
    LeadVerdict, PredictiveBands, ScoreMode, Selection, SelectionReport,
};
use crypto_pulse_core::AppConfig;
use crypto_pulse_data::CsvStorage;
use std::path::{Path, PathBuf};

use super::common::{
    check_label, load_events, load_prices, print_json, DataArgs, OutputFormat, WindowArgs,
};

/// Arguments for the analyze command.
#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Cryptocurrency label, e.g. BTC
    #[arg(long)]
    pub label: String,

    /// Score type: popularity or sentiment
    #[arg(long, default_value = "popularity")]
    pub mode: ScoreMode,

    /// Lag in days for the lead/lag correlations (defaults to `analysis.lag`)
    #[arg(long)]
    pub lag: Option<usize>,

    #[command(flatten)]
    pub data: DataArgs,

    #[command(flatten)]
    pub window: WindowArgs,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Write scores.csv, merged.csv and gradients.csv into this directory
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
}

/// Runs the analyze command.
///
/// # Errors
/// Returns an error if inputs cannot be loaded or exports cannot be written.
pub fn run_analyze(args: AnalyzeArgs, config: &AppConfig) -> Result<()> {
    let window = args.window.resolve(config)?;
    let lag = args.lag.unwrap_or(config.analysis.lag);
    let events = load_events(&args.data, config)?;
    let prices = load_prices(&args.data, config)?;
    check_label(&events, &args.label);

    tracing::info!(
        "Analyzing {} ({}) for {} with lag {}",
        args.label,
        args.mode,
        window,
        lag
    );

    let selection = Selection::new(args.label, window, args.mode).with_lag(lag);
    let report = SelectionReport::build(
        &events,
        Some(&prices),
        selection,
        PredictiveBands::from(&config.analysis),
    );

    if let Some(dir) = &args.output_dir {
        export(dir, &report)?;
    }

    match args.format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Text => {
            print!("{}", report.to_text());
            if let Some(verdict) = report.correlation().and_then(|c| c.verdict) {
                println!("\nVerdict: {}", colored_verdict(verdict));
            }
        }
    }

    Ok(())
}

fn colored_verdict(verdict: LeadVerdict) -> colored::ColoredString {
    match verdict {
        v if v.score_leads() => v.label().green().bold(),
        LeadVerdict::ScoreReflectsPrice => verdict.label().red().bold(),
        _ => verdict.label().bold(),
    }
}

fn export(dir: &Path, report: &SelectionReport) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    CsvStorage::write_scores(dir.join("scores.csv"), &report.scores)?;
    if let Some(overlay) = &report.overlay {
        CsvStorage::write_merged(dir.join("merged.csv"), &overlay.merged)?;
        CsvStorage::write_gradients(dir.join("gradients.csv"), &overlay.gradients)?;
    }

    tracing::info!("Exported series to {}", dir.display());
    Ok(())
}
