//! Labels CLI command.
//!
//! Lists the cryptocurrency labels that can be selected, and whether the
//! price file has a column for each.

use anyhow::Result;
use clap::Args;
use crypto_pulse_analysis::distinct_labels;
use crypto_pulse_core::AppConfig;
use crypto_pulse_data::price_column;
use serde::Serialize;

use super::common::{load_events, load_prices, print_json, DataArgs, OutputFormat};

/// Arguments for the labels command.
#[derive(Args, Debug, Clone)]
pub struct LabelsArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct LabelEntry {
    label: String,
    has_prices: bool,
}

/// Runs the labels command.
///
/// # Errors
/// Returns an error if the event corpus cannot be loaded.
pub fn run_labels(args: LabelsArgs, config: &AppConfig) -> Result<()> {
    let events = load_events(&args.data, config)?;

    let prices_path = args.data.prices_path(config);
    let prices = if prices_path.exists() {
        Some(load_prices(&args.data, config)?)
    } else {
        tracing::warn!("Price file {} not found", prices_path.display());
        None
    };

    let entries: Vec<LabelEntry> = distinct_labels(&events)
        .into_iter()
        .map(|label| LabelEntry {
            has_prices: prices
                .as_ref()
                .is_some_and(|table| table.has_column(&price_column(&label))),
            label,
        })
        .collect();

    match args.format {
        OutputFormat::Json => print_json(&entries)?,
        OutputFormat::Text => {
            println!("{:<12} {}", "Label", "Prices");
            println!("{}", "─".repeat(20));
            for entry in &entries {
                println!(
                    "{:<12} {}",
                    entry.label,
                    if entry.has_prices { "yes" } else { "no" }
                );
            }
            println!("\n{} label(s)", entries.len());
        }
    }

    Ok(())
}
