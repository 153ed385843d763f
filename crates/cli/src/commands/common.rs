//! Arguments and loaders shared by every command.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use crypto_pulse_core::{AppConfig, DateWindow};
use crypto_pulse_data::{CsvStorage, EventRecord, PriceTable};
use std::path::PathBuf;

/// Input file locations.
#[derive(Args, Debug, Clone, Default)]
pub struct DataArgs {
    /// Classified submissions CSV (defaults to `data.events_path` in config)
    #[arg(long, env = "PULSE_EVENTS")]
    pub events: Option<PathBuf>,

    /// Daily prices CSV (defaults to `data.prices_path` in config)
    #[arg(long, env = "PULSE_PRICES")]
    pub prices: Option<PathBuf>,

    /// Read ambiguous dates such as 01/12/2024 month-first
    #[arg(long)]
    pub month_first: bool,
}

impl DataArgs {
    pub fn day_first(&self, config: &AppConfig) -> bool {
        config.data.day_first && !self.month_first
    }

    pub fn events_path(&self, config: &AppConfig) -> PathBuf {
        self.events
            .clone()
            .unwrap_or_else(|| PathBuf::from(&config.data.events_path))
    }

    pub fn prices_path(&self, config: &AppConfig) -> PathBuf {
        self.prices
            .clone()
            .unwrap_or_else(|| PathBuf::from(&config.data.prices_path))
    }
}

/// Date range of the selection.
#[derive(Args, Debug, Clone, Default)]
pub struct WindowArgs {
    /// First day included, YYYY-MM-DD (defaults to `analysis.window_start`)
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Last day included, YYYY-MM-DD (defaults to `analysis.window_end`)
    #[arg(long)]
    pub end: Option<NaiveDate>,
}

impl WindowArgs {
    /// Resolves the window from flags, falling back to config.
    ///
    /// # Errors
    /// Returns an error if the start is after the end.
    pub fn resolve(&self, config: &AppConfig) -> Result<DateWindow> {
        let start = self.start.unwrap_or(config.analysis.window_start);
        let end = self.end.unwrap_or(config.analysis.window_end);
        DateWindow::new(start, end).context("Invalid date range")
    }
}

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Loads the event corpus named by `data` or the config.
///
/// # Errors
/// Returns an error if the file cannot be read or lacks required columns.
pub fn load_events(data: &DataArgs, config: &AppConfig) -> Result<Vec<EventRecord>> {
    let path = data.events_path(config);
    let corpus = CsvStorage::read_events(&path, data.day_first(config))
        .with_context(|| format!("Failed to load events from {}", path.display()))?;

    tracing::info!(
        "Loaded {} events from {} ({} rows dropped)",
        corpus.events.len(),
        path.display(),
        corpus.dropped.total()
    );

    Ok(corpus.events)
}

/// Loads the daily price table named by `data` or the config.
///
/// # Errors
/// Returns an error if the file cannot be read or has no `date` column.
pub fn load_prices(data: &DataArgs, config: &AppConfig) -> Result<PriceTable> {
    let path = data.prices_path(config);
    let corpus = CsvStorage::read_prices(&path, data.day_first(config))
        .with_context(|| format!("Failed to load prices from {}", path.display()))?;

    tracing::info!(
        "Loaded price columns {:?} from {}",
        corpus.table.labels(),
        path.display()
    );

    Ok(corpus.table)
}

/// Warns when a label does not occur in the corpus at all.
pub fn check_label(events: &[EventRecord], label: &str) {
    if !events.iter().any(|e| e.label == label) {
        let labels = crypto_pulse_analysis::distinct_labels(events);
        tracing::warn!(
            "Label '{}' does not occur in the event corpus. Available: {}",
            label,
            labels.join(", ")
        );
    }
}

/// Serializes `value` as pretty JSON on stdout.
///
/// # Errors
/// Returns an error if serialization fails.
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}
