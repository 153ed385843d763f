//! Per-selection pipeline and report.
//!
//! Runs aggregate → merge → analyze for one selection. Each stage's output
//! is an owned value handed to the next, so concurrent selections never
//! share intermediate series. Missing or insufficient data becomes a
//! `Notice` on the report instead of an error.

use crate::aggregator::{aggregate, ScoreMode};
use crate::classification::PredictiveBands;
use crate::correlation::{Analyzer, Coefficient, CorrelationResult, Undefined, DEFAULT_LAG};
use crate::merger::merge;
use crypto_pulse_core::DateWindow;
use crypto_pulse_data::{
    DailyScoreSeries, EventRecord, GradientSeries, MergedSeries, MissingPriceColumn, PriceTable,
};
use serde::Serialize;
use thiserror::Error;

/// What the user picked: a label, a window, a scoring mode, and a lag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub label: String,
    pub window: DateWindow,
    pub mode: ScoreMode,
    pub lag: usize,
}

impl Selection {
    pub fn new(label: impl Into<String>, window: DateWindow, mode: ScoreMode) -> Self {
        Self {
            label: label.into(),
            window,
            mode,
            lag: DEFAULT_LAG,
        }
    }

    #[must_use]
    pub fn with_lag(mut self, lag: usize) -> Self {
        self.lag = lag;
        self
    }
}

/// A user-visible reason some output is unavailable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    #[error("No {label} submissions in {window}.")]
    EmptySeries { label: String, window: DateWindow },

    #[error("Price data for {label} is not available in the daily prices dataset (no '{column}' column).")]
    MissingColumn { label: String, column: String },

    #[error("Lead/lag correlation for {label} is {reason} ({merged_rows} overlapping day(s)).")]
    InsufficientDataForCorrelation {
        label: String,
        merged_rows: usize,
        reason: Undefined,
    },
}

/// Score/price alignment and the analysis derived from it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceOverlay {
    pub merged: MergedSeries,
    pub gradients: GradientSeries,
    pub correlation: CorrelationResult,
}

/// Everything computed for one selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionReport {
    pub selection: Selection,
    pub scores: DailyScoreSeries,
    /// `None` when no price table was supplied or the label has no price column
    pub overlay: Option<PriceOverlay>,
    pub notices: Vec<Notice>,
}

impl SelectionReport {
    /// Runs the full pipeline for `selection`.
    ///
    /// Passing `None` for `prices` produces a score-only report.
    #[must_use]
    pub fn build(
        events: &[EventRecord],
        prices: Option<&PriceTable>,
        selection: Selection,
        bands: PredictiveBands,
    ) -> Self {
        let mut notices = Vec::new();

        let scores = aggregate(
            events,
            &selection.label,
            &selection.window,
            selection.mode,
        );
        if scores.is_empty() {
            notices.push(Notice::EmptySeries {
                label: selection.label.clone(),
                window: selection.window,
            });
        }

        let overlay = match prices.map(|table| table.series_for(&selection.label)) {
            None => None,
            Some(Err(MissingPriceColumn { label, column })) => {
                notices.push(Notice::MissingColumn { label, column });
                None
            }
            Some(Ok(price_series)) => {
                let merged = merge(&scores, &price_series);
                let analysis = Analyzer::new(selection.lag, bands).analyze(&merged);

                if let Some(reason) = first_undefined(&analysis.correlation) {
                    notices.push(Notice::InsufficientDataForCorrelation {
                        label: selection.label.clone(),
                        merged_rows: merged.len(),
                        reason,
                    });
                }

                Some(PriceOverlay {
                    merged,
                    gradients: analysis.gradients,
                    correlation: analysis.correlation,
                })
            }
        };

        for notice in &notices {
            tracing::info!(label = %selection.label, "{notice}");
        }

        Self {
            selection,
            scores,
            overlay,
            notices,
        }
    }

    #[must_use]
    pub fn correlation(&self) -> Option<&CorrelationResult> {
        self.overlay.as_ref().map(|o| &o.correlation)
    }

    /// Converts the report to a human-readable text format.
    #[must_use]
    #[allow(clippy::format_push_string)]
    pub fn to_text(&self) -> String {
        let selection = &self.selection;
        let mut output = String::new();

        output.push_str(&format!(
            "=== Reddit Activity Report: {} ({}) ===\n\n",
            selection.label,
            selection.mode.title()
        ));
        output.push_str(&format!("Period: {}\n", selection.window));
        output.push_str(&format!(
            "Active days: {}   Total score: {}\n\n",
            self.scores.len(),
            self.scores.total()
        ));

        match &self.overlay {
            Some(overlay) if !overlay.merged.is_empty() => {
                output.push_str(&overlay_table(overlay));
            }
            _ if !self.scores.is_empty() => {
                output.push_str(&score_table(&self.scores));
            }
            _ => {}
        }

        if let Some(correlation) = self.correlation() {
            output.push_str(&format!(
                "\nLagged Correlation (lag = {} day{})\n",
                correlation.lag,
                if correlation.lag == 1 { "" } else { "s" }
            ));
            output.push_str(&format!(
                "  Same-Day-Corr.:          {}\n",
                correlation.contemporaneous
            ));
            output.push_str(&format!(
                "  Score-Leads-Price-Corr.: {}\n",
                correlation.score_leads_price
            ));
            output.push_str(&format!(
                "  Price-Leads-Score-Corr.: {}\n",
                correlation.price_leads_score
            ));

            if let Some(verdict) = correlation.verdict {
                output.push_str(&format!("\nResult: {}\n", verdict.description()));
            }
        }

        if !self.notices.is_empty() {
            output.push_str("\nNotices:\n");
            for notice in &self.notices {
                output.push_str(&format!("  - {notice}\n"));
            }
        }

        output
    }
}

fn first_undefined(correlation: &CorrelationResult) -> Option<Undefined> {
    [correlation.score_leads_price, correlation.price_leads_score]
        .into_iter()
        .find_map(|c| match c {
            Coefficient::NotComputable { reason } => Some(reason),
            Coefficient::Computed { .. } => None,
        })
}

#[allow(clippy::format_push_string)]
fn score_table(scores: &DailyScoreSeries) -> String {
    let mut output = String::new();
    output.push_str(&format!("{:<12} {:>12}\n", "Date", "Score"));
    output.push_str(&format!("{}\n", "─".repeat(25)));
    for point in scores.points() {
        output.push_str(&format!(
            "{:<12} {:>12}\n",
            point.date.to_string(),
            point.score
        ));
    }
    output
}

#[allow(clippy::format_push_string)]
fn overlay_table(overlay: &PriceOverlay) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "{:<12} {:>10} {:>14} {:>12} {:>14}\n",
        "Date", "Score", "Price", "Score Grad", "Price Grad"
    ));
    output.push_str(&format!("{}\n", "─".repeat(66)));

    let mut gradients = overlay.gradients.points().iter().peekable();
    for row in overlay.merged.points() {
        let gradient = gradients.next_if(|g| g.date == row.date);
        let (score_grad, price_grad) = match gradient {
            Some(g) => (g.score_gradient.to_string(), g.price_gradient.to_string()),
            None => ("-".to_string(), "-".to_string()),
        };
        output.push_str(&format!(
            "{:<12} {:>10} {:>14} {:>12} {:>14}\n",
            row.date.to_string(),
            row.score,
            row.price.to_string(),
            score_grad,
            price_grad
        ));
    }
    output
}
