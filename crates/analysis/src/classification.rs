//! Lead/lag interpretation of the two lagged correlations.
//!
//! The bands are fixed heuristic cut-offs, not a statistical test. The
//! verdict describes correlation strength only.

use crypto_pulse_core::AnalysisConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Descriptive outcome of comparing score-leads and price-leads correlations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadVerdict {
    /// Score leads, but moves against price.
    InverseRelationship,
    SmallPredictiveChance,
    SignificantPredictiveChance,
    HighPredictiveChance,
    /// Price leads: the score follows price moves.
    ScoreReflectsPrice,
    /// Neither direction is stronger.
    Balanced,
}

impl LeadVerdict {
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::InverseRelationship => {
                "There is an inverse relationship: Reddit score changes tend to move opposite to price changes."
            }
            Self::SmallPredictiveChance => {
                "There is a small chance to predict the price by Reddit score."
            }
            Self::SignificantPredictiveChance => {
                "There is a significant chance to predict the price by Reddit score."
            }
            Self::HighPredictiveChance => {
                "There is a high chance to predict the price by Reddit score."
            }
            Self::ScoreReflectsPrice => {
                "No price prediction possible. Reddit score reflects price changes."
            }
            Self::Balanced => {
                "The correlation is balanced, showing no clear lead between Reddit score and price changes."
            }
        }
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::InverseRelationship => "inverse relationship",
            Self::SmallPredictiveChance => "small predictive chance",
            Self::SignificantPredictiveChance => "significant predictive chance",
            Self::HighPredictiveChance => "high predictive chance",
            Self::ScoreReflectsPrice => "no predictive value; score reflects price",
            Self::Balanced => "balanced, no leading relationship",
        }
    }

    /// True for the four outcomes where the score correlation leads.
    #[must_use]
    pub const fn score_leads(&self) -> bool {
        matches!(
            self,
            Self::InverseRelationship
                | Self::SmallPredictiveChance
                | Self::SignificantPredictiveChance
                | Self::HighPredictiveChance
        )
    }
}

impl fmt::Display for LeadVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lower bounds of the predictive bands. The inverse band is everything
/// below zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictiveBands {
    pub significant: f64,
    pub high: f64,
}

impl Default for PredictiveBands {
    fn default() -> Self {
        Self {
            significant: 0.25,
            high: 0.75,
        }
    }
}

impl From<&AnalysisConfig> for PredictiveBands {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            significant: config.significant_threshold,
            high: config.high_threshold,
        }
    }
}

impl PredictiveBands {
    /// Classifies a pair of lagged correlations.
    #[must_use]
    pub fn classify(&self, score_leads: f64, price_leads: f64) -> LeadVerdict {
        if score_leads > price_leads {
            self.band(score_leads)
        } else if score_leads < price_leads {
            LeadVerdict::ScoreReflectsPrice
        } else {
            LeadVerdict::Balanced
        }
    }

    fn band(&self, r: f64) -> LeadVerdict {
        if r < 0.0 {
            LeadVerdict::InverseRelationship
        } else if r < self.significant {
            LeadVerdict::SmallPredictiveChance
        } else if r < self.high {
            LeadVerdict::SignificantPredictiveChance
        } else {
            LeadVerdict::HighPredictiveChance
        }
    }
}

/// Classifies with the default 0 / 0.25 / 0.75 bands.
#[must_use]
pub fn classify(score_leads: f64, price_leads: f64) -> LeadVerdict {
    PredictiveBands::default().classify(score_leads, price_leads)
}
