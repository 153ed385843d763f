//! Classified Reddit submission model.
//!
//! Each record is one submission already labeled with the cryptocurrency it
//! discusses and tagged with a sentiment by the upstream classifier.

use chrono::{NaiveDate, NaiveDateTime};
use crypto_pulse_core::Dated;
use serde::{Deserialize, Serialize};

/// A single scored and labeled submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Cryptocurrency symbol the submission is classified under (e.g. "BTC")
    pub label: String,
    /// Creation time as recorded in the dataset, without zone conversion
    pub timestamp: NaiveDateTime,
    /// Net engagement score; may be negative
    pub engagement_score: i64,
    pub sentiment: Sentiment,
}

impl EventRecord {
    pub fn new(
        label: impl Into<String>,
        timestamp: NaiveDateTime,
        engagement_score: i64,
        sentiment: Sentiment,
    ) -> Self {
        Self {
            label: label.into(),
            timestamp,
            engagement_score,
            sentiment,
        }
    }

    /// Score contribution under sentiment weighting: positive keeps the
    /// score, negative flips it, anything else contributes nothing.
    ///
    /// Widened to `i128` so negating `i64::MIN` stays exact.
    #[must_use]
    pub fn signed_score(&self) -> i128 {
        i128::from(self.sentiment.sign()) * i128::from(self.engagement_score)
    }
}

impl Dated for EventRecord {
    fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

/// Sentiment tag attached by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Negative,
    /// Neutral, unknown, or missing tags
    Neutral,
}

impl Sentiment {
    /// Parses a raw tag. Only the exact tags `Positive` and `Negative` carry
    /// a direction; everything else is neutral.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim() {
            "Positive" => Sentiment::Positive,
            "Negative" => Sentiment::Negative,
            _ => Sentiment::Neutral,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
        }
    }

    #[must_use]
    pub const fn sign(&self) -> i64 {
        match self {
            Sentiment::Positive => 1,
            Sentiment::Negative => -1,
            Sentiment::Neutral => 0,
        }
    }
}
