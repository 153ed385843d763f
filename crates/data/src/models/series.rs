//! Derived daily series produced by the analysis stages.
//!
//! Every series here is sorted ascending by date with unique dates. The
//! constructors enforce that, so a series handed between stages can be
//! walked and differenced without re-checking.

use chrono::NaiveDate;
use crypto_pulse_core::Dated;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregated score of one label on one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyScorePoint {
    pub date: NaiveDate,
    /// Sum of `i64` engagement scores; `i128` holds any day's total exactly
    pub score: i128,
}

impl Dated for DailyScorePoint {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

/// Sparse daily scores: days without events are absent, not zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DailyScoreSeries {
    points: Vec<DailyScorePoint>,
}

impl DailyScoreSeries {
    /// Builds a series from per-date totals. The map's ordering gives the
    /// ascending, unique date invariant.
    #[must_use]
    pub fn from_totals(totals: BTreeMap<NaiveDate, i128>) -> Self {
        Self {
            points: totals
                .into_iter()
                .map(|(date, score)| DailyScorePoint { date, score })
                .collect(),
        }
    }

    #[must_use]
    pub fn points(&self) -> &[DailyScorePoint] {
        &self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Sum of all daily scores.
    #[must_use]
    pub fn total(&self) -> i128 {
        self.points.iter().map(|p| p.score).sum()
    }

    #[must_use]
    pub fn score_on(&self, date: NaiveDate) -> Option<i128> {
        self.points
            .binary_search_by_key(&date, |p| p.date)
            .ok()
            .map(|idx| self.points[idx].score)
    }
}

/// A date present in both the score series and the price series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedPoint {
    pub date: NaiveDate,
    pub score: i128,
    pub price: Decimal,
}

impl Dated for MergedPoint {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MergedSeries {
    points: Vec<MergedPoint>,
}

impl MergedSeries {
    /// Wraps joined rows, sorting them by date and keeping the first row
    /// for any repeated date.
    #[must_use]
    pub fn new(mut points: Vec<MergedPoint>) -> Self {
        points.sort_by_key(|p| p.date);
        points.dedup_by_key(|p| p.date);
        Self { points }
    }

    #[must_use]
    pub fn points(&self) -> &[MergedPoint] {
        &self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }
}

/// Day-over-day change between consecutive merged rows, stamped with the
/// later row's date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradientPoint {
    pub date: NaiveDate,
    pub score_gradient: i128,
    pub price_gradient: Decimal,
}

impl Dated for GradientPoint {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

/// Gradients for merged rows `1..n`; the first merged row has none.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct GradientSeries {
    points: Vec<GradientPoint>,
}

impl GradientSeries {
    #[must_use]
    pub fn new(points: Vec<GradientPoint>) -> Self {
        Self { points }
    }

    #[must_use]
    pub fn points(&self) -> &[GradientPoint] {
        &self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
