//! Score aggregation.
//!
//! Turns the raw event corpus into one score per calendar day for a single
//! label and date window.

use chrono::NaiveDate;
use crypto_pulse_core::{DateWindow, Dated};
use crypto_pulse_data::{DailyScoreSeries, EventRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// How each event contributes to its day's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreMode {
    /// Raw engagement score.
    #[default]
    Popularity,
    /// Engagement score signed by sentiment; neutral events count zero.
    Sentiment,
}

impl ScoreMode {
    #[must_use]
    pub fn contribution(&self, event: &EventRecord) -> i128 {
        match self {
            ScoreMode::Popularity => i128::from(event.engagement_score),
            ScoreMode::Sentiment => event.signed_score(),
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ScoreMode::Popularity => "popularity",
            ScoreMode::Sentiment => "sentiment",
        }
    }

    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            ScoreMode::Popularity => "Popularity Score",
            ScoreMode::Sentiment => "Sentiment Score",
        }
    }
}

impl fmt::Display for ScoreMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown score mode '{0}', expected 'popularity' or 'sentiment'")]
pub struct UnknownScoreMode(pub String);

impl FromStr for ScoreMode {
    type Err = UnknownScoreMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "popularity" | "raw" => Ok(ScoreMode::Popularity),
            "sentiment" | "signed" => Ok(ScoreMode::Sentiment),
            _ => Err(UnknownScoreMode(s.to_string())),
        }
    }
}

/// Events for `label` whose calendar date falls inside `window`.
pub fn matching_events<'a>(
    events: &'a [EventRecord],
    label: &'a str,
    window: &'a DateWindow,
) -> impl Iterator<Item = &'a EventRecord> + 'a {
    events
        .iter()
        .filter(move |e| e.label == label && window.contains(e.timestamp))
}

/// Sums per-day contributions of the events matching `label` and `window`.
///
/// Days without a matching event are absent from the result rather than
/// zero-filled. An empty result means "no data" for the selection.
#[must_use]
pub fn aggregate(
    events: &[EventRecord],
    label: &str,
    window: &DateWindow,
    mode: ScoreMode,
) -> DailyScoreSeries {
    let mut totals: BTreeMap<NaiveDate, i128> = BTreeMap::new();
    let mut matched = 0usize;

    for event in matching_events(events, label, window) {
        *totals.entry(event.date()).or_insert(0) += mode.contribution(event);
        matched += 1;
    }

    tracing::debug!(
        label,
        %window,
        %mode,
        matched,
        days = totals.len(),
        "aggregated daily scores"
    );

    DailyScoreSeries::from_totals(totals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use crypto_pulse_core::is_strictly_ascending;
    use crypto_pulse_data::Sentiment;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, d).unwrap()
    }

    fn at(d: u32, h: u32) -> NaiveDateTime {
        date(d).and_hms_opt(h, 0, 0).unwrap()
    }

    fn event(label: &str, d: u32, h: u32, score: i64, sentiment: Sentiment) -> EventRecord {
        EventRecord::new(label, at(d, h), score, sentiment)
    }

    fn december() -> DateWindow {
        DateWindow::new(date(1), date(31)).unwrap()
    }

    fn corpus() -> Vec<EventRecord> {
        vec![
            event("BTC", 3, 9, 4, Sentiment::Neutral),
            event("BTC", 1, 10, 10, Sentiment::Positive),
            event("ETH", 1, 11, 99, Sentiment::Positive),
            event("BTC", 1, 23, 6, Sentiment::Negative),
            event("BTC", 2, 8, 5, Sentiment::Negative),
            event("BTC", 3, 12, -2, Sentiment::Positive),
        ]
    }

    #[test]
    fn popularity_sums_raw_scores_per_day() {
        let series = aggregate(&corpus(), "BTC", &december(), ScoreMode::Popularity);

        assert_eq!(series.score_on(date(1)), Some(16));
        assert_eq!(series.score_on(date(2)), Some(5));
        assert_eq!(series.score_on(date(3)), Some(2));
        assert_eq!(series.len(), 3);
    }

    #[test]
    fn sentiment_signs_scores_and_ignores_neutral() {
        let series = aggregate(&corpus(), "BTC", &december(), ScoreMode::Sentiment);

        assert_eq!(series.score_on(date(1)), Some(4));
        assert_eq!(series.score_on(date(2)), Some(-5));
        // neutral 4 contributes nothing, positive -2 stays -2
        assert_eq!(series.score_on(date(3)), Some(-2));
    }

    #[test]
    fn totals_match_raw_sums() {
        let events = corpus();
        let window = december();
        let btc: Vec<_> = matching_events(&events, "BTC", &window).collect();

        let popularity = aggregate(&events, "BTC", &window, ScoreMode::Popularity);
        let raw: i128 = btc.iter().map(|e| i128::from(e.engagement_score)).sum();
        assert_eq!(popularity.total(), raw);

        let sentiment = aggregate(&events, "BTC", &window, ScoreMode::Sentiment);
        let positive: i128 = btc
            .iter()
            .filter(|e| e.sentiment == Sentiment::Positive)
            .map(|e| i128::from(e.engagement_score))
            .sum();
        let negative: i128 = btc
            .iter()
            .filter(|e| e.sentiment == Sentiment::Negative)
            .map(|e| i128::from(e.engagement_score))
            .sum();
        assert_eq!(sentiment.total(), positive - negative);
    }

    #[test]
    fn day_total_beyond_i64_range_is_exact() {
        let events = vec![
            event("BTC", 1, 9, i64::MAX, Sentiment::Positive),
            event("BTC", 1, 10, 1, Sentiment::Positive),
            event("BTC", 2, 9, i64::MIN, Sentiment::Negative),
            event("BTC", 2, 10, i64::MIN, Sentiment::Negative),
        ];

        let popularity = aggregate(&events, "BTC", &december(), ScoreMode::Popularity);
        let sentiment = aggregate(&events, "BTC", &december(), ScoreMode::Sentiment);

        assert_eq!(popularity.score_on(date(1)), Some(i128::from(i64::MAX) + 1));
        assert_eq!(popularity.score_on(date(2)), Some(2 * i128::from(i64::MIN)));
        assert_eq!(sentiment.score_on(date(2)), Some(-2 * i128::from(i64::MIN)));
    }

    #[test]
    fn output_dates_are_strictly_ascending() {
        let series = aggregate(&corpus(), "BTC", &december(), ScoreMode::Popularity);

        assert!(is_strictly_ascending(series.points()));
    }

    #[test]
    fn window_is_inclusive_of_whole_end_day() {
        let window = DateWindow::new(date(2), date(3)).unwrap();

        let series = aggregate(&corpus(), "BTC", &window, ScoreMode::Popularity);

        assert_eq!(series.score_on(date(1)), None);
        assert_eq!(series.score_on(date(3)), Some(2));
    }

    #[test]
    fn sparse_days_are_not_zero_filled() {
        let events = vec![
            event("BTC", 1, 0, 1, Sentiment::Positive),
            event("BTC", 5, 0, 1, Sentiment::Positive),
        ];

        let series = aggregate(&events, "BTC", &december(), ScoreMode::Popularity);

        assert_eq!(series.len(), 2);
    }

    #[test]
    fn unknown_label_yields_empty_series() {
        let series = aggregate(&corpus(), "DOGE", &december(), ScoreMode::Sentiment);

        assert!(series.is_empty());
    }

    #[test]
    fn label_match_is_exact() {
        let series = aggregate(&corpus(), "btc", &december(), ScoreMode::Popularity);

        assert!(series.is_empty());
    }

    #[test]
    fn score_mode_parses_from_str() {
        assert_eq!("Popularity".parse::<ScoreMode>(), Ok(ScoreMode::Popularity));
        assert_eq!("sentiment".parse::<ScoreMode>(), Ok(ScoreMode::Sentiment));
        assert!("volume".parse::<ScoreMode>().is_err());
    }
}
