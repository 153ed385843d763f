//! Popularity ranking across labels for a date window.

use crypto_pulse_core::DateWindow;
use crypto_pulse_data::EventRecord;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Total raw popularity of one label inside a window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: i128,
    /// Number of in-window events behind the score
    pub events: usize,
}

/// Sorted unique labels present in the corpus.
#[must_use]
pub fn distinct_labels(events: &[EventRecord]) -> Vec<String> {
    events
        .iter()
        .map(|e| e.label.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Ranks every label in the corpus by popularity inside `window`.
///
/// Labels without in-window events are kept with a score of zero. Ties are
/// broken alphabetically so the order is stable.
#[must_use]
pub fn rank_labels(events: &[EventRecord], window: &DateWindow) -> Vec<LabelScore> {
    let mut totals: BTreeMap<&str, (i128, usize)> = BTreeMap::new();

    for event in events {
        let entry = totals.entry(event.label.as_str()).or_insert((0, 0));
        if window.contains(event.timestamp) {
            entry.0 += i128::from(event.engagement_score);
            entry.1 += 1;
        }
    }

    let mut ranking: Vec<LabelScore> = totals
        .into_iter()
        .map(|(label, (score, events))| LabelScore {
            label: label.to_string(),
            score,
            events,
        })
        .collect();

    ranking.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.label.cmp(&b.label)));
    ranking
}

/// The first `n` entries of a ranking.
#[must_use]
pub fn top_labels(ranking: &[LabelScore], n: usize) -> &[LabelScore] {
    &ranking[..n.min(ranking.len())]
}
