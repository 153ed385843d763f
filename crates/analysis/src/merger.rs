//! Temporal merge of daily scores with daily prices.

use chrono::NaiveDate;
use crypto_pulse_core::Dated;
use crypto_pulse_data::{DailyScoreSeries, MergedPoint, MergedSeries, PriceSeries};
use std::cmp::Ordering;

/// Inner join of two date-sorted slices on their date key.
///
/// Both inputs must be ascending with unique dates. Only dates present on
/// both sides are returned, in ascending order.
pub fn join_on_date<'a, L: Dated, R: Dated>(
    left: &'a [L],
    right: &'a [R],
) -> Vec<(NaiveDate, &'a L, &'a R)> {
    let mut joined = Vec::with_capacity(left.len().min(right.len()));
    let (mut i, mut j) = (0, 0);

    while i < left.len() && j < right.len() {
        let (l, r) = (&left[i], &right[j]);
        match l.date().cmp(&r.date()) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                joined.push((l.date(), l, r));
                i += 1;
                j += 1;
            }
        }
    }

    joined
}

/// Aligns a score series with a price series, keeping only shared dates.
///
/// Fewer than two rows means gradients and correlations are not computable;
/// the analyzer reports that rather than this function.
#[must_use]
pub fn merge(scores: &DailyScoreSeries, prices: &PriceSeries) -> MergedSeries {
    let points: Vec<MergedPoint> = join_on_date(scores.points(), prices.points())
        .into_iter()
        .map(|(date, score, price)| MergedPoint {
            date,
            score: score.score,
            price: price.price,
        })
        .collect();

    tracing::debug!(
        scores = scores.len(),
        prices = prices.len(),
        merged = points.len(),
        "merged scores with prices"
    );

    MergedSeries::new(points)
}
