//! Day-over-day differencing of a merged series.

use crypto_pulse_data::{GradientPoint, GradientSeries, MergedSeries};
use rust_decimal::prelude::ToPrimitive;

/// First differences of score and price between consecutive merged rows.
///
/// The first row has no predecessor and produces no point, so the result
/// has `merged.len() - 1` points (or none). Differencing is positional: a
/// gap of several days between rows is treated like a single step. Score
/// differences are taken in `i128`, so they are exact for any pair of
/// daily totals.
#[must_use]
pub fn gradients(merged: &MergedSeries) -> GradientSeries {
    let points = merged
        .points()
        .windows(2)
        .map(|pair| GradientPoint {
            date: pair[1].date,
            score_gradient: pair[1].score - pair[0].score,
            price_gradient: pair[1].price - pair[0].price,
        })
        .collect();

    GradientSeries::new(points)
}

/// Splits gradients into parallel `f64` vectors for correlation.
#[must_use]
pub fn gradient_vectors(gradients: &GradientSeries) -> (Vec<f64>, Vec<f64>) {
    gradients
        .points()
        .iter()
        .map(|p| {
            (
                p.score_gradient as f64,
                p.price_gradient.to_f64().unwrap_or(f64::NAN),
            )
        })
        .unzip()
}
