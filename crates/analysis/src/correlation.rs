//! Gradient correlation and lead/lag analysis.
//!
//! Pearson correlation between score and price gradients, unshifted and at
//! a lag offset in both directions. Degenerate inputs produce
//! `Coefficient::NotComputable` instead of a number so that a verdict is
//! never drawn from a fabricated zero.

use crate::classification::{LeadVerdict, PredictiveBands};
use crate::gradient::{gradient_vectors, gradients};
use crypto_pulse_data::{GradientSeries, MergedSeries};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Gradient offset used when none is configured.
pub const DEFAULT_LAG: usize = 1;

/// Why a coefficient could not be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Undefined {
    /// Fewer than two aligned pairs.
    InsufficientPairs { pairs: usize },
    /// One side is constant over the pairs.
    ZeroVariance,
    /// A value could not be represented as a finite float.
    NonFiniteInput,
}

impl fmt::Display for Undefined {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Undefined::InsufficientPairs { pairs } => {
                write!(f, "not computable: {pairs} paired point(s), need at least 2")
            }
            Undefined::ZeroVariance => f.write_str("not computable: zero variance"),
            Undefined::NonFiniteInput => f.write_str("not computable: non-finite input"),
        }
    }
}

/// A Pearson coefficient, or the reason there is none.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Coefficient {
    Computed { r: f64, pairs: usize },
    NotComputable { reason: Undefined },
}

impl Coefficient {
    #[must_use]
    pub fn value(&self) -> Option<f64> {
        match self {
            Coefficient::Computed { r, .. } => Some(*r),
            Coefficient::NotComputable { .. } => None,
        }
    }

    #[must_use]
    pub fn is_computable(&self) -> bool {
        matches!(self, Coefficient::Computed { .. })
    }

    fn undefined(reason: Undefined) -> Self {
        Coefficient::NotComputable { reason }
    }
}

impl fmt::Display for Coefficient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coefficient::Computed { r, .. } => write!(f, "{r:.2}"),
            Coefficient::NotComputable { reason } => write!(f, "{reason}"),
        }
    }
}

/// Calculates the Pearson correlation coefficient between two series.
#[must_use]
pub fn pearson_correlation(x: &[f64], y: &[f64]) -> Coefficient {
    let pairs = x.len().min(y.len());
    if x.len() != y.len() || pairs < 2 {
        return Coefficient::undefined(Undefined::InsufficientPairs { pairs });
    }

    if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
        return Coefficient::undefined(Undefined::NonFiniteInput);
    }

    if is_constant(x) || is_constant(y) {
        return Coefficient::undefined(Undefined::ZeroVariance);
    }

    let n = pairs as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;

    for (xi, yi) in x.iter().zip(y.iter()) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        covariance += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denominator = var_x.sqrt() * var_y.sqrt();
    if !denominator.is_finite() {
        return Coefficient::undefined(Undefined::NonFiniteInput);
    }
    if denominator <= 0.0 {
        return Coefficient::undefined(Undefined::ZeroVariance);
    }

    Coefficient::Computed {
        r: (covariance / denominator).clamp(-1.0, 1.0),
        pairs,
    }
}

fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}

/// Pairs `leader[i]` with `follower[i + lag]`.
///
/// An earlier leader value is matched with a later follower value, so a
/// follower that copies the leader `lag` steps later correlates at 1.0.
#[must_use]
pub fn lagged_pairs(leader: &[f64], follower: &[f64], lag: usize) -> (Vec<f64>, Vec<f64>) {
    let n = leader.len().min(follower.len());
    if lag >= n {
        return (Vec::new(), Vec::new());
    }

    (0..n - lag).map(|i| (leader[i], follower[i + lag])).unzip()
}

/// Correlation of `leader` at `i` against `follower` at `i + lag`.
#[must_use]
pub fn lagged_correlation(leader: &[f64], follower: &[f64], lag: usize) -> Coefficient {
    let (x, y) = lagged_pairs(leader, follower, lag);
    pearson_correlation(&x, &y)
}

/// Gradient correlations for one selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorrelationResult {
    pub lag: usize,
    /// Same-day score gradient against price gradient.
    pub contemporaneous: Coefficient,
    /// Score gradient against the price gradient `lag` days later.
    pub score_leads_price: Coefficient,
    /// Price gradient against the score gradient `lag` days later.
    pub price_leads_score: Coefficient,
    /// Present only when both lagged coefficients were computed.
    pub verdict: Option<LeadVerdict>,
}

impl CorrelationResult {
    /// Correlates score and price gradient vectors of equal length.
    #[must_use]
    pub fn from_gradients(
        score_gradient: &[f64],
        price_gradient: &[f64],
        lag: usize,
        bands: &PredictiveBands,
    ) -> Self {
        let contemporaneous = pearson_correlation(score_gradient, price_gradient);
        let score_leads_price = lagged_correlation(score_gradient, price_gradient, lag);
        let price_leads_score = lagged_correlation(price_gradient, score_gradient, lag);

        let verdict = match (score_leads_price.value(), price_leads_score.value()) {
            (Some(score_leads), Some(price_leads)) => {
                Some(bands.classify(score_leads, price_leads))
            }
            _ => None,
        };

        Self {
            lag,
            contemporaneous,
            score_leads_price,
            price_leads_score,
            verdict,
        }
    }

    /// True when a lead/lag verdict could be drawn.
    #[must_use]
    pub fn is_conclusive(&self) -> bool {
        self.verdict.is_some()
    }
}

/// Gradients and correlations derived from one merged series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub gradients: GradientSeries,
    pub correlation: CorrelationResult,
}

/// Differences a merged series and correlates its gradients.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Analyzer {
    pub lag: usize,
    pub bands: PredictiveBands,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self {
            lag: DEFAULT_LAG,
            bands: PredictiveBands::default(),
        }
    }
}

impl Analyzer {
    #[must_use]
    pub fn new(lag: usize, bands: PredictiveBands) -> Self {
        Self { lag, bands }
    }

    #[must_use]
    pub fn analyze(&self, merged: &MergedSeries) -> Analysis {
        let gradients = gradients(merged);
        let (score, price) = gradient_vectors(&gradients);
        let correlation = CorrelationResult::from_gradients(&score, &price, self.lag, &self.bands);

        tracing::debug!(
            merged = merged.len(),
            gradients = gradients.len(),
            lag = self.lag,
            score_leads = ?correlation.score_leads_price.value(),
            price_leads = ?correlation.price_leads_score.value(),
            "analyzed gradients"
        );

        Analysis {
            gradients,
            correlation,
        }
    }
}

/// Analyzes `merged` at `lag` with the default bands.
#[must_use]
pub fn analyze(merged: &MergedSeries, lag: usize) -> Analysis {
    Analyzer::new(lag, PredictiveBands::default()).analyze(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crypto_pulse_data::MergedPoint;
    use rust_decimal::Decimal;

    const TOLERANCE: f64 = 1e-9;

    fn merged(scores: &[i64], prices: &[i64]) -> MergedSeries {
        let start = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
        MergedSeries::new(
            scores
                .iter()
                .zip(prices)
                .enumerate()
                .map(|(i, (&score, &price))| MergedPoint {
                    date: start + chrono::Days::new(i as u64),
                    score: i128::from(score),
                    price: Decimal::from(price),
                })
                .collect(),
        )
    }

    fn assert_close(coefficient: Coefficient, expected: f64) {
        let r = coefficient
            .value()
            .unwrap_or_else(|| panic!("expected a value, got {coefficient:?}"));
        assert!((r - expected).abs() < TOLERANCE, "r was {r}");
    }

    #[test]
    fn pearson_perfect_positive_and_negative() {
        let x = [1.0, 2.0, 3.0, 4.0];

        assert_close(pearson_correlation(&x, &[2.0, 4.0, 6.0, 8.0]), 1.0);
        assert_close(pearson_correlation(&x, &[8.0, 6.0, 4.0, 2.0]), -1.0);
    }

    #[test]
    fn pearson_known_value() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 1.0, 4.0, 3.0, 5.0];

        assert_close(pearson_correlation(&x, &y), 0.8);
    }

    #[test]
    fn pearson_requires_two_pairs() {
        assert_eq!(
            pearson_correlation(&[1.0], &[2.0]),
            Coefficient::NotComputable {
                reason: Undefined::InsufficientPairs { pairs: 1 }
            }
        );
        assert!(!pearson_correlation(&[], &[]).is_computable());
    }

    #[test]
    fn pearson_zero_variance_is_not_zero() {
        let result = pearson_correlation(&[1.0, 2.0, 3.0], &[5.0, 5.0, 5.0]);

        assert_eq!(
            result,
            Coefficient::NotComputable {
                reason: Undefined::ZeroVariance
            }
        );
        assert_eq!(result.value(), None);
    }

    #[test]
    fn pearson_rejects_non_finite_input() {
        let result = pearson_correlation(&[1.0, f64::NAN], &[1.0, 2.0]);

        assert_eq!(
            result,
            Coefficient::NotComputable {
                reason: Undefined::NonFiniteInput
            }
        );
    }

    #[test]
    fn lagged_pairs_match_earlier_leader_with_later_follower() {
        let (x, y) = lagged_pairs(&[1.0, 2.0, 3.0, 4.0], &[10.0, 20.0, 30.0, 40.0], 1);

        assert_eq!(x, vec![1.0, 2.0, 3.0]);
        assert_eq!(y, vec![20.0, 30.0, 40.0]);
    }

    #[test]
    fn lag_beyond_length_yields_no_pairs() {
        let (x, y) = lagged_pairs(&[1.0, 2.0], &[1.0, 2.0], 2);

        assert!(x.is_empty() && y.is_empty());
    }

    #[test]
    fn price_following_score_by_one_day_correlates_perfectly() {
        // price[i] = score[i - 1]
        let scores = [3, 7, 2, 9, 4, 12, 1, 8];
        let mut prices = vec![50];
        prices.extend_from_slice(&scores[..scores.len() - 1]);

        let analysis = analyze(&merged(&scores, &prices), 1);

        assert_close(analysis.correlation.score_leads_price, 1.0);
        assert!(
            analysis.correlation.price_leads_score.value().unwrap() < 1.0 - TOLERANCE,
            "reverse direction should not be perfect"
        );
        assert_eq!(
            analysis.correlation.verdict,
            Some(LeadVerdict::HighPredictiveChance)
        );
    }

    #[test]
    fn price_following_score_by_two_days_correlates_perfectly_at_lag_two() {
        // price[i] = score[i - 2]
        let scores = [3, 7, 2, 9, 4, 12, 1, 8, 5];
        let mut prices = vec![50, 40];
        prices.extend_from_slice(&scores[..scores.len() - 2]);

        let merged = merged(&scores, &prices);
        let at_two = analyze(&merged, 2);
        let at_one = analyze(&merged, 1);

        assert_eq!(at_two.correlation.lag, 2);
        assert_close(at_two.correlation.score_leads_price, 1.0);
        assert_eq!(
            at_two.correlation.verdict,
            Some(LeadVerdict::HighPredictiveChance)
        );
        assert!(at_one.correlation.score_leads_price.value().unwrap() < 1.0 - TOLERANCE);
    }

    #[test]
    fn lag_two_pairs_skip_two_positions() {
        let (x, y) = lagged_pairs(&[1.0, 2.0, 3.0, 4.0], &[10.0, 20.0, 30.0, 40.0], 2);

        assert_eq!(x, vec![1.0, 2.0]);
        assert_eq!(y, vec![30.0, 40.0]);
    }

    #[test]
    fn pearson_handles_large_magnitudes() {
        let x = [1e100, 2e100, 4e100];
        let y = [2e100, 4e100, 8e100];

        assert_close(pearson_correlation(&x, &y), 1.0);
    }

    #[test]
    fn score_following_price_reflects_price() {
        // score[i] = price[i - 1]
        let prices = [3, 7, 2, 9, 4, 12, 1, 8];
        let mut scores = vec![50];
        scores.extend_from_slice(&prices[..prices.len() - 1]);

        let analysis = analyze(&merged(&scores, &prices), 1);

        assert_close(analysis.correlation.price_leads_score, 1.0);
        assert_eq!(
            analysis.correlation.verdict,
            Some(LeadVerdict::ScoreReflectsPrice)
        );
    }

    #[test]
    fn contemporaneous_uses_unshifted_gradients() {
        let analysis = analyze(&merged(&[1, 3, 2, 6, 4], &[10, 30, 20, 60, 40]), 1);

        assert_close(analysis.correlation.contemporaneous, 1.0);
    }

    #[test]
    fn two_row_merge_is_not_computable() {
        let analysis = analyze(&merged(&[10, -5], &[100, 110]), 1);

        assert_eq!(analysis.gradients.len(), 1);
        assert!(!analysis.correlation.contemporaneous.is_computable());
        assert!(!analysis.correlation.score_leads_price.is_computable());
        assert!(!analysis.correlation.price_leads_score.is_computable());
        assert_eq!(analysis.correlation.verdict, None);
    }

    #[test]
    fn empty_merge_is_not_computable() {
        let analysis = analyze(&MergedSeries::default(), DEFAULT_LAG);

        assert!(analysis.gradients.is_empty());
        assert!(!analysis.correlation.is_conclusive());
    }

    #[test]
    fn constant_price_gives_no_verdict() {
        let analysis = analyze(&merged(&[1, 4, 2, 8, 5], &[100, 100, 100, 100, 100]), 1);

        assert_eq!(
            analysis.correlation.score_leads_price,
            Coefficient::NotComputable {
                reason: Undefined::ZeroVariance
            }
        );
        assert_eq!(analysis.correlation.verdict, None);
    }

    #[test]
    fn coefficient_serializes_with_status_tag() {
        let json = serde_json::to_string(&Coefficient::Computed { r: 0.5, pairs: 4 }).unwrap();
        assert_eq!(json, r#"{"status":"computed","r":0.5,"pairs":4}"#);

        let json = serde_json::to_string(&Coefficient::NotComputable {
            reason: Undefined::ZeroVariance,
        })
        .unwrap();
        assert_eq!(json, r#"{"status":"not_computable","reason":"zero_variance"}"#);
    }
}
