//! Reddit score / price correlation analysis.
//!
//! The pipeline runs in three stages, each producing a new owned series:
//! - [`aggregator`]: raw events to one score per calendar day
//! - [`merger`]: inner join of daily scores with daily prices
//! - [`correlation`]: gradients plus zero-lag and lagged Pearson correlation,
//!   classified by [`classification`]
//!
//! [`report`] wires the stages together for one selection and [`ranking`]
//! orders labels by popularity.

pub mod aggregator;
pub mod classification;
pub mod correlation;
pub mod gradient;
pub mod merger;
pub mod ranking;
pub mod report;

pub use aggregator::{aggregate, matching_events, ScoreMode, UnknownScoreMode};
pub use classification::{classify, LeadVerdict, PredictiveBands};
pub use correlation::{
    analyze, lagged_correlation, lagged_pairs, pearson_correlation, Analysis, Analyzer,
    Coefficient, CorrelationResult, Undefined, DEFAULT_LAG,
};
pub use gradient::{gradient_vectors, gradients};
pub use merger::{join_on_date, merge};
pub use ranking::{distinct_labels, rank_labels, top_labels, LabelScore};
pub use report::{Notice, PriceOverlay, Selection, SelectionReport};
