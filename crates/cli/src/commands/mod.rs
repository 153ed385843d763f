//! CLI commands for Reddit/price correlation analysis.

pub mod analyze;
pub mod common;
pub mod labels;
pub mod scores;
pub mod trending;

pub use analyze::{run_analyze, AnalyzeArgs};
pub use labels::{run_labels, LabelsArgs};
pub use scores::{run_scores, ScoresArgs};
pub use trending::{run_trending, TrendingArgs};
