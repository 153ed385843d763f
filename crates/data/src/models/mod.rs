//! Data models for Reddit activity and daily prices.
//!
//! Money values use `rust_decimal::Decimal`; engagement scores are plain
//! signed integers.

pub mod event;
pub mod price;
pub mod series;

pub use event::{EventRecord, Sentiment};
pub use price::{price_column, PricePoint, PriceSeries, PriceTable, PRICE_COLUMN_SUFFIX};
pub use series::{
    DailyScorePoint, DailyScoreSeries, GradientPoint, GradientSeries, MergedPoint, MergedSeries,
};
