//! Data loading and models for Reddit activity and daily prices.
//!
//! This crate provides:
//! - Models for classified submissions, daily prices, and derived daily series
//! - Lenient timestamp parsing that drops unparseable values
//! - CSV readers for the event and price corpora, and CSV export of series

pub mod csv_storage;
pub mod error;
pub mod models;
pub mod timestamp;

pub use csv_storage::{CsvStorage, DroppedRows, EventCorpus, PriceCorpus};
pub use error::{DataError, MissingPriceColumn};

pub use models::{
    price_column, DailyScorePoint, DailyScoreSeries, EventRecord, GradientPoint, GradientSeries,
    MergedPoint, MergedSeries, PricePoint, PriceSeries, PriceTable, Sentiment,
};
