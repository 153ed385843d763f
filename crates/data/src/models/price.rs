//! Daily price models.
//!
//! Prices are kept as `Decimal` so day-over-day differences are exact.

use crate::error::MissingPriceColumn;
use chrono::NaiveDate;
use crypto_pulse_core::Dated;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Suffix appended to a label to find its price column.
pub const PRICE_COLUMN_SUFFIX: &str = "_price";

/// Returns the price column name for a label, e.g. `BTC` -> `BTC_price`.
#[must_use]
pub fn price_column(label: &str) -> String {
    format!("{label}{PRICE_COLUMN_SUFFIX}")
}

/// Closing price of one label on one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: Decimal,
}

impl PricePoint {
    #[must_use]
    pub fn new(date: NaiveDate, price: Decimal) -> Self {
        Self { date, price }
    }
}

impl Dated for PricePoint {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

/// Daily prices for a single label, ascending with one value per date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Builds a series from points in any order.
    ///
    /// When a date repeats, the later point wins.
    pub fn from_points(points: impl IntoIterator<Item = PricePoint>) -> Self {
        let mut by_date: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();

        for point in points {
            if let Some(previous) = by_date.insert(point.date, point.price) {
                tracing::warn!(
                    date = %point.date,
                    %previous,
                    replacement = %point.price,
                    "duplicate price date, keeping the later value"
                );
            }
        }

        Self {
            points: by_date
                .into_iter()
                .map(|(date, price)| PricePoint { date, price })
                .collect(),
        }
    }

    #[must_use]
    pub fn points(&self) -> &[PricePoint] {
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
    pub fn price_on(&self, date: NaiveDate) -> Option<Decimal> {
        self.points
            .binary_search_by_key(&date, |p| p.date)
            .ok()
            .map(|idx| self.points[idx].price)
    }
}

/// The wide daily price file: one `date` plus one price column per label.
#[derive(Debug, Clone, Default)]
pub struct PriceTable {
    columns: BTreeMap<String, Vec<PricePoint>>,
}

impl PriceTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a column even if it ends up with no values.
    pub fn add_column(&mut self, column: impl Into<String>) {
        self.columns.entry(column.into()).or_default();
    }

    pub fn insert(&mut self, column: impl Into<String>, date: NaiveDate, price: Decimal) {
        self.columns
            .entry(column.into())
            .or_default()
            .push(PricePoint { date, price });
    }

    #[must_use]
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    /// Labels that have a `<label>_price` column.
    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        self.columns
            .keys()
            .filter_map(|c| c.strip_suffix(PRICE_COLUMN_SUFFIX))
            .filter(|label| !label.is_empty())
            .collect()
    }

    /// Extracts the price series for a label.
    ///
    /// # Errors
    ///
    /// Returns `MissingPriceColumn` if the table has no `<label>_price` column.
    pub fn series_for(&self, label: &str) -> Result<PriceSeries, MissingPriceColumn> {
        let column = price_column(label);

        match self.columns.get(&column) {
            Some(points) => Ok(PriceSeries::from_points(points.iter().copied())),
            None => Err(MissingPriceColumn {
                label: label.to_string(),
                column,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, d).unwrap()
    }

    #[test]
    fn price_column_appends_suffix() {
        assert_eq!(price_column("BTC"), "BTC_price");
    }

    #[test]
    fn series_is_sorted_and_deduplicated() {
        let series = PriceSeries::from_points([
            PricePoint::new(date(3), dec!(103)),
            PricePoint::new(date(1), dec!(101)),
            PricePoint::new(date(3), dec!(104)),
        ]);

        assert_eq!(
            series.points(),
            &[
                PricePoint::new(date(1), dec!(101)),
                PricePoint::new(date(3), dec!(104)),
            ]
        );
        assert_eq!(series.price_on(date(3)), Some(dec!(104)));
        assert_eq!(series.price_on(date(2)), None);
    }

    #[test]
    fn series_for_missing_label_is_missing_column() {
        let mut table = PriceTable::new();
        table.insert("BTC_price", date(1), dec!(96000));

        let err = table.series_for("DOGE").unwrap_err();

        assert_eq!(err.column, "DOGE_price");
        assert_eq!(err.label, "DOGE");
        assert!(err.to_string().contains("DOGE"));
    }

    #[test]
    fn labels_lists_price_columns_only() {
        let mut table = PriceTable::new();
        table.add_column("BTC_price");
        table.add_column("ETH_price");
        table.add_column("volume");

        assert_eq!(table.labels(), vec!["BTC", "ETH"]);
    }

    #[test]
    fn empty_column_yields_empty_series() {
        let mut table = PriceTable::new();
        table.add_column("SOL_price");

        let series = table.series_for("SOL").unwrap();

        assert!(series.is_empty());
    }
}
