use crate::error::DataError;
use crate::models::{
    DailyScoreSeries, EventRecord, GradientSeries, MergedSeries, PriceTable, Sentiment,
};
use crate::timestamp::{parse_date, parse_timestamp};
use csv::{ByteRecord, Reader, ReaderBuilder, StringRecord, Writer};
use rust_decimal::Decimal;
use std::io::{Read, Write};
use std::path::Path;
use std::str::FromStr;

pub const LABEL_COLUMN: &str = "labeled_submission";
pub const TIMESTAMP_COLUMN: &str = "created_utc";
pub const SCORE_COLUMN: &str = "comment_score";
pub const SENTIMENT_COLUMN: &str = "Sentiment";
pub const DATE_COLUMN: &str = "date";

/// Counts of rows skipped while loading the event corpus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DroppedRows {
    pub missing_label: usize,
    pub malformed_timestamp: usize,
    pub malformed_score: usize,
    /// Rows whose needed fields are not valid UTF-8, or that the reader
    /// could not split
    pub undecodable: usize,
}

impl DroppedRows {
    #[must_use]
    pub fn total(&self) -> usize {
        self.missing_label + self.malformed_timestamp + self.malformed_score + self.undecodable
    }
}

/// The loaded event corpus plus a record of what was skipped.
#[derive(Debug, Clone, Default)]
pub struct EventCorpus {
    pub events: Vec<EventRecord>,
    pub dropped: DroppedRows,
}

/// The loaded price table plus the number of rows without a usable date.
#[derive(Debug, Clone, Default)]
pub struct PriceCorpus {
    pub table: PriceTable,
    pub dropped_rows: usize,
}

pub struct CsvStorage;

impl CsvStorage {
    /// Reads classified submissions.
    ///
    /// Format: `labeled_submission,created_utc,comment_score[,Sentiment]`
    /// (extra columns are ignored, order does not matter). Rows may be
    /// short or long; a row missing a needed field is dropped and counted.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or a required column is missing
    pub fn read_events(path: impl AsRef<Path>, day_first: bool) -> Result<EventCorpus, DataError> {
        let path = path.as_ref();
        let name = path.display().to_string();
        let reader = lenient_reader()
            .from_path(path)
            .map_err(|e| DataError::csv(&name, e))?;
        Self::events_from_csv(reader, &name, day_first)
    }

    /// Same as [`CsvStorage::read_events`] over any reader.
    ///
    /// # Errors
    /// Returns error if the input is not valid CSV or a required column is missing
    pub fn read_events_from<R: Read>(
        input: R,
        source: &str,
        day_first: bool,
    ) -> Result<EventCorpus, DataError> {
        Self::events_from_csv(lenient_reader().from_reader(input), source, day_first)
    }

    /// Reads the wide daily price file.
    ///
    /// Format: `date,<LABEL>_price,...`; empty cells are skipped for that
    /// column only.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or has no `date` column
    pub fn read_prices(path: impl AsRef<Path>, day_first: bool) -> Result<PriceCorpus, DataError> {
        let path = path.as_ref();
        let name = path.display().to_string();
        let reader = lenient_reader()
            .from_path(path)
            .map_err(|e| DataError::csv(&name, e))?;
        Self::prices_from_csv(reader, &name, day_first)
    }

    /// Same as [`CsvStorage::read_prices`] over any reader.
    ///
    /// # Errors
    /// Returns error if the input is not valid CSV or has no `date` column
    pub fn read_prices_from<R: Read>(
        input: R,
        source: &str,
        day_first: bool,
    ) -> Result<PriceCorpus, DataError> {
        Self::prices_from_csv(lenient_reader().from_reader(input), source, day_first)
    }

    /// Writes a daily score series.
    ///
    /// Format: `date,score`
    ///
    /// # Errors
    /// Returns error if file cannot be created or writing fails
    pub fn write_scores(path: impl AsRef<Path>, series: &DailyScoreSeries) -> Result<(), DataError> {
        let path = path.as_ref();
        let rows = series
            .points()
            .iter()
            .map(|p| vec![p.date.to_string(), p.score.to_string()]);
        Self::write_rows(path, &["date", "score"], rows)
    }

    /// Writes a merged score/price series.
    ///
    /// Format: `date,score,price`
    ///
    /// # Errors
    /// Returns error if file cannot be created or writing fails
    pub fn write_merged(path: impl AsRef<Path>, series: &MergedSeries) -> Result<(), DataError> {
        let path = path.as_ref();
        let rows = series.points().iter().map(|p| {
            vec![
                p.date.to_string(),
                p.score.to_string(),
                p.price.to_string(),
            ]
        });
        Self::write_rows(path, &["date", "score", "price"], rows)
    }

    /// Writes a gradient series.
    ///
    /// Format: `date,score_gradient,price_gradient`
    ///
    /// # Errors
    /// Returns error if file cannot be created or writing fails
    pub fn write_gradients(path: impl AsRef<Path>, series: &GradientSeries) -> Result<(), DataError> {
        let path = path.as_ref();
        let rows = series.points().iter().map(|p| {
            vec![
                p.date.to_string(),
                p.score_gradient.to_string(),
                p.price_gradient.to_string(),
            ]
        });
        Self::write_rows(path, &["date", "score_gradient", "price_gradient"], rows)
    }

    fn events_from_csv<R: Read>(
        mut reader: Reader<R>,
        source: &str,
        day_first: bool,
    ) -> Result<EventCorpus, DataError> {
        let headers = reader
            .headers()
            .map_err(|e| DataError::csv(source, e))?
            .clone();

        let label_idx = require_column(&headers, LABEL_COLUMN, source)?;
        let timestamp_idx = require_column(&headers, TIMESTAMP_COLUMN, source)?;
        let score_idx = require_column(&headers, SCORE_COLUMN, source)?;
        let sentiment_idx = find_column(&headers, SENTIMENT_COLUMN);

        if sentiment_idx.is_none() {
            tracing::warn!(source, "no '{SENTIMENT_COLUMN}' column, every event is neutral");
        }

        let mut corpus = EventCorpus::default();

        for result in reader.byte_records() {
            let record = match result {
                Ok(record) => record,
                Err(e) if e.is_io_error() => return Err(DataError::csv(source, e)),
                Err(e) => {
                    tracing::debug!(source, error = %e, "unreadable event row");
                    corpus.dropped.undecodable += 1;
                    continue;
                }
            };

            let (Ok(label), Ok(raw_timestamp), Ok(raw_score), Ok(raw_sentiment)) = (
                text_field(&record, Some(label_idx)),
                text_field(&record, Some(timestamp_idx)),
                text_field(&record, Some(score_idx)),
                text_field(&record, sentiment_idx),
            ) else {
                corpus.dropped.undecodable += 1;
                continue;
            };

            let label = label.trim();
            if label.is_empty() {
                corpus.dropped.missing_label += 1;
                continue;
            }

            let Some(timestamp) = parse_timestamp(raw_timestamp, day_first) else {
                corpus.dropped.malformed_timestamp += 1;
                continue;
            };

            let Some(engagement_score) = parse_score(raw_score) else {
                corpus.dropped.malformed_score += 1;
                continue;
            };

            let sentiment = Sentiment::from_tag(raw_sentiment);

            corpus.events.push(EventRecord {
                label: label.to_string(),
                timestamp,
                engagement_score,
                sentiment,
            });
        }

        if corpus.dropped.total() > 0 {
            tracing::warn!(
                source,
                missing_label = corpus.dropped.missing_label,
                malformed_timestamp = corpus.dropped.malformed_timestamp,
                malformed_score = corpus.dropped.malformed_score,
                undecodable = corpus.dropped.undecodable,
                "dropped unusable event rows"
            );
        }
        tracing::debug!(source, events = corpus.events.len(), "event corpus loaded");

        Ok(corpus)
    }

    fn prices_from_csv<R: Read>(
        mut reader: Reader<R>,
        source: &str,
        day_first: bool,
    ) -> Result<PriceCorpus, DataError> {
        let headers = reader
            .headers()
            .map_err(|e| DataError::csv(source, e))?
            .clone();

        let date_idx = require_column(&headers, DATE_COLUMN, source)?;
        let price_columns: Vec<(usize, String)> = headers
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != date_idx)
            .map(|(idx, name)| (idx, clean_header(name).to_string()))
            .collect();

        let mut corpus = PriceCorpus::default();
        for (_, column) in &price_columns {
            corpus.table.add_column(column.clone());
        }

        for result in reader.byte_records() {
            let record = match result {
                Ok(record) => record,
                Err(e) if e.is_io_error() => return Err(DataError::csv(source, e)),
                Err(e) => {
                    tracing::debug!(source, error = %e, "unreadable price row");
                    corpus.dropped_rows += 1;
                    continue;
                }
            };

            let Some(date) = text_field(&record, Some(date_idx))
                .ok()
                .and_then(|raw| parse_date(raw, day_first))
            else {
                corpus.dropped_rows += 1;
                continue;
            };

            for (idx, column) in &price_columns {
                let Ok(cell) = text_field(&record, Some(*idx)) else {
                    tracing::warn!(source, %date, column = %column, "price cell is not valid UTF-8");
                    continue;
                };
                let cell = cell.trim();
                if cell.is_empty() {
                    continue;
                }
                match Decimal::from_str(cell).or_else(|_| Decimal::from_scientific(cell)) {
                    Ok(price) => corpus.table.insert(column.clone(), date, price),
                    Err(_) => tracing::warn!(source, %date, column = %column, cell, "unparseable price"),
                }
            }
        }

        if corpus.dropped_rows > 0 {
            tracing::warn!(
                source,
                dropped = corpus.dropped_rows,
                "dropped price rows with malformed dates"
            );
        }

        Ok(corpus)
    }

    fn write_rows<I>(path: &Path, header: &[&str], rows: I) -> Result<(), DataError>
    where
        I: IntoIterator<Item = Vec<String>>,
    {
        let name = path.display().to_string();
        let mut writer = Writer::from_path(path).map_err(|e| DataError::csv(&name, e))?;
        write_all(&mut writer, header, rows).map_err(|e| DataError::csv(&name, e))
    }
}

fn write_all<W: Write, I>(writer: &mut Writer<W>, header: &[&str], rows: I) -> csv::Result<()>
where
    I: IntoIterator<Item = Vec<String>>,
{
    writer.write_record(header)?;
    for row in rows {
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

fn lenient_reader() -> ReaderBuilder {
    let mut builder = ReaderBuilder::new();
    builder.flexible(true);
    builder
}

/// Decodes one field. An absent index or a field past the end of a short
/// row reads as empty.
fn text_field(record: &ByteRecord, idx: Option<usize>) -> Result<&str, std::str::Utf8Error> {
    idx.and_then(|i| record.get(i))
        .map_or(Ok(""), std::str::from_utf8)
}

fn clean_header(name: &str) -> &str {
    name.trim().trim_start_matches('\u{feff}')
}

fn find_column(headers: &StringRecord, column: &str) -> Option<usize> {
    headers.iter().position(|h| clean_header(h) == column)
}

fn require_column(headers: &StringRecord, column: &str, source: &str) -> Result<usize, DataError> {
    find_column(headers, column).ok_or_else(|| DataError::MissingField {
        path: source.to_string(),
        column: column.to_string(),
    })
}

/// Scores are integers, but exports sometimes render them as `12.0`.
fn parse_score(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(score) = raw.parse::<i64>() {
        return Some(score);
    }
    let value = raw.parse::<f64>().ok()?;
    (value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64)
        .then_some(value as i64)
}
