use chrono::NaiveDate;

/// A point keyed by calendar date.
///
/// Series built from `Dated` points are sorted ascending with unique dates,
/// which is what lets joins and differencing walk them in a single pass.
pub trait Dated {
    fn date(&self) -> NaiveDate;
}

/// Returns true if `points` is strictly increasing by date.
#[must_use]
pub fn is_strictly_ascending<T: Dated>(points: &[T]) -> bool {
    points.windows(2).all(|pair| pair[0].date() < pair[1].date())
}
