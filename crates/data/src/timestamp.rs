//! Lenient date/time parsing for corpus files.
//!
//! Unparseable values yield `None`; callers drop those rows instead of
//! substituting epoch or the current time.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const ISO_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

const ISO_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%:z", "%Y-%m-%d %H:%M:%S%.f%:z"];

const SEPARATORS: [char; 3] = ['/', '-', '.'];

const TIME_SUFFIXES: &[&str] = &[" %H:%M:%S", " %H:%M", " %H:%M:%S%.f"];

/// Parses a timestamp, keeping the wall-clock time it was written in.
///
/// Year-first forms are tried before the ambiguous `DD/MM/YYYY` family,
/// which is read day-first or month-first according to `day_first`.
#[must_use]
pub fn parse_timestamp(raw: &str, day_first: bool) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.naive_local());
    }

    for format in OFFSET_FORMATS {
        if let Ok(parsed) = DateTime::parse_from_str(raw, format) {
            return Some(parsed.naive_local());
        }
    }

    for format in ISO_DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(parsed);
        }
    }

    for format in ISO_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    parse_ambiguous(raw, day_first)
}

/// Parses a calendar date with the same rules as [`parse_timestamp`],
/// discarding any time component.
#[must_use]
pub fn parse_date(raw: &str, day_first: bool) -> Option<NaiveDate> {
    parse_timestamp(raw, day_first).map(|ts| ts.date())
}

fn parse_ambiguous(raw: &str, day_first: bool) -> Option<NaiveDateTime> {
    for sep in SEPARATORS {
        let date_format = if day_first {
            format!("%d{sep}%m{sep}%Y")
        } else {
            format!("%m{sep}%d{sep}%Y")
        };

        if let Ok(date) = NaiveDate::parse_from_str(raw, &date_format) {
            return date.and_hms_opt(0, 0, 0);
        }

        for suffix in TIME_SUFFIXES {
            let format = format!("{date_format}{suffix}");
            if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, &format) {
                return Some(parsed);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn parses_iso_datetime() {
        assert_eq!(
            parse_timestamp("2024-12-01 13:45:10", true),
            Some(ts(2024, 12, 1, 13, 45, 10))
        );
        assert_eq!(
            parse_timestamp("2024-12-01T13:45", true),
            Some(ts(2024, 12, 1, 13, 45, 0))
        );
    }

    #[test]
    fn rfc3339_keeps_wall_clock_time() {
        assert_eq!(
            parse_timestamp("2024-12-01T23:30:00+02:00", true),
            Some(ts(2024, 12, 1, 23, 30, 0))
        );
        assert_eq!(
            parse_timestamp("2024-12-01 23:30:00+00:00", true),
            Some(ts(2024, 12, 1, 23, 30, 0))
        );
    }

    #[test]
    fn day_first_controls_ambiguous_dates() {
        assert_eq!(
            parse_timestamp("02/12/2024 08:15", true),
            Some(ts(2024, 12, 2, 8, 15, 0))
        );
        assert_eq!(
            parse_timestamp("02/12/2024 08:15", false),
            Some(ts(2024, 2, 12, 8, 15, 0))
        );
        assert_eq!(
            parse_timestamp("31.12.2024", true),
            Some(ts(2024, 12, 31, 0, 0, 0))
        );
    }

    #[test]
    fn iso_dates_ignore_day_first() {
        assert_eq!(
            parse_date("2024-12-05", false),
            NaiveDate::from_ymd_opt(2024, 12, 5)
        );
        assert_eq!(
            parse_date("2024-12-05", true),
            NaiveDate::from_ymd_opt(2024, 12, 5)
        );
    }

    #[test]
    fn malformed_values_are_none() {
        assert_eq!(parse_timestamp("", true), None);
        assert_eq!(parse_timestamp("yesterday", true), None);
        assert_eq!(parse_timestamp("31/31/2024", true), None);
        assert_eq!(parse_timestamp("2024-13-01", true), None);
    }
}
