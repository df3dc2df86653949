use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::types::{MetricSeries, Period, RawDate, TemporalKey};
use crate::error::{ChartError, ChartResult};

pub const CALENDAR_DATE_FORMAT: &str = "%Y-%m-%d";

/// Shape of a raw date value, used to check it against the active period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawDateFormat {
    CalendarDate,
    Integer,
    Unknown,
}

#[must_use]
pub fn detect_format(raw: &RawDate) -> RawDateFormat {
    match raw {
        RawDate::Number(_) => RawDateFormat::Integer,
        RawDate::Text(text) => {
            let text = text.trim();
            if text.parse::<i64>().is_ok() {
                RawDateFormat::Integer
            } else if text.contains('-') {
                RawDateFormat::CalendarDate
            } else {
                RawDateFormat::Unknown
            }
        }
    }
}

/// Parses `YYYY-MM-DD`, ignoring a trailing time component.
pub fn parse_calendar_date(text: &str) -> ChartResult<NaiveDate> {
    let date_part = text
        .trim()
        .split([' ', 'T'])
        .next()
        .unwrap_or_default();
    NaiveDate::parse_from_str(date_part, CALENDAR_DATE_FORMAT).map_err(|_| {
        ChartError::InvalidDate {
            value: text.to_owned(),
        }
    })
}

#[must_use]
pub fn format_calendar_date(date: NaiveDate) -> String {
    date.format(CALENDAR_DATE_FORMAT).to_string()
}

fn parse_integer(raw: &RawDate) -> Option<i64> {
    match raw {
        RawDate::Number(value) => Some(*value),
        RawDate::Text(text) => text.trim().parse().ok(),
    }
}

/// Returns a mismatch reason when `raw` cannot be placed on `period`'s axis.
#[must_use]
pub fn period_mismatch(raw: &RawDate, period: Period) -> Option<String> {
    let format = detect_format(raw);
    match period {
        Period::Hour => match parse_integer(raw) {
            Some(hour) if (0..=23).contains(&hour) => None,
            _ => Some(format!("`{raw}` is not an hour of day (0..=23)")),
        },
        Period::DayOfWeek => match parse_integer(raw) {
            Some(day) if (1..=7).contains(&day) => None,
            _ => Some(format!("`{raw}` is not a day of week (1..=7)")),
        },
        Period::Day | Period::Week | Period::Month => {
            if format == RawDateFormat::CalendarDate {
                None
            } else {
                Some(format!("`{raw}` is not a calendar date"))
            }
        }
    }
}

/// Order-preserving list of distinct raw dates for week/month aggregation.
///
/// The position of a raw date in this list is its bucket key; the list is
/// also the inverse mapping used to recover the original date on hover.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BucketIndex {
    entries: IndexMap<String, NaiveDate>,
}

impl BucketIndex {
    /// Collects distinct raw dates across all axis groups in first-seen order.
    pub fn from_series(series: &[MetricSeries]) -> ChartResult<Self> {
        let mut entries = IndexMap::new();
        for group in series {
            for point in &group.points {
                let raw = point.date.to_string();
                if entries.contains_key(&raw) {
                    continue;
                }
                let start = parse_calendar_date(&raw)?;
                entries.insert(raw, start);
            }
        }
        Ok(Self { entries })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn key_for(&self, raw: &str) -> Option<usize> {
        self.entries.get_index_of(raw)
    }

    #[must_use]
    pub fn original_date(&self, bucket: usize) -> Option<&str> {
        self.entries.get_index(bucket).map(|(raw, _)| raw.as_str())
    }

    #[must_use]
    pub fn start_date(&self, bucket: usize) -> Option<NaiveDate> {
        self.entries.get_index(bucket).map(|(_, start)| *start)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &str, NaiveDate)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, (raw, start))| (index, raw.as_str(), *start))
    }

    /// Original date text for a key, the inverse of bucketing.
    #[must_use]
    pub fn raw_date_of(&self, key: TemporalKey) -> Option<String> {
        match key {
            TemporalKey::Date(date) => Some(format_calendar_date(date)),
            TemporalKey::Hour(hour) => Some(hour.to_string()),
            TemporalKey::DayOfWeek(day) => Some(day.to_string()),
            TemporalKey::Bucket(bucket) => self.original_date(bucket).map(str::to_owned),
        }
    }
}

/// Resolves one raw date into its axis key for `period`.
pub fn resolve_key(raw: &RawDate, period: Period, index: &BucketIndex) -> ChartResult<TemporalKey> {
    match period {
        Period::Day => parse_calendar_date(&raw.to_string()).map(TemporalKey::Date),
        Period::Week | Period::Month => {
            let text = raw.to_string();
            index
                .key_for(&text)
                .map(TemporalKey::Bucket)
                .ok_or(ChartError::InvalidDate { value: text })
        }
        Period::Hour => parse_integer(raw)
            .and_then(|hour| u8::try_from(hour).ok())
            .map(TemporalKey::Hour)
            .ok_or_else(|| ChartError::InvalidData(format!("`{raw}` is not an hour of day"))),
        Period::DayOfWeek => parse_integer(raw)
            .and_then(|day| u8::try_from(day).ok())
            .map(TemporalKey::DayOfWeek)
            .ok_or_else(|| ChartError::InvalidData(format!("`{raw}` is not a day of week"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calendar_date_ignores_time_suffix() {
        let date = parse_calendar_date("2024-03-18 10:15:00").expect("date");
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 18).expect("ymd"));
    }

    #[test]
    fn hour_period_rejects_calendar_dates() {
        assert!(period_mismatch(&RawDate::text("2024-01-01"), Period::Hour).is_some());
        assert!(period_mismatch(&RawDate::Number(23), Period::Hour).is_none());
        assert!(period_mismatch(&RawDate::Number(24), Period::Hour).is_some());
    }

    #[test]
    fn day_period_rejects_integers() {
        assert!(period_mismatch(&RawDate::Number(3), Period::Day).is_some());
        assert!(period_mismatch(&RawDate::text("2024-01-01"), Period::Week).is_none());
    }
}
