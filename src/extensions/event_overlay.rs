use std::collections::BTreeMap;

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::Period;
use crate::core::palette::event_color;
use crate::core::temporal::{format_calendar_date, parse_calendar_date};
use crate::error::{ChartError, ChartResult};

/// Calendar event as delivered by the events backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    /// `YYYY-MM-DD`, optionally followed by a time.
    pub date_from: String,
    pub date_to: String,
}

impl EventRecord {
    #[must_use]
    pub fn new(
        id: u64,
        name: impl Into<String>,
        date_from: impl Into<String>,
        date_to: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            color: None,
            date_from: date_from.into(),
            date_to: date_to.into(),
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn date_range(&self) -> ChartResult<(NaiveDate, NaiveDate)> {
        Ok((
            parse_calendar_date(&self.date_from)?,
            parse_calendar_date(&self.date_to)?,
        ))
    }

    #[must_use]
    pub fn short(&self) -> ShortEvent {
        ShortEvent {
            id: self.id,
            name: self.name.clone(),
            color: self.color.clone(),
        }
    }
}

/// Event entry shown inside an annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortEvent {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

impl ShortEvent {
    /// CSS-style colour, falling back to a colour derived from the id.
    #[must_use]
    pub fn display_color(&self) -> String {
        match self.color.as_deref() {
            Some(color) if color.starts_with('#') => color.to_owned(),
            Some(color) if !color.is_empty() => format!("#{color}"),
            _ => event_color(self.id).to_owned(),
        }
    }
}

/// Events attached to one displayed date or bucket start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventAnnotation {
    pub date: String,
    #[serde(rename = "eventList", alias = "items")]
    pub items: Vec<ShortEvent>,
}

/// Calendar span covered by a week or month bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnotationInterval {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl AnnotationInterval {
    /// Week buckets span seven days, month buckets run to the day before the next month start.
    #[must_use]
    pub fn for_bucket(start: NaiveDate, period: Period) -> Self {
        let to = match period {
            Period::Month => start
                .checked_add_months(Months::new(1))
                .and_then(|next| next.pred_opt())
                .unwrap_or(start),
            _ => start.checked_add_days(Days::new(6)).unwrap_or(start),
        };
        Self { from: start, to }
    }

    /// Overlap test between an event range and this interval.
    ///
    /// Matches on a shared boundary, when either event endpoint lies strictly
    /// inside the interval, or when the event covers the whole interval.
    #[must_use]
    pub fn matches(self, event_from: NaiveDate, event_to: NaiveDate) -> bool {
        self.from == event_from
            || self.from == event_to
            || self.to == event_to
            || self.to == event_from
            || (event_from > self.from && event_from < self.to)
            || (event_to > self.from && event_to < self.to)
            || (event_from < self.from && event_to > self.to)
    }
}

/// Every calendar day of `[from, to]`; a reversed range yields only `to`.
#[must_use]
pub fn expand_days(from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
    if from >= to {
        return vec![to];
    }
    from.iter_days().take_while(|day| *day <= to).collect()
}

#[must_use]
pub fn period_supports_events(period: Period) -> bool {
    matches!(period, Period::Day | Period::Week | Period::Month)
}

/// Event annotations of one chart keyed by displayed date.
///
/// Daily charts key annotations by calendar day; week/month charts key
/// them by the start date of each bucket.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EventOverlay {
    period: Period,
    bucket_starts: Vec<NaiveDate>,
    annotations: BTreeMap<NaiveDate, Vec<ShortEvent>>,
}

impl EventOverlay {
    #[must_use]
    pub fn new(period: Period, bucket_starts: Vec<NaiveDate>) -> Self {
        Self {
            period,
            bucket_starts,
            annotations: BTreeMap::new(),
        }
    }

    pub fn from_records(
        records: &[EventRecord],
        period: Period,
        bucket_starts: Vec<NaiveDate>,
    ) -> ChartResult<Self> {
        let mut overlay = Self::new(period, bucket_starts);
        for record in records {
            overlay.add_event(record)?;
        }
        Ok(overlay)
    }

    /// Loads annotations that were already aggregated by the host.
    pub fn from_annotations(
        annotations: Vec<EventAnnotation>,
        period: Period,
        bucket_starts: Vec<NaiveDate>,
    ) -> ChartResult<Self> {
        let mut overlay = Self::new(period, bucket_starts);
        for annotation in annotations {
            let date = parse_calendar_date(&annotation.date)?;
            let items = overlay.annotations.entry(date).or_default();
            for item in annotation.items {
                upsert(items, item);
            }
        }
        overlay.drop_empty();
        Ok(overlay)
    }

    #[must_use]
    pub fn period(&self) -> Period {
        self.period
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// Displayed dates an event with this range is attached to.
    pub fn matching_dates(&self, from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
        match self.period {
            Period::Day => expand_days(from, to),
            Period::Week | Period::Month => self
                .bucket_starts
                .iter()
                .copied()
                .filter(|start| {
                    AnnotationInterval::for_bucket(*start, self.period).matches(from, to)
                })
                .collect(),
            Period::Hour | Period::DayOfWeek => Vec::new(),
        }
    }

    /// Attaches `event` to every matching date, merging with existing annotations.
    pub fn add_event(&mut self, event: &EventRecord) -> ChartResult<()> {
        let (from, to) = event.date_range()?;
        let dates = self.matching_dates(from, to);
        trace!(event_id = event.id, matches = dates.len(), "adding event");
        for date in dates {
            upsert(self.annotations.entry(date).or_default(), event.short());
        }
        Ok(())
    }

    /// Moves `event` to its new dates without touching other events.
    ///
    /// Entries on dates the event no longer covers are removed; entries on
    /// covered dates are replaced in place or appended.
    pub fn update_event(&mut self, event: &EventRecord) -> ChartResult<()> {
        let (from, to) = event.date_range()?;
        let dates = self.matching_dates(from, to);
        for (date, items) in &mut self.annotations {
            if !dates.contains(date) {
                items.retain(|item| item.id != event.id);
            }
        }
        for date in dates {
            upsert(self.annotations.entry(date).or_default(), event.short());
        }
        self.drop_empty();
        Ok(())
    }

    /// Removes `event_id` everywhere; returns whether anything was removed.
    pub fn delete_event(&mut self, event_id: u64) -> bool {
        let mut removed = false;
        for items in self.annotations.values_mut() {
            let before = items.len();
            items.retain(|item| item.id != event_id);
            removed |= items.len() != before;
        }
        self.drop_empty();
        removed
    }

    #[must_use]
    pub fn events_at(&self, date: NaiveDate) -> Option<&[ShortEvent]> {
        self.annotations.get(&date).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &[ShortEvent])> + '_ {
        self.annotations
            .iter()
            .map(|(date, items)| (*date, items.as_slice()))
    }

    /// Annotations sorted by date.
    #[must_use]
    pub fn annotations(&self) -> Vec<EventAnnotation> {
        self.iter()
            .map(|(date, items)| EventAnnotation {
                date: format_calendar_date(date),
                items: items.to_vec(),
            })
            .collect()
    }

    fn drop_empty(&mut self) {
        self.annotations.retain(|_, items| !items.is_empty());
    }
}

fn upsert(items: &mut Vec<ShortEvent>, event: ShortEvent) {
    match items.iter_mut().find(|item| item.id == event.id) {
        Some(existing) => *existing = event,
        None => items.push(event),
    }
}

/// Maps raw events onto the displayed dates of `period`.
pub fn map_events(
    events: &[EventRecord],
    period: Period,
    bucket_starts: &[NaiveDate],
) -> ChartResult<Vec<EventAnnotation>> {
    if !period_supports_events(period) {
        return Err(ChartError::InvalidData(format!(
            "events are not shown for period {period:?}"
        )));
    }
    Ok(EventOverlay::from_records(events, period, bucket_starts.to_vec())?.annotations())
}

/// Compact marker drawn under an annotated x tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMarker {
    pub date: NaiveDate,
    /// First letter of a single event, otherwise the number of events.
    pub label: String,
    pub color: String,
    pub count: usize,
}

impl EventMarker {
    #[must_use]
    pub fn for_events(date: NaiveDate, items: &[ShortEvent]) -> Option<Self> {
        let first = items.first()?;
        let label = if items.len() == 1 {
            first.name.chars().next().map(String::from).unwrap_or_default()
        } else {
            items.len().to_string()
        };
        let color = if items.len() == 1 {
            first.display_color()
        } else {
            event_color(first.id).to_owned()
        };
        Some(Self {
            date,
            label,
            color,
            count: items.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    #[test]
    fn month_interval_ends_before_next_month() {
        let interval = AnnotationInterval::for_bucket(ymd(2024, 2, 1), Period::Month);
        assert_eq!(interval.to, ymd(2024, 2, 29));
    }

    #[test]
    fn adjacent_week_does_not_match_on_strict_inner_test() {
        let week = AnnotationInterval::for_bucket(ymd(2024, 3, 25), Period::Week);
        assert!(!week.matches(ymd(2024, 3, 18), ymd(2024, 3, 24)));
        assert!(week.matches(ymd(2024, 3, 24), ymd(2024, 3, 25)));
    }

    #[test]
    fn single_event_marker_uses_first_letter() {
        let items = vec![ShortEvent {
            id: 3,
            name: "Release".to_owned(),
            color: Some("ca75ed".to_owned()),
        }];
        let marker = EventMarker::for_events(ymd(2024, 1, 1), &items).expect("marker");
        assert_eq!(marker.label, "R");
        assert_eq!(marker.color, "#ca75ed");
    }
}
