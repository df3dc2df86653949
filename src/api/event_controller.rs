use tracing::{debug, warn};

use crate::error::ChartResult;
use crate::extensions::{EventAnnotation, EventOverlay, EventRecord, period_supports_events};
use crate::render::Renderer;

use super::ChartEngine;

impl<R: Renderer> ChartEngine<R> {
    /// Replaces all calendar events.
    pub fn set_events(&mut self, records: Vec<EventRecord>) -> ChartResult<()> {
        for record in &records {
            record.date_range()?;
        }
        debug!(count = records.len(), "set events");
        self.event_records = records;
        self.rebuild_events()?;
        self.scheduler.request_redraw();
        Ok(())
    }

    /// Replaces events that the host already aggregated per displayed date.
    pub fn set_annotations(&mut self, annotations: Vec<EventAnnotation>) -> ChartResult<()> {
        let previous = std::mem::replace(&mut self.preaggregated_events, annotations);
        if let Err(err) = self.rebuild_events() {
            self.preaggregated_events = previous;
            return Err(err);
        }
        self.scheduler.request_redraw();
        Ok(())
    }

    /// Attaches a newly created event to every date it covers.
    pub fn add_event(&mut self, record: EventRecord) -> ChartResult<()> {
        if period_supports_events(self.period) {
            self.events.add_event(&record)?;
        } else {
            record.date_range()?;
        }
        upsert_record(&mut self.event_records, record);
        self.scheduler.request_redraw();
        Ok(())
    }

    /// Moves an edited event to the dates it now covers.
    pub fn update_event(&mut self, record: EventRecord) -> ChartResult<()> {
        if period_supports_events(self.period) {
            self.events.update_event(&record)?;
        } else {
            record.date_range()?;
        }
        upsert_record(&mut self.event_records, record);
        self.scheduler.request_redraw();
        Ok(())
    }

    /// Removes an event everywhere; returns whether it was shown.
    pub fn delete_event(&mut self, event_id: u64) -> bool {
        self.event_records.retain(|record| record.id != event_id);
        for annotation in &mut self.preaggregated_events {
            annotation.items.retain(|item| item.id != event_id);
        }
        let removed = self.events.delete_event(event_id);
        if removed {
            self.scheduler.request_redraw();
        }
        removed
    }

    /// Forwards a click on an event to the host; unknown ids are ignored.
    pub fn click_event(&mut self, event_id: u64) -> bool {
        if self.destroyed {
            return false;
        }
        let known = self
            .events
            .iter()
            .any(|(_, items)| items.iter().any(|item| item.id == event_id));
        if known {
            self.callbacks.on_event_click(event_id);
        } else {
            warn!(event_id, "click on unknown event ignored");
        }
        known
    }

    /// Re-maps every stored event onto the current period and buckets.
    pub(super) fn rebuild_events(&mut self) -> ChartResult<()> {
        let bucket_starts = self
            .transform
            .as_renderable()
            .map(|series| {
                series
                    .bucket_index
                    .iter()
                    .map(|(_, _, start)| start)
                    .collect()
            })
            .unwrap_or_default();
        if !period_supports_events(self.period) {
            self.events = EventOverlay::new(self.period, bucket_starts);
            return Ok(());
        }
        let mut overlay = EventOverlay::from_annotations(
            self.preaggregated_events.clone(),
            self.period,
            bucket_starts,
        )?;
        for record in &self.event_records {
            overlay.add_event(record)?;
        }
        self.events = overlay;
        Ok(())
    }
}

fn upsert_record(records: &mut Vec<EventRecord>, record: EventRecord) {
    match records.iter_mut().find(|existing| existing.id == record.id) {
        Some(existing) => *existing = record,
        None => records.push(record),
    }
}
