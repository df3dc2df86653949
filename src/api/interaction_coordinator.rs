use chrono::NaiveDate;
use tracing::trace;

use crate::core::{Period, TemporalKey, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{EventTooltipState, HoverContext, event_tooltip_left};
use crate::render::Renderer;

use super::ChartEngine;
use super::chart_scene::compute_scales;

impl<R: Renderer> ChartEngine<R> {
    /// Reports a new container size.
    ///
    /// A real size change enters the resizing state, hides the tooltip and
    /// draws the loading placeholder; the redraw follows once the settle
    /// window passed without further resizes. Returns whether the size changed.
    pub fn resize(&mut self, viewport: Viewport, now_ms: u64) -> ChartResult<bool> {
        if !viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        if self.destroyed {
            return Ok(false);
        }
        self.clock_ms = self.clock_ms.max(now_ms);
        let was_resizing = self.scheduler.is_resizing();
        if !self.scheduler.on_viewport_resize(viewport, now_ms) {
            return Ok(false);
        }
        self.interaction.reset();
        if !was_resizing {
            self.render_placeholder()?;
        }
        Ok(true)
    }

    /// Hover intent for the bucket `key`; returns whether the tooltip changed.
    ///
    /// Leaving only arms the hide timer. Hovers are ignored while resizing
    /// and when nothing is rendered.
    pub fn hover(
        &mut self,
        key: TemporalKey,
        is_entering: bool,
        now_ms: u64,
    ) -> ChartResult<bool> {
        if self.destroyed {
            return Ok(false);
        }
        self.clock_ms = self.clock_ms.max(now_ms);
        if !is_entering {
            self.interaction.on_leave(now_ms);
            return Ok(false);
        }
        if self.scheduler.is_resizing() {
            return Ok(false);
        }
        let Some(series) = self.transform.as_renderable() else {
            return Ok(false);
        };
        let area = self.plot_area();
        let Some(scales) = compute_scales(series, self.config.chart_kind, &area)? else {
            return Ok(false);
        };
        let ctx = HoverContext {
            series,
            x_scale: &scales.x,
            chart_width: f64::from(self.scheduler.viewport().width),
            y_max: scales.primary.max,
            palette: self.config.palette,
            fallback_unit: &self.config.currency_unit,
        };
        let changed = self.interaction.on_hover(key, true, now_ms, &ctx);
        if changed {
            self.scheduler.request_redraw();
        }
        Ok(changed)
    }

    /// Hover at a viewport x coordinate, snapped to the nearest bucket.
    pub fn hover_at_pixel(&mut self, x_px: f64, now_ms: u64) -> ChartResult<bool> {
        if !x_px.is_finite() {
            return Err(ChartError::InvalidData(
                "hover position must be finite".to_owned(),
            ));
        }
        let Some(key) = self.key_at_pixel(x_px)? else {
            trace!(x_px, "no bucket under pointer");
            return Ok(false);
        };
        self.hover(key, true, now_ms)
    }

    /// Pointer left the plot; the tooltip hides after the debounce window.
    pub fn pointer_leave(&mut self, now_ms: u64) {
        if self.destroyed {
            return;
        }
        self.clock_ms = self.clock_ms.max(now_ms);
        self.interaction.on_leave(now_ms);
    }

    /// Shows the event tooltip for the annotation at `date`, or schedules
    /// hiding it when `date` is `None` or carries no events.
    pub fn hover_event(&mut self, date: Option<NaiveDate>, now_ms: u64) -> ChartResult<bool> {
        if self.destroyed {
            return Ok(false);
        }
        self.clock_ms = self.clock_ms.max(now_ms);
        let state = match date {
            Some(date) => self.event_tooltip_at(date)?,
            None => None,
        };
        let changed = self.interaction.on_hover_event(state, now_ms);
        if changed {
            self.scheduler.request_redraw();
        }
        Ok(changed)
    }

    fn key_at_pixel(&self, x_px: f64) -> ChartResult<Option<TemporalKey>> {
        let Some(series) = self.transform.as_renderable() else {
            return Ok(None);
        };
        let area = self.plot_area();
        let scales = compute_scales(series, self.config.chart_kind, &area)?;
        Ok(scales.and_then(|scales| scales.x.nearest_key(x_px - area.left)))
    }

    fn event_tooltip_at(&self, date: NaiveDate) -> ChartResult<Option<EventTooltipState>> {
        let Some(items) = self.events.events_at(date) else {
            return Ok(None);
        };
        let Some(series) = self.transform.as_renderable() else {
            return Ok(None);
        };
        let key = match self.period {
            Period::Day => Some(TemporalKey::Date(date)),
            _ => series
                .bucket_index
                .iter()
                .find(|(_, _, start)| *start == date)
                .map(|(bucket, _, _)| TemporalKey::Bucket(bucket)),
        };
        let area = self.plot_area();
        let Some(scales) = compute_scales(series, self.config.chart_kind, &area)? else {
            return Ok(None);
        };
        let Some(anchor) = key.and_then(|key| scales.x.anchor(key)) else {
            return Ok(None);
        };
        let left = event_tooltip_left(
            area.left + anchor,
            0.0,
            f64::from(self.scheduler.viewport().width),
            self.period,
        );
        Ok(Some(EventTooltipState::for_events(date, items, left)))
    }
}
