use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::format::{format_value, format_x_tick};
use crate::core::palette::{PaletteVariant, series_color};
use crate::core::{ChartKind, ColumnType, Period, TemporalKey, TransformedSeries, XScale};
use crate::extensions::ShortEvent;

use super::timer::SettleTimer;

pub const TOOLTIP_ROW_HEIGHT_PX: f64 = 20.0;
pub const TOOLTIP_MIN_HEIGHT_PX: f64 = 60.0;
pub const EVENT_TOOLTIP_EDGE_PX: f64 = 280.0;
pub const EVENT_TOOLTIP_FLIP_SHIFT_PX: f64 = 270.0;

/// Horizontal tooltip placement rule.
///
/// The tooltip sits `offset_px` right of the anchor unless the remaining
/// width (minus `clearance_px`) is below `flip_threshold_px`, in which case
/// it moves `flip_shift_px` left of the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TooltipPlacement {
    pub offset_px: f64,
    pub clearance_px: f64,
    pub flip_threshold_px: f64,
    pub flip_shift_px: f64,
    /// Added to the anchor before placement (bar charts anchor on the bar group edge).
    pub anchor_shift_px: f64,
}

impl TooltipPlacement {
    #[must_use]
    pub const fn line() -> Self {
        Self {
            offset_px: 80.0,
            clearance_px: 80.0,
            flip_threshold_px: 400.0,
            flip_shift_px: 220.0,
            anchor_shift_px: 0.0,
        }
    }

    #[must_use]
    pub const fn bar() -> Self {
        Self {
            offset_px: 30.0,
            clearance_px: 80.0,
            flip_threshold_px: 300.0,
            flip_shift_px: 280.0,
            anchor_shift_px: 44.0,
        }
    }

    #[must_use]
    pub const fn for_chart(kind: ChartKind) -> Self {
        match kind {
            ChartKind::Bar | ChartKind::Stack => Self::bar(),
            _ => Self::line(),
        }
    }

    #[must_use]
    pub fn left_px(&self, anchor_x: f64, chart_width: f64) -> f64 {
        let anchor = anchor_x + self.anchor_shift_px;
        if chart_width - anchor - self.clearance_px < self.flip_threshold_px {
            anchor - self.flip_shift_px
        } else {
            anchor + self.offset_px
        }
    }
}

impl Default for TooltipPlacement {
    fn default() -> Self {
        Self::line()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipRow {
    pub id: String,
    pub color: String,
    pub title: String,
    /// Raw value, never the dual-axis converted one.
    pub value: f64,
    pub formatted_value: String,
}

/// Rows of one axis group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipSection {
    pub title: String,
    pub rows: Vec<TooltipRow>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TooltipState {
    pub is_shown: bool,
    pub anchor_x: Option<f64>,
    pub left_px: Option<f64>,
    pub active_key: Option<TemporalKey>,
    /// Original date of the hovered bucket.
    pub active_date: Option<String>,
    pub title: String,
    pub sections: Vec<TooltipSection>,
}

impl TooltipState {
    pub fn rows(&self) -> impl Iterator<Item = &TooltipRow> + '_ {
        self.sections.iter().flat_map(|section| section.rows.iter())
    }

    #[must_use]
    pub fn height_px(&self) -> f64 {
        self.rows().count() as f64 * TOOLTIP_ROW_HEIGHT_PX + TOOLTIP_MIN_HEIGHT_PX
    }
}

/// Builds one section per visible axis group for the hovered `key`.
///
/// Metrics without a value at `key` are skipped; rows are ordered by value,
/// largest first. Groups left without rows produce no section.
#[must_use]
pub fn build_tooltip_sections(
    series: &TransformedSeries,
    key: TemporalKey,
    palette: PaletteVariant,
    fallback_unit: &str,
) -> Vec<TooltipSection> {
    series
        .filtered
        .iter()
        .filter_map(|axis_group| {
            let mut rows: Vec<TooltipRow> = series
                .grouped
                .iter()
                .filter(|group| group.axis_group_id == axis_group.id)
                .filter_map(|group| {
                    let value = group.value_at(key)?;
                    Some(TooltipRow {
                        id: group.series_id.clone(),
                        color: series_color(group.color_index, group.is_primary_axis, palette)
                            .hex
                            .to_owned(),
                        title: group.metric_name.clone(),
                        value,
                        formatted_value: format_value(
                            value,
                            group.column_type,
                            axis_group.unit.as_deref(),
                            fallback_unit,
                        ),
                    })
                })
                .collect();
            if rows.is_empty() {
                return None;
            }
            rows.sort_by(|a, b| b.value.total_cmp(&a.value));
            let title = if axis_group.column_type == ColumnType::Percent {
                format!("{}, %", axis_group.display_name)
            } else {
                axis_group.display_name.clone()
            };
            Some(TooltipSection { title, rows })
        })
        .collect()
}

/// Horizontal position of the event tooltip relative to the chart's left edge.
///
/// `node_left`, `chart_left` and `chart_right` are in the same coordinate space.
#[must_use]
pub fn event_tooltip_left(
    node_left: f64,
    chart_left: f64,
    chart_right: f64,
    period: Period,
) -> f64 {
    if chart_right - node_left < EVENT_TOOLTIP_EDGE_PX {
        node_left - chart_left - EVENT_TOOLTIP_FLIP_SHIFT_PX
    } else {
        node_left - chart_left + event_tooltip_margin(period)
    }
}

const fn event_tooltip_margin(period: Period) -> f64 {
    match period {
        Period::Week => 60.0,
        Period::Month => 80.0,
        _ => 40.0,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTooltipRow {
    pub id: u64,
    pub color: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EventTooltipState {
    pub is_shown: bool,
    pub left_px: Option<f64>,
    pub date: Option<NaiveDate>,
    /// `DD.MM` of the annotated date.
    pub title: String,
    pub count: usize,
    pub rows: Vec<EventTooltipRow>,
}

impl EventTooltipState {
    #[must_use]
    pub fn for_events(date: NaiveDate, items: &[ShortEvent], left_px: f64) -> Self {
        Self {
            is_shown: !items.is_empty(),
            left_px: Some(left_px),
            date: Some(date),
            title: date.format("%d.%m").to_string(),
            count: items.len(),
            rows: items
                .iter()
                .map(|item| EventTooltipRow {
                    id: item.id,
                    color: item.display_color(),
                    title: item.name.clone(),
                })
                .collect(),
        }
    }
}

/// Inputs needed to resolve a hover into tooltip content.
#[derive(Debug, Clone, Copy)]
pub struct HoverContext<'a> {
    pub series: &'a TransformedSeries,
    pub x_scale: &'a XScale,
    /// Full container width, margins included.
    pub chart_width: f64,
    /// Upper bound of the primary y-domain; nothing is shown for flat-zero charts.
    pub y_max: f64,
    pub palette: PaletteVariant,
    pub fallback_unit: &'a str,
}

/// Pointer-driven tooltip state with debounced hiding.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionController {
    tooltip: TooltipState,
    hide_timer: SettleTimer,
    event_tooltip: EventTooltipState,
    event_hide_timer: SettleTimer,
    placement: TooltipPlacement,
    destroyed: bool,
}

impl InteractionController {
    #[must_use]
    pub fn new(
        tooltip_hide_ms: u64,
        event_tooltip_hide_ms: u64,
        placement: TooltipPlacement,
    ) -> Self {
        Self {
            tooltip: TooltipState::default(),
            hide_timer: SettleTimer::new(tooltip_hide_ms),
            event_tooltip: EventTooltipState::default(),
            event_hide_timer: SettleTimer::new(event_tooltip_hide_ms),
            placement,
            destroyed: false,
        }
    }

    #[must_use]
    pub fn tooltip(&self) -> &TooltipState {
        &self.tooltip
    }

    #[must_use]
    pub fn event_tooltip(&self) -> &EventTooltipState {
        &self.event_tooltip
    }

    #[must_use]
    pub fn placement(&self) -> TooltipPlacement {
        self.placement
    }

    pub fn set_placement(&mut self, placement: TooltipPlacement) {
        self.placement = placement;
    }

    #[must_use]
    pub fn has_pending_hide(&self) -> bool {
        self.hide_timer.is_armed() || self.event_hide_timer.is_armed()
    }

    /// Earliest pending hide deadline, for hosts scheduling their next tick.
    #[must_use]
    pub fn next_deadline_ms(&self) -> Option<u64> {
        match (self.hide_timer.deadline_ms(), self.event_hide_timer.deadline_ms()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Applies a hover intent; returns whether the visible tooltip changed.
    ///
    /// Entering cancels a pending hide and rebuilds the content. Leaving only
    /// arms the hide timer; the tooltip disappears on a later [`Self::poll`].
    pub fn on_hover(
        &mut self,
        key: TemporalKey,
        is_entering: bool,
        now_ms: u64,
        ctx: &HoverContext<'_>,
    ) -> bool {
        if self.destroyed {
            return false;
        }
        if !is_entering {
            self.on_leave(now_ms);
            return false;
        }

        self.hide_timer.cancel();
        let Some(anchor_x) = ctx.x_scale.anchor(key) else {
            trace!(%key, "hovered key outside of x domain");
            return self.hide_now();
        };
        let sections = build_tooltip_sections(ctx.series, key, ctx.palette, ctx.fallback_unit);
        let next = TooltipState {
            is_shown: !sections.is_empty() && ctx.y_max > 0.0,
            anchor_x: Some(anchor_x),
            left_px: Some(self.placement.left_px(anchor_x, ctx.chart_width)),
            active_key: Some(key),
            active_date: ctx.series.bucket_index.raw_date_of(key),
            title: format_x_tick(key, ctx.series.period, &ctx.series.bucket_index),
            sections,
        };
        let changed = next != self.tooltip;
        self.tooltip = next;
        changed
    }

    /// Pointer left the hovered region: hide after the debounce window.
    pub fn on_leave(&mut self, now_ms: u64) {
        if !self.destroyed {
            self.hide_timer.arm(now_ms);
        }
    }

    /// Shows or schedules hiding of the event tooltip for one annotation.
    pub fn on_hover_event(&mut self, state: Option<EventTooltipState>, now_ms: u64) -> bool {
        if self.destroyed {
            return false;
        }
        match state {
            Some(state) => {
                self.event_hide_timer.cancel();
                let changed = state != self.event_tooltip;
                self.event_tooltip = state;
                changed
            }
            None => {
                self.event_hide_timer.arm(now_ms);
                false
            }
        }
    }

    /// Fires due hide timers; returns whether anything became hidden.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        if self.destroyed {
            return false;
        }
        let mut changed = false;
        if self.hide_timer.poll(now_ms) {
            changed |= self.hide_now();
        }
        if self.event_hide_timer.poll(now_ms) {
            changed |= self.event_tooltip.is_shown;
            self.event_tooltip = EventTooltipState::default();
        }
        changed
    }

    /// Clears transient state after a data or period change.
    pub fn reset(&mut self) {
        self.hide_timer.cancel();
        self.event_hide_timer.cancel();
        self.tooltip = TooltipState::default();
        self.event_tooltip = EventTooltipState::default();
    }

    /// Clears every timer; later calls are no-ops.
    pub fn destroy(&mut self) {
        self.reset();
        self.destroyed = true;
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn hide_now(&mut self) -> bool {
        let was_shown = self.tooltip.is_shown;
        self.tooltip = TooltipState::default();
        was_shown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_tooltip_flips_near_right_edge() {
        let placement = TooltipPlacement::line();
        assert_eq!(placement.left_px(100.0, 1000.0), 180.0);
        assert_eq!(placement.left_px(600.0, 1000.0), 380.0);
    }

    #[test]
    fn bar_tooltip_uses_shifted_anchor() {
        let placement = TooltipPlacement::bar();
        assert_eq!(placement.left_px(100.0, 1000.0), 174.0);
        assert_eq!(placement.left_px(500.0, 1000.0), 574.0);
        assert_eq!(placement.left_px(600.0, 1000.0), 364.0);
        assert_eq!(placement.left_px(800.0, 1000.0), 564.0);
    }

    #[test]
    fn event_tooltip_flips_near_edge() {
        assert_eq!(event_tooltip_left(100.0, 0.0, 1000.0, Period::Week), 160.0);
        assert_eq!(event_tooltip_left(900.0, 0.0, 1000.0, Period::Day), 630.0);
    }
}
