use crate::core::{ChartKind, DonutDataset, MetricSeries, Period, SeriesTransform, Viewport};
use crate::extensions::{EventAnnotation, EventOverlay};
use crate::interaction::{
    DisabledMetricsState, EventTooltipState, LegendData, LegendVisibilityController, TooltipState,
};
use crate::render::Renderer;

use super::chart_scene::PlotArea;
use super::{ChartEngine, ChartEngineConfig, SchedulerState};

impl<R: Renderer> ChartEngine<R> {
    #[must_use]
    pub fn config(&self) -> &ChartEngineConfig {
        &self.config
    }

    #[must_use]
    pub fn chart_kind(&self) -> ChartKind {
        self.config.chart_kind
    }

    #[must_use]
    pub fn period(&self) -> Period {
        self.period
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.scheduler.viewport()
    }

    #[must_use]
    pub fn plot_area(&self) -> PlotArea {
        PlotArea::from_viewport(self.scheduler.viewport(), self.config.margins)
    }

    #[must_use]
    pub fn raw_series(&self) -> &[MetricSeries] {
        &self.raw
    }

    #[must_use]
    pub fn series(&self) -> &SeriesTransform {
        &self.transform
    }

    #[must_use]
    pub fn donut_data(&self) -> Option<&DonutDataset> {
        self.donut.as_ref()
    }

    #[must_use]
    pub fn legend(&self) -> &LegendData {
        self.legend.legend()
    }

    #[must_use]
    pub fn legend_controller(&self) -> &LegendVisibilityController {
        &self.legend
    }

    #[must_use]
    pub fn disabled_metrics(&self) -> &DisabledMetricsState {
        self.legend.state()
    }

    #[must_use]
    pub fn tooltip(&self) -> &TooltipState {
        self.interaction.tooltip()
    }

    #[must_use]
    pub fn event_tooltip(&self) -> &EventTooltipState {
        self.interaction.event_tooltip()
    }

    #[must_use]
    pub fn event_overlay(&self) -> &EventOverlay {
        &self.events
    }

    /// Event annotations sorted by date.
    #[must_use]
    pub fn annotations(&self) -> Vec<EventAnnotation> {
        self.events.annotations()
    }

    #[must_use]
    pub fn scheduler_state(&self) -> SchedulerState {
        self.scheduler.state()
    }

    #[must_use]
    pub fn is_resizing(&self) -> bool {
        self.scheduler.is_resizing()
    }

    #[must_use]
    pub fn redraw_count(&self) -> u64 {
        self.scheduler.redraw_count()
    }

    /// Whether a redraw will run on a future [`ChartEngine::tick`].
    #[must_use]
    pub fn has_pending_redraw(&self) -> bool {
        self.scheduler.has_pending_redraw()
    }

    /// Earliest timer deadline, so hosts know when to call `tick` next.
    #[must_use]
    pub fn next_deadline_ms(&self) -> Option<u64> {
        match (
            self.scheduler.next_deadline_ms(),
            self.interaction.next_deadline_ms(),
        ) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }
}
