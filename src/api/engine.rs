use tracing::{debug, trace};

use crate::core::{DonutDataset, MetricSeries, Period, SeriesTransform};
use crate::error::ChartResult;
use crate::extensions::{EventAnnotation, EventOverlay, EventRecord};
use crate::interaction::{InteractionController, LegendVisibilityController};
use crate::render::{RenderFrame, RenderMode, Renderer};

use super::render_frame_builder::{FrameInputs, build_render_frame};
use super::{ChartCallbacks, ChartEngineConfig, RenderScheduler};

/// Main orchestration facade consumed by host applications.
///
/// `ChartEngine` owns the raw data and every piece of per-chart state:
/// the transformed series, legend visibility, the redraw scheduler,
/// tooltip state and event annotations. Time never advances on its own;
/// hosts pass `now_ms` to the operations that arm or fire debounces and
/// call [`ChartEngine::tick`] to let due timers run.
pub struct ChartEngine<R: Renderer> {
    pub(super) renderer: R,
    pub(super) config: ChartEngineConfig,
    pub(super) period: Period,
    pub(super) raw: Vec<MetricSeries>,
    pub(super) transform: SeriesTransform,
    pub(super) donut: Option<DonutDataset>,
    pub(super) legend: LegendVisibilityController,
    pub(super) scheduler: RenderScheduler,
    pub(super) interaction: InteractionController,
    pub(super) events: EventOverlay,
    pub(super) event_records: Vec<EventRecord>,
    pub(super) preaggregated_events: Vec<EventAnnotation>,
    pub(super) callbacks: Box<dyn ChartCallbacks>,
    /// Latest time reported by the host.
    pub(super) clock_ms: u64,
    pub(super) destroyed: bool,
}

impl<R: Renderer> ChartEngine<R> {
    /// Fires due timers and runs at most one redraw.
    ///
    /// Returns whether a frame was handed to the renderer.
    pub fn tick(&mut self, now_ms: u64) -> ChartResult<bool> {
        if self.destroyed {
            trace!(now_ms, "tick on destroyed engine ignored");
            return Ok(false);
        }
        self.clock_ms = self.clock_ms.max(now_ms);
        if self.interaction.poll(now_ms) {
            self.scheduler.request_redraw();
        }
        let Some(ticket) = self.scheduler.poll(now_ms) else {
            return Ok(false);
        };
        let frame = self.frame_for(ticket.mode, false)?;
        self.renderer.render(&frame)?;
        debug!(
            sequence = ticket.sequence,
            mode = ?ticket.mode,
            primitives = frame.primitive_count(),
            "redraw"
        );
        Ok(true)
    }

    /// Frame for the current state, without rendering it.
    ///
    /// While a resize is settling this is the loading placeholder.
    pub fn build_frame(&self) -> ChartResult<RenderFrame> {
        let mode = if self.scheduler.is_first_render() {
            RenderMode::Initial
        } else {
            RenderMode::Update
        };
        self.frame_for(mode, self.scheduler.is_resizing())
    }

    /// Clears every pending timer; later operations are no-ops.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.scheduler.destroy();
        self.interaction.destroy();
        self.destroyed = true;
        debug!("chart engine destroyed");
    }

    /// Installs host callbacks, replacing the previous ones.
    pub fn set_callbacks<C: ChartCallbacks + 'static>(&mut self, callbacks: C) {
        self.callbacks = Box::new(callbacks);
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    pub(super) fn frame_for(&self, mode: RenderMode, is_loading: bool) -> ChartResult<RenderFrame> {
        build_render_frame(&FrameInputs {
            viewport: self.scheduler.viewport(),
            config: &self.config,
            series: self.transform.as_renderable(),
            donut: self.donut.as_ref(),
            events: &self.events,
            tooltip: self.interaction.tooltip(),
            mode,
            is_loading,
        })
    }

    pub(super) fn render_placeholder(&mut self) -> ChartResult<()> {
        let frame = self.frame_for(RenderMode::Update, true)?;
        self.renderer.render(&frame)
    }
}
