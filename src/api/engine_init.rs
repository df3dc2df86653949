use indexmap::IndexSet;
use tracing::debug;

use crate::core::transform;
use crate::error::ChartResult;
use crate::extensions::EventOverlay;
use crate::interaction::{InteractionController, LegendVisibilityController};
use crate::render::Renderer;

use super::{ChartEngine, ChartEngineConfig, NoopCallbacks, RenderScheduler};

impl<R: Renderer> ChartEngine<R> {
    /// Creates an engine without data; the mount redraw is already pending.
    pub fn new(renderer: R, config: ChartEngineConfig) -> ChartResult<Self> {
        config.validate()?;
        let timings = config.timings;
        let scheduler = RenderScheduler::new(config.viewport, timings.resize_settle_ms);
        let interaction = InteractionController::new(
            timings.tooltip_hide_ms,
            timings.event_tooltip_hide_ms,
            config.resolved_tooltip_placement(),
        );
        debug!(
            width = config.viewport.width,
            height = config.viewport.height,
            chart_kind = ?config.chart_kind,
            period = ?config.period,
            "chart engine created"
        );

        Ok(Self {
            renderer,
            period: config.period,
            raw: Vec::new(),
            transform: transform(&[], config.period, &IndexSet::new())?,
            donut: None,
            legend: LegendVisibilityController::default(),
            scheduler,
            interaction,
            events: EventOverlay::new(config.period, Vec::new()),
            event_records: Vec::new(),
            preaggregated_events: Vec::new(),
            callbacks: Box::new(NoopCallbacks),
            clock_ms: 0,
            destroyed: false,
            config,
        })
    }
}
