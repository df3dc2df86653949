use serde::{Deserialize, Serialize};

use crate::core::{ChartKind, Period, ScaleKind, SeriesTransform, TemporalKey, Viewport};
use crate::error::ChartResult;
use crate::extensions::EventAnnotation;
use crate::interaction::{DisabledMetricsState, EventTooltipState, TooltipState};
use crate::render::Renderer;

use super::chart_scene::compute_scales;
use super::{ChartEngine, SchedulerState};

/// Axis state resolved for the current viewport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisSnapshot {
    pub x_kind: ScaleKind,
    pub x_ticks: Vec<TemporalKey>,
    pub y_domain: (f64, f64),
    pub y_ticks: Vec<f64>,
    #[serde(default)]
    pub secondary_ticks: Option<Vec<f64>>,
}

/// Serializable deterministic state snapshot used by regression tests and
/// debugging tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub viewport: Viewport,
    pub chart_kind: ChartKind,
    pub period: Period,
    pub scheduler_state: SchedulerState,
    pub redraw_count: u64,
    /// Why nothing is drawn, when the data does not fit the period.
    #[serde(default)]
    pub unrenderable_reason: Option<String>,
    #[serde(default)]
    pub axes: Option<AxisSnapshot>,
    pub disabled_metrics: DisabledMetricsState,
    pub tooltip: TooltipState,
    pub event_tooltip: EventTooltipState,
    pub annotations: Vec<EventAnnotation>,
}

impl<R: Renderer> ChartEngine<R> {
    pub fn snapshot(&self) -> ChartResult<EngineSnapshot> {
        let axes = match self.transform.as_renderable() {
            Some(series) => compute_scales(series, self.config.chart_kind, &self.plot_area())?
                .map(|scales| AxisSnapshot {
                    x_kind: scales.x.kind(),
                    x_ticks: scales.x.ticks(),
                    y_domain: (scales.primary.min, scales.primary.max),
                    y_ticks: scales.primary_ticks.to_vec(),
                    secondary_ticks: scales.secondary.map(|axis| axis.ticks.to_vec()),
                }),
            None => None,
        };
        let unrenderable_reason = match &self.transform {
            SeriesTransform::Unrenderable { reason } => Some(reason.clone()),
            SeriesTransform::Renderable(_) => None,
        };

        Ok(EngineSnapshot {
            viewport: self.scheduler.viewport(),
            chart_kind: self.config.chart_kind,
            period: self.period,
            scheduler_state: self.scheduler.state(),
            redraw_count: self.scheduler.redraw_count(),
            unrenderable_reason,
            axes,
            disabled_metrics: self.legend.state().clone(),
            tooltip: self.interaction.tooltip().clone(),
            event_tooltip: self.interaction.event_tooltip().clone(),
            annotations: self.events.annotations(),
        })
    }
}
