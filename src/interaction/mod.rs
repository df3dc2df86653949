//! Transient pointer and legend state.

pub mod legend;
pub mod timer;
pub mod tooltip;

pub use legend::{
    DEFAULT_TOTAL_METRIC_NAME, DisabledMetricsState, LegendColumn, LegendData, LegendMetric,
    LegendTitle, LegendVisibilityController, ToggleOutcome, default_disabled_metrics,
};
pub use timer::{SettleTimer, TimerState};
pub use tooltip::{
    EventTooltipRow, EventTooltipState, HoverContext, InteractionController, TooltipPlacement,
    TooltipRow, TooltipSection, TooltipState, build_tooltip_sections, event_tooltip_left,
};
