use crate::core::Period;
use crate::error::ChartResult;
use crate::interaction::ToggleOutcome;

/// Legend-facing capability: hide or show one metric.
pub trait MetricToggler {
    /// Flips `metric_id`; `now_ms` starts the layout settle window.
    fn toggle_metric(&mut self, metric_id: &str, now_ms: u64) -> ChartResult<ToggleOutcome>;

    fn is_metric_hidden(&self, metric_id: &str) -> bool;

    /// Whether the legend control for `metric_id` must be disabled.
    fn is_metric_locked(&self, metric_id: &str) -> bool;
}

/// Toolbar-facing capability: switch the aggregation period.
pub trait PeriodChanger {
    fn period(&self) -> Period;

    fn change_period(&mut self, period: Period) -> ChartResult<()>;
}

/// Notifications delivered to the host application.
///
/// Every method defaults to a no-op so hosts implement only what they use.
pub trait ChartCallbacks {
    fn on_event_click(&mut self, _event_id: u64) {}

    fn on_metric_toggle(&mut self, _metric_id: &str) {}
}

/// Callbacks that ignore every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCallbacks;

impl ChartCallbacks for NoopCallbacks {}
