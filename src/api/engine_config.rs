use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::{ChartKind, PaletteVariant, Period, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{DEFAULT_TOTAL_METRIC_NAME, TooltipPlacement};

/// Space reserved around the plot area for axes and labels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotMargins {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Default for PlotMargins {
    fn default() -> Self {
        Self {
            left: 58.0,
            right: 58.0,
            top: 0.0,
            bottom: 100.0,
        }
    }
}

/// Debounce windows in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineTimings {
    pub resize_settle_ms: u64,
    pub tooltip_hide_ms: u64,
    pub event_tooltip_hide_ms: u64,
}

impl Default for EngineTimings {
    fn default() -> Self {
        Self {
            resize_settle_ms: 400,
            tooltip_hide_ms: 50,
            event_tooltip_hide_ms: 400,
        }
    }
}

/// Public engine bootstrap configuration.
///
/// Serializable so host applications can persist chart setup next to their
/// dashboard layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartEngineConfig {
    pub viewport: Viewport,
    #[serde(default = "default_chart_kind")]
    pub chart_kind: ChartKind,
    #[serde(default)]
    pub period: Period,
    #[serde(default)]
    pub margins: PlotMargins,
    #[serde(default)]
    pub timings: EngineTimings,
    /// Overrides the placement derived from `chart_kind`.
    #[serde(default)]
    pub tooltip_placement: Option<TooltipPlacement>,
    #[serde(default)]
    pub palette: PaletteVariant,
    #[serde(default = "default_currency_unit")]
    pub currency_unit: String,
    #[serde(default = "default_total_metric_name")]
    pub total_metric_name: String,
    #[serde(default)]
    pub forecast_start: Option<NaiveDate>,
    #[serde(default = "default_show_events")]
    pub show_events: bool,
}

impl ChartEngineConfig {
    #[must_use]
    pub fn new(viewport: Viewport, chart_kind: ChartKind) -> Self {
        Self {
            viewport,
            chart_kind,
            period: Period::default(),
            margins: PlotMargins::default(),
            timings: EngineTimings::default(),
            tooltip_placement: None,
            palette: PaletteVariant::default(),
            currency_unit: default_currency_unit(),
            total_metric_name: default_total_metric_name(),
            forecast_start: None,
            show_events: default_show_events(),
        }
    }

    #[must_use]
    pub fn with_period(mut self, period: Period) -> Self {
        self.period = period;
        self
    }

    #[must_use]
    pub fn with_margins(mut self, margins: PlotMargins) -> Self {
        self.margins = margins;
        self
    }

    #[must_use]
    pub fn with_timings(mut self, timings: EngineTimings) -> Self {
        self.timings = timings;
        self
    }

    #[must_use]
    pub fn with_tooltip_placement(mut self, placement: TooltipPlacement) -> Self {
        self.tooltip_placement = Some(placement);
        self
    }

    #[must_use]
    pub fn with_palette(mut self, palette: PaletteVariant) -> Self {
        self.palette = palette;
        self
    }

    #[must_use]
    pub fn with_currency_unit(mut self, unit: impl Into<String>) -> Self {
        self.currency_unit = unit.into();
        self
    }

    #[must_use]
    pub fn with_total_metric_name(mut self, name: impl Into<String>) -> Self {
        self.total_metric_name = name.into();
        self
    }

    /// Splits daily lines into actual and dashed forecast parts at `date`.
    #[must_use]
    pub fn with_forecast_start(mut self, date: NaiveDate) -> Self {
        self.forecast_start = Some(date);
        self
    }

    #[must_use]
    pub fn with_show_events(mut self, show_events: bool) -> Self {
        self.show_events = show_events;
        self
    }

    /// Placement in effect: the explicit override or the chart kind preset.
    #[must_use]
    pub fn resolved_tooltip_placement(&self) -> TooltipPlacement {
        self.tooltip_placement
            .unwrap_or_else(|| TooltipPlacement::for_chart(self.chart_kind))
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }
        let timings = self.timings;
        if timings.resize_settle_ms == 0
            || timings.tooltip_hide_ms == 0
            || timings.event_tooltip_hide_ms == 0
        {
            return Err(ChartError::InvalidConfig(
                "debounce windows must be > 0 ms".to_owned(),
            ));
        }
        let margins = self.margins;
        if [margins.left, margins.right, margins.top, margins.bottom]
            .iter()
            .any(|value| !value.is_finite() || *value < 0.0)
        {
            return Err(ChartError::InvalidConfig(
                "plot margins must be finite and >= 0".to_owned(),
            ));
        }
        Ok(())
    }

    /// Serializes config to pretty JSON for debug/config files.
    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidConfig(format!("failed to serialize config: {e}")))
    }

    /// Deserializes and validates config from JSON.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidConfig(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }
}

fn default_chart_kind() -> ChartKind {
    ChartKind::Linear
}

fn default_currency_unit() -> String {
    "р".to_owned()
}

fn default_total_metric_name() -> String {
    DEFAULT_TOTAL_METRIC_NAME.to_owned()
}

fn default_show_events() -> bool {
    true
}
