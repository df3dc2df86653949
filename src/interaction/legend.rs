use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

use crate::core::{ChartKind, ColumnType, MetricSeries};
use crate::error::{ChartError, ChartResult};

/// Legend row name that marks an aggregated total.
pub const DEFAULT_TOTAL_METRIC_NAME: &str = "Итого";

const DEFAULT_HIDDEN_TAIL_LEN: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendMetric {
    pub id: String,
    pub name: String,
    pub is_primary_axis: bool,
}

/// One legend row: a metric with its primary entry and optional secondary-axis twin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendColumn {
    pub column_name: String,
    pub metrics: SmallVec<[LegendMetric; 2]>,
}

impl LegendColumn {
    #[must_use]
    pub fn primary_id(&self) -> Option<&str> {
        self.metrics.first().map(|metric| metric.id.as_str())
    }

    #[must_use]
    pub fn secondary_id(&self) -> Option<&str> {
        self.metrics.get(1).map(|metric| metric.id.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendTitle {
    pub name: String,
    pub column_type: ColumnType,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LegendData {
    pub titles: Vec<LegendTitle>,
    pub columns: Vec<LegendColumn>,
}

impl LegendData {
    /// Builds rows from the first axis group, pairing each metric with the
    /// metric at the same position in the second group.
    #[must_use]
    pub fn from_series(series: &[MetricSeries]) -> Self {
        let groups: Vec<Vec<LegendMetric>> = series
            .iter()
            .map(|group| {
                let mut seen = IndexSet::new();
                group
                    .points
                    .iter()
                    .filter(|point| seen.insert(point.series_id.as_str()))
                    .map(|point| LegendMetric {
                        id: point.series_id.clone(),
                        name: point.metric_name.clone(),
                        is_primary_axis: group.is_primary_axis,
                    })
                    .collect()
            })
            .collect();

        let titles = series
            .iter()
            .map(|group| LegendTitle {
                name: group.display_name.clone(),
                column_type: group.column_type,
            })
            .collect();

        let columns = groups
            .first()
            .map(|first| {
                first
                    .iter()
                    .enumerate()
                    .map(|(index, metric)| {
                        let mut metrics = SmallVec::new();
                        metrics.push(metric.clone());
                        if let Some(twin) = groups.get(1).and_then(|second| second.get(index)) {
                            metrics.push(twin.clone());
                        }
                        LegendColumn {
                            column_name: metric.name.clone(),
                            metrics,
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self { titles, columns }
    }

    pub fn metrics(&self) -> impl Iterator<Item = &LegendMetric> + '_ {
        self.columns.iter().flat_map(|column| column.metrics.iter())
    }

    #[must_use]
    pub fn metric(&self, metric_id: &str) -> Option<&LegendMetric> {
        self.metrics().find(|metric| metric.id == metric_id)
    }
}

/// Metrics hidden by default for a freshly loaded legend.
///
/// Area and trend charts show everything. A five-row legend hides its last
/// two rows; otherwise a trailing total row is hidden. Secondary-axis twins
/// follow their rows.
#[must_use]
pub fn default_disabled_metrics(
    legend: &LegendData,
    chart_kind: ChartKind,
    total_metric_name: &str,
) -> IndexSet<String> {
    let mut hidden = IndexSet::new();
    if matches!(chart_kind, ChartKind::Area | ChartKind::Trend) {
        return hidden;
    }
    let columns = &legend.columns;
    let tail = if columns.len() == DEFAULT_HIDDEN_TAIL_LEN {
        &columns[columns.len() - 2..]
    } else if columns.len() > 1
        && columns
            .last()
            .is_some_and(|column| column.column_name == total_metric_name)
    {
        &columns[columns.len() - 1..]
    } else {
        return hidden;
    };
    for column in tail.iter().rev() {
        hidden.extend(column.primary_id().map(str::to_owned));
    }
    for column in tail.iter().rev() {
        hidden.extend(column.secondary_id().map(str::to_owned));
    }
    hidden
}

/// Hidden metric ids and the most recent toggle.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DisabledMetricsState {
    pub metric_ids: IndexSet<String>,
    pub last_toggled_id: Option<String>,
    /// Legend row of the last toggled metric.
    pub last_toggled_index: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToggleOutcome {
    Hidden,
    Shown,
    /// The metric is the last visible one of its axis group and stays visible.
    Locked,
}

/// Owner of [`DisabledMetricsState`].
///
/// At least one metric per axis group stays visible: the control of the
/// last visible metric is reported as locked and toggling it is refused.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LegendVisibilityController {
    legend: LegendData,
    state: DisabledMetricsState,
}

impl LegendVisibilityController {
    #[must_use]
    pub fn new(legend: LegendData) -> Self {
        Self {
            legend,
            state: DisabledMetricsState::default(),
        }
    }

    /// Starts from [`default_disabled_metrics`], never hiding a whole axis group.
    #[must_use]
    pub fn with_defaults(
        legend: LegendData,
        chart_kind: ChartKind,
        total_metric_name: &str,
    ) -> Self {
        let defaults = default_disabled_metrics(&legend, chart_kind, total_metric_name);
        let mut controller = Self::new(legend);
        for metric_id in defaults {
            if !controller.is_locked(&metric_id) {
                controller.state.metric_ids.insert(metric_id);
            }
        }
        controller
    }

    #[must_use]
    pub fn legend(&self) -> &LegendData {
        &self.legend
    }

    #[must_use]
    pub fn state(&self) -> &DisabledMetricsState {
        &self.state
    }

    #[must_use]
    pub fn disabled_ids(&self) -> &IndexSet<String> {
        &self.state.metric_ids
    }

    #[must_use]
    pub fn is_hidden(&self, metric_id: &str) -> bool {
        self.state.metric_ids.contains(metric_id)
    }

    /// Number of visible metrics on the given axis.
    #[must_use]
    pub fn visible_count(&self, is_primary_axis: bool) -> usize {
        self.legend
            .metrics()
            .filter(|metric| metric.is_primary_axis == is_primary_axis)
            .filter(|metric| !self.is_hidden(&metric.id))
            .count()
    }

    #[must_use]
    pub fn is_locked(&self, metric_id: &str) -> bool {
        match self.legend.metric(metric_id) {
            Some(metric) => {
                !self.is_hidden(metric_id) && self.visible_count(metric.is_primary_axis) <= 1
            }
            None => false,
        }
    }

    pub fn toggle(&mut self, metric_id: &str) -> ChartResult<ToggleOutcome> {
        let Some(index) = self
            .legend
            .columns
            .iter()
            .position(|column| column.metrics.iter().any(|metric| metric.id == metric_id))
        else {
            return Err(ChartError::UnknownMetric {
                metric_id: metric_id.to_owned(),
            });
        };

        if self.is_locked(metric_id) {
            debug!(metric_id, "legend toggle refused for last visible metric");
            return Ok(ToggleOutcome::Locked);
        }

        let outcome = if self.state.metric_ids.shift_remove(metric_id) {
            ToggleOutcome::Shown
        } else {
            self.state.metric_ids.insert(metric_id.to_owned());
            ToggleOutcome::Hidden
        };
        self.state.last_toggled_id = Some(metric_id.to_owned());
        self.state.last_toggled_index = Some(index);
        debug!(metric_id, ?outcome, hidden = self.state.metric_ids.len(), "legend toggled");
        Ok(outcome)
    }

    /// Replaces the legend, keeping hidden ids that still exist.
    pub fn replace_legend(&mut self, legend: LegendData) {
        self.state
            .metric_ids
            .retain(|metric_id| legend.metric(metric_id).is_some());
        self.legend = legend;
    }

    pub fn reset(&mut self) {
        self.state = DisabledMetricsState::default();
    }
}
