use tracing::{debug, trace};

use crate::core::{DonutDataset, MetricSeries, Period, SeriesTransform, transform};
use crate::error::ChartResult;
use crate::interaction::{LegendData, LegendVisibilityController, ToggleOutcome};
use crate::render::Renderer;

use super::{ChartEngine, MetricToggler, PeriodChanger};

const VISIBLE_METRICS_DEPENDENCY: &str = "visible_metrics";

impl<R: Renderer> ChartEngine<R> {
    /// Replaces the raw series wholesale.
    ///
    /// Hidden metrics survive when the new legend has the same metrics;
    /// otherwise the default hidden set of the chart kind is applied. The
    /// engine state is left untouched when the data contains a malformed
    /// calendar date.
    pub fn set_data(&mut self, series: Vec<MetricSeries>) -> ChartResult<()> {
        if self.destroyed {
            return Ok(());
        }
        let legend_data = LegendData::from_series(&series);
        let same_metrics = legend_data
            .metrics()
            .map(|metric| metric.id.as_str())
            .eq(self.legend.legend().metrics().map(|metric| metric.id.as_str()));
        let legend = if same_metrics {
            let mut legend = self.legend.clone();
            legend.replace_legend(legend_data);
            legend
        } else {
            LegendVisibilityController::with_defaults(
                legend_data,
                self.config.chart_kind,
                &self.config.total_metric_name,
            )
        };

        let next = transform(&series, self.period, legend.disabled_ids())?;
        debug!(
            groups = series.len(),
            renderable = next.is_renderable(),
            hidden = legend.disabled_ids().len(),
            "set chart data"
        );
        self.raw = series;
        self.legend = legend;
        self.commit_transform(next)
    }

    /// Replaces the dataset drawn by donut charts.
    pub fn set_donut_data(&mut self, dataset: DonutDataset) {
        if self.destroyed {
            return;
        }
        trace!(rows = dataset.rows.len(), "set donut data");
        self.donut = Some(dataset);
        self.scheduler.request_redraw();
    }

    /// Switches the aggregation period and re-buckets the current data.
    pub fn set_period(&mut self, period: Period) -> ChartResult<()> {
        if self.destroyed || period == self.period {
            return Ok(());
        }
        let next = transform(&self.raw, period, self.legend.disabled_ids())?;
        debug!(from = ?self.period, to = ?period, "period changed");
        self.period = period;
        self.commit_transform(next)
    }

    /// Flips visibility of `metric_id` unless it is the last visible metric of its axis.
    ///
    /// A visibility change counts as a layout change and goes through the
    /// resize settle window, starting at `now_ms`, before the next redraw.
    /// A destroyed engine reports `Locked` and keeps its legend state.
    pub fn toggle_metric(&mut self, metric_id: &str, now_ms: u64) -> ChartResult<ToggleOutcome> {
        if self.destroyed {
            return Ok(ToggleOutcome::Locked);
        }
        self.clock_ms = self.clock_ms.max(now_ms);
        let outcome = self.legend.toggle(metric_id)?;
        if outcome == ToggleOutcome::Locked {
            return Ok(outcome);
        }
        let next = transform(&self.raw, self.period, self.legend.disabled_ids())?;
        self.transform = next;
        self.interaction.reset();
        self.callbacks.on_metric_toggle(metric_id);
        self.track_visible_metrics();
        self.scheduler.request_redraw();
        Ok(outcome)
    }

    fn commit_transform(&mut self, next: SeriesTransform) -> ChartResult<()> {
        if let SeriesTransform::Unrenderable { reason } = &next {
            debug!(%reason, period = ?self.period, "chart data not renderable");
        }
        self.transform = next;
        self.interaction.reset();
        self.rebuild_events()?;
        self.track_visible_metrics();
        self.scheduler.request_redraw();
        Ok(())
    }

    fn track_visible_metrics(&mut self) {
        let visible = self
            .legend
            .legend()
            .metrics()
            .filter(|metric| !self.legend.is_hidden(&metric.id))
            .count();
        self.scheduler.track_dependency(
            VISIBLE_METRICS_DEPENDENCY,
            visible as u64,
            self.clock_ms,
        );
    }
}

impl<R: Renderer> MetricToggler for ChartEngine<R> {
    fn toggle_metric(&mut self, metric_id: &str, now_ms: u64) -> ChartResult<ToggleOutcome> {
        ChartEngine::toggle_metric(self, metric_id, now_ms)
    }

    fn is_metric_hidden(&self, metric_id: &str) -> bool {
        self.legend.is_hidden(metric_id)
    }

    fn is_metric_locked(&self, metric_id: &str) -> bool {
        self.legend.is_locked(metric_id)
    }
}

impl<R: Renderer> PeriodChanger for ChartEngine<R> {
    fn period(&self) -> Period {
        self.period
    }

    fn change_period(&mut self, period: Period) -> ChartResult<()> {
        self.set_period(period)
    }
}
