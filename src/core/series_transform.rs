use chrono::NaiveDate;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::temporal::{BucketIndex, period_mismatch, resolve_key};
use crate::core::types::{ColumnType, DataPoint, MetricSeries, Period, TemporalKey};
use crate::error::ChartResult;

/// One axis group after its raw dates were resolved to axis keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketedSeries {
    pub id: String,
    pub display_name: String,
    pub is_primary_axis: bool,
    pub column_type: ColumnType,
    pub unit: Option<String>,
    pub points: Vec<DataPoint>,
}

impl BucketedSeries {
    pub fn values(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        self.points.iter().map(|point| point.value)
    }

    /// Distinct metric ids of this group in first-seen order.
    #[must_use]
    pub fn metric_ids(&self) -> IndexSet<&str> {
        self.points
            .iter()
            .map(|point| point.series_id.as_str())
            .collect()
    }
}

/// Points of one metric, ready to be drawn as one line/bar series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyGroup {
    pub series_id: String,
    pub metric_name: String,
    pub axis_group_id: String,
    pub is_primary_axis: bool,
    pub column_type: ColumnType,
    /// Position of the metric inside its axis group, stable across legend toggles.
    pub color_index: usize,
    /// Forecast continuation drawn with a dashed stroke.
    pub dashed: bool,
    pub points: Vec<DataPoint>,
}

impl KeyGroup {
    #[must_use]
    pub fn value_at(&self, key: TemporalKey) -> Option<f64> {
        self.points
            .iter()
            .find(|point| point.key == key)
            .and_then(|point| point.value)
    }
}

/// Renderable output of [`transform`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformedSeries {
    pub period: Period,
    /// Every axis group with resolved keys, hidden metrics included.
    pub mapped: Vec<BucketedSeries>,
    /// `mapped` without points of hidden metrics.
    pub filtered: Vec<BucketedSeries>,
    pub grouped: Vec<KeyGroup>,
    pub bucket_index: BucketIndex,
}

impl TransformedSeries {
    /// Distinct keys of the visible points, in data order.
    #[must_use]
    pub fn keys(&self) -> IndexSet<TemporalKey> {
        self.filtered
            .iter()
            .flat_map(|series| series.points.iter().map(|point| point.key))
            .collect()
    }

    /// Distinct keys of all points, hidden metrics included.
    #[must_use]
    pub fn all_keys(&self) -> IndexSet<TemporalKey> {
        self.mapped
            .iter()
            .flat_map(|series| series.points.iter().map(|point| point.key))
            .collect()
    }

    #[must_use]
    pub fn axis_group(&self, is_primary_axis: bool) -> Option<&BucketedSeries> {
        self.filtered
            .iter()
            .find(|series| series.is_primary_axis == is_primary_axis)
    }

    #[must_use]
    pub fn has_secondary_axis(&self) -> bool {
        self.mapped.iter().any(|series| !series.is_primary_axis)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filtered.iter().all(|series| series.points.is_empty())
    }
}

/// Result of the transformation step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SeriesTransform {
    Renderable(TransformedSeries),
    /// The data cannot be placed on the active period's axis; nothing is drawn.
    Unrenderable { reason: String },
}

impl SeriesTransform {
    #[must_use]
    pub fn is_renderable(&self) -> bool {
        matches!(self, Self::Renderable(_))
    }

    #[must_use]
    pub fn as_renderable(&self) -> Option<&TransformedSeries> {
        match self {
            Self::Renderable(series) => Some(series),
            Self::Unrenderable { .. } => None,
        }
    }
}

/// Turns raw axis groups into bucketed, filtered and grouped series.
///
/// Pure function of its inputs. A date/period mismatch yields
/// [`SeriesTransform::Unrenderable`]; a malformed calendar date is an error.
pub fn transform(
    raw: &[MetricSeries],
    period: Period,
    disabled_metric_ids: &IndexSet<String>,
) -> ChartResult<SeriesTransform> {
    if let Some(reason) = raw
        .iter()
        .flat_map(|series| series.points.iter())
        .find_map(|point| period_mismatch(&point.date, period))
    {
        debug!(?period, %reason, "data does not match period, skipping render");
        return Ok(SeriesTransform::Unrenderable { reason });
    }

    let bucket_index = if period.is_bucketed() {
        BucketIndex::from_series(raw)?
    } else {
        BucketIndex::default()
    };

    let mapped = raw
        .iter()
        .map(|series| bucket_series(series, period, &bucket_index))
        .collect::<ChartResult<Vec<_>>>()?;

    let filtered: Vec<BucketedSeries> = mapped
        .iter()
        .map(|series| BucketedSeries {
            points: series
                .points
                .iter()
                .filter(|point| !disabled_metric_ids.contains(&point.series_id))
                .cloned()
                .collect(),
            ..series.clone()
        })
        .collect();

    let grouped = mapped
        .iter()
        .zip(&filtered)
        .flat_map(|(all, visible)| group_by_metric(all, visible))
        .collect();

    debug!(
        ?period,
        groups = mapped.len(),
        disabled = disabled_metric_ids.len(),
        "transformed series"
    );
    Ok(SeriesTransform::Renderable(TransformedSeries {
        period,
        mapped,
        filtered,
        grouped,
        bucket_index,
    }))
}

fn bucket_series(
    series: &MetricSeries,
    period: Period,
    bucket_index: &BucketIndex,
) -> ChartResult<BucketedSeries> {
    let points = series
        .points
        .iter()
        .map(|point| {
            Ok(DataPoint {
                key: resolve_key(&point.date, period, bucket_index)?,
                value: point.value.filter(|value| value.is_finite()),
                series_id: point.series_id.clone(),
                metric_name: point.metric_name.clone(),
            })
        })
        .collect::<ChartResult<Vec<_>>>()?;

    Ok(BucketedSeries {
        id: series.id.clone(),
        display_name: series.display_name.clone(),
        is_primary_axis: series.is_primary_axis,
        column_type: series.column_type,
        unit: series.unit.clone(),
        points,
    })
}

fn group_by_metric(all: &BucketedSeries, visible: &BucketedSeries) -> Vec<KeyGroup> {
    let color_slots = all.metric_ids();
    let mut groups: IndexMap<&str, KeyGroup> = IndexMap::new();
    for point in &visible.points {
        groups
            .entry(point.series_id.as_str())
            .or_insert_with(|| KeyGroup {
                series_id: point.series_id.clone(),
                metric_name: point.metric_name.clone(),
                axis_group_id: visible.id.clone(),
                is_primary_axis: visible.is_primary_axis,
                column_type: visible.column_type,
                color_index: color_slots
                    .get_index_of(point.series_id.as_str())
                    .unwrap_or_default(),
                dashed: false,
                points: Vec::new(),
            })
            .points
            .push(point.clone());
    }
    groups.into_values().collect()
}

/// Splits daily groups at `forecast_start` into an actual and a dashed forecast part.
///
/// The actual part keeps values up to and including the start date, the
/// forecast part keeps values from the start date on, so both lines meet.
/// Groups without points after the start are returned unchanged.
#[must_use]
pub fn split_forecast(groups: &[KeyGroup], forecast_start: NaiveDate) -> Vec<KeyGroup> {
    let mut result = Vec::with_capacity(groups.len() * 2);
    for group in groups {
        let has_forecast = group.points.iter().any(|point| match point.key {
            TemporalKey::Date(date) => date > forecast_start,
            _ => false,
        });
        if !has_forecast {
            result.push(group.clone());
            continue;
        }

        let keep_where = |keep: fn(NaiveDate, NaiveDate) -> bool| -> Vec<DataPoint> {
            group
                .points
                .iter()
                .map(|point| match point.key {
                    TemporalKey::Date(date) if !keep(date, forecast_start) => DataPoint {
                        value: None,
                        ..point.clone()
                    },
                    _ => point.clone(),
                })
                .collect()
        };

        result.push(KeyGroup {
            points: keep_where(|date, start| date <= start),
            ..group.clone()
        });
        result.push(KeyGroup {
            points: keep_where(|date, start| date >= start),
            dashed: true,
            ..group.clone()
        });
    }
    result
}
