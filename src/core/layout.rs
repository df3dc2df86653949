//! Geometry rules for bars, stacks and donut slices.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::format::format_percent;
use crate::core::series_transform::KeyGroup;
use crate::core::types::{ColumnType, TemporalKey};

pub const BAR_MAX_WIDTH_PX: f64 = 24.0;
pub const BAR_MARGIN_PX: f64 = 4.0;
pub const STACK_MARGIN_PX: f64 = 12.0;
pub const STACK_MIN_WIDTH_PX: f64 = 24.0;
pub const STACK_MAX_WIDTH_PX: f64 = 150.0;

/// Horizontal placement of one bar relative to its bucket anchor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarSlot {
    pub offset_px: f64,
    pub width_px: f64,
}

/// Width of a bar for a chart with `bucket_count` buckets.
///
/// Several bars per bucket share half of the bucket; a single bar fills the
/// band. Widths below one pixel fall back to half the band.
#[must_use]
pub fn bar_width(
    plot_width: f64,
    bandwidth: f64,
    bucket_count: usize,
    bars_per_bucket: usize,
) -> f64 {
    let width = unclamped_bar_width(plot_width, bandwidth, bucket_count, bars_per_bucket);
    if width < 1.0 { bandwidth / 2.0 } else { width }
}

fn unclamped_bar_width(
    plot_width: f64,
    bandwidth: f64,
    bucket_count: usize,
    bars_per_bucket: usize,
) -> f64 {
    if bars_per_bucket > 1 && bucket_count > 0 {
        (plot_width / bucket_count as f64 / 2.0 - BAR_MARGIN_PX * 2.0).min(BAR_MAX_WIDTH_PX)
    } else {
        bandwidth
    }
}

/// Placement of the `index`-th of `bars_per_bucket` bars around the anchor.
///
/// Two bars sit on either side of the anchor; any other count is centred.
#[must_use]
pub fn bar_slot(
    plot_width: f64,
    bandwidth: f64,
    bucket_count: usize,
    bars_per_bucket: usize,
    index: usize,
) -> BarSlot {
    let raw = unclamped_bar_width(plot_width, bandwidth, bucket_count, bars_per_bucket);
    let width = bar_width(plot_width, bandwidth, bucket_count, bars_per_bucket);
    let margin = if raw < 1.0 { 1.0 } else { BAR_MARGIN_PX };
    let offset_px = if bars_per_bucket == 2 {
        if index == 0 { -(width + margin) } else { margin }
    } else {
        -width / 2.0
    };
    BarSlot {
        offset_px,
        width_px: width,
    }
}

/// Width of one stacked column, clamped to `[24, 150]`.
#[must_use]
pub fn stack_width(plot_width: f64, bucket_count: usize) -> f64 {
    if bucket_count == 0 {
        return STACK_MIN_WIDTH_PX;
    }
    (plot_width / bucket_count as f64 - STACK_MARGIN_PX * 2.0)
        .clamp(STACK_MIN_WIDTH_PX, STACK_MAX_WIDTH_PX)
}

/// One segment of a stacked column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackSegment {
    pub key: TemporalKey,
    pub series_id: String,
    pub color_index: usize,
    pub lower: f64,
    pub upper: f64,
}

/// Stacks all groups per key in group order; gaps contribute nothing.
#[must_use]
pub fn stack_segments(groups: &[KeyGroup]) -> Vec<StackSegment> {
    let mut tops: IndexMap<TemporalKey, f64> = IndexMap::new();
    let mut segments = Vec::new();
    for group in groups {
        for point in &group.points {
            let Some(value) = point.value else {
                continue;
            };
            let top = tops.entry(point.key).or_insert(0.0);
            segments.push(StackSegment {
                key: point.key,
                series_id: group.series_id.clone(),
                color_index: group.color_index,
                lower: *top,
                upper: *top + value,
            });
            *top += value;
        }
    }
    segments
}

/// Largest per-key sum, the upper bound of a stacked chart's y-domain.
#[must_use]
pub fn stack_max(groups: &[KeyGroup]) -> f64 {
    let mut sums: IndexMap<TemporalKey, f64> = IndexMap::new();
    for point in groups.iter().flat_map(|group| group.points.iter()) {
        *sums.entry(point.key).or_insert(0.0) += point.value.unwrap_or(0.0);
    }
    sums.values().copied().fold(0.0, f64::max)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonutColumn {
    pub name: String,
    #[serde(default, rename = "type")]
    pub column_type: ColumnType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonutRow {
    pub id: String,
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// Categorical dataset of donut charts: one slice per row, one ring per value column.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DonutDataset {
    pub columns: Vec<DonutColumn>,
    pub rows: Vec<DonutRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonutSlice {
    pub id: String,
    pub name: String,
    pub value: f64,
    pub percent: String,
    pub start_angle: f64,
    pub end_angle: f64,
    /// Placeholder slice drawn when every value is zero.
    pub is_placeholder: bool,
}

/// Lays out the slices of value column `column`.
///
/// Angles are in radians, clockwise from 12 o'clock. When the column sums
/// to zero the first row is drawn as a full placeholder ring.
#[must_use]
pub fn donut_slices(dataset: &DonutDataset, column: usize) -> Vec<DonutSlice> {
    let values: Vec<f64> = dataset
        .rows
        .iter()
        .map(|row| row.values.get(column).copied().flatten().unwrap_or(0.0))
        .collect();
    let sum: f64 = values.iter().sum();
    let is_empty = sum <= 0.0;
    let weights: Vec<f64> = if is_empty {
        (0..values.len())
            .map(|index| if index == 0 { 1.0 } else { 0.0 })
            .collect()
    } else {
        values.clone()
    };
    let total: f64 = weights.iter().sum();

    let mut angle = 0.0;
    dataset
        .rows
        .iter()
        .zip(values.iter().zip(&weights))
        .map(|(row, (value, weight))| {
            let sweep = if total > 0.0 {
                weight / total * std::f64::consts::TAU
            } else {
                0.0
            };
            let percent = if *value == 0.0 || is_empty {
                "0.00%".to_owned()
            } else {
                format_percent(value / sum)
            };
            let slice = DonutSlice {
                id: row.id.clone(),
                name: row.name.clone(),
                value: *value,
                percent,
                start_angle: angle,
                end_angle: angle + sweep,
                is_placeholder: is_empty,
            };
            angle += sweep;
            slice
        })
        .collect()
}
