//! "Nice" y-axis tick generation and x-axis label thinning.

use smallvec::SmallVec;

use crate::core::types::{ColumnType, Period};

/// Default number of parts the value span is split into.
pub const DEFAULT_TICK_GRANULARITY: f64 = 4.0;
/// Fractional granularity used for percent-typed series.
pub const PERCENT_TICK_GRANULARITY: f64 = 0.04;

const NARROW_SPAN_MAX: f64 = 8.0;
const MEDIUM_SPAN_MAX: f64 = 15.0;
const TICK_LABEL_MIN_OFFSET_PX: f64 = 16.0;

pub type TickValues = SmallVec<[f64; 8]>;

/// Number of equal parts a span is divided into.
///
/// Spans in `(8, 15]` get 3 parts, spans `<= 8` get 2, anything wider
/// gets `default_parts`.
#[must_use]
pub fn tick_parts(span: f64, default_parts: f64) -> f64 {
    if span <= NARROW_SPAN_MAX {
        2.0
    } else if span <= MEDIUM_SPAN_MAX {
        3.0
    } else {
        default_parts
    }
}

/// Computes axis ticks for `[min, max]`.
///
/// The result always starts with `min` and ends with `max`. A fractional
/// `granularity` (percent series) is evaluated on values scaled by 100 and
/// the interior ticks are scaled back without rounding; otherwise interior
/// ticks are rounded to integers.
#[must_use]
pub fn compute_ticks(min: f64, max: f64, granularity: f64) -> TickValues {
    let fractional = granularity < 1.0;
    let scale = if fractional { 100.0 } else { 1.0 };
    let min_tick = min * scale;
    let max_tick = max * scale;
    let parts = tick_parts(max_tick - min_tick, (granularity * scale).round());

    let mut ticks = TickValues::new();
    ticks.push(min);
    if !fractional && max - min < parts {
        ticks.push(max);
        return ticks;
    }

    let part = (max_tick - min_tick) / parts;
    let mut previous = min_tick;
    // `parts` is one of a handful of small integers.
    for _ in 0..(parts as usize).saturating_sub(1) {
        let next = previous + part;
        previous = if fractional { next } else { next.round() };
        ticks.push(previous / scale);
    }
    ticks.push(max);
    ticks
}

/// Ticks for an axis displaying values of `column_type`.
///
/// Non-percent bounds are rounded to integers before splitting.
#[must_use]
pub fn axis_ticks(min: f64, max: f64, column_type: ColumnType) -> TickValues {
    if column_type == ColumnType::Percent {
        compute_ticks(min, max, PERCENT_TICK_GRANULARITY)
    } else {
        compute_ticks(min.round(), max.round(), DEFAULT_TICK_GRANULARITY)
    }
}

/// Stride for x-axis labels: 0 when every label fits, otherwise only every
/// `stride`-th label is shown.
#[must_use]
pub fn label_stride(width_px: f64, tick_count: usize, period: Period) -> usize {
    let slot = period.tick_label_width_px() + TICK_LABEL_MIN_OFFSET_PX;
    let fit = (width_px / slot).round().max(1.0) as usize;
    if tick_count < fit {
        return 0;
    }
    (tick_count as f64 / fit as f64).round() as usize
}
