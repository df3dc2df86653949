use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::scale::LinearScale;
use crate::error::ChartResult;

/// Share of the value span left empty below the lowest positive value.
pub const Y_FLOOR_INDENT_RATIO: f64 = 0.1;

/// Finite min/max of `values`, skipping gaps.
#[must_use]
pub fn value_extent(values: impl IntoIterator<Item = Option<f64>>) -> Option<(f64, f64)> {
    values
        .into_iter()
        .flatten()
        .filter(|value| value.is_finite())
        .fold(None, |extent, value| match extent {
            None => Some((value, value)),
            Some((min, max)) => Some((f64::min(min, value), f64::max(max, value))),
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct YDomainOptions {
    pub count_from_zero: bool,
    pub explicit_max: Option<f64>,
    pub explicit_min: Option<f64>,
}

impl YDomainOptions {
    #[must_use]
    pub fn from_zero() -> Self {
        Self {
            count_from_zero: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_explicit_bounds(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.explicit_min = min;
        self.explicit_max = max;
        self
    }
}

/// Vertical scale with its resolved domain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YScale {
    pub min: f64,
    pub max: f64,
    pub scale: LinearScale,
}

impl YScale {
    #[must_use]
    pub fn project(&self, value: f64) -> f64 {
        self.scale.project(value)
    }
}

/// Resolves the lower domain bound.
///
/// Collapsed or zero-based domains start at 0. A positive minimum is lowered
/// by 10% of the span and floored to an integer, clamping to 0 when the
/// indent would cross it. Negative minima are kept as they are.
#[must_use]
pub fn resolve_y_floor(min: f64, max: f64, count_from_zero: bool) -> f64 {
    if min == max || count_from_zero {
        return 0.0;
    }
    if min < 0.0 {
        return min;
    }
    let indented = min - Y_FLOOR_INDENT_RATIO * (max - min);
    if indented <= 0.0 { 0.0 } else { indented.floor() }
}

/// Computes the y-scale for `values` over a plot of `height` pixels.
///
/// Explicit bounds replace the data extent; missing data yields `[0, 0]`.
/// The range is inverted (`[height, 0]`) so larger values sit higher.
pub fn compute_y_scale(
    values: impl IntoIterator<Item = Option<f64>>,
    height: f64,
    options: YDomainOptions,
) -> ChartResult<YScale> {
    let extent = value_extent(values);
    let data_min = extent.map_or(0.0, |(min, _)| min);
    let data_max = extent.map_or(0.0, |(_, max)| max);
    let max = options.explicit_max.unwrap_or(data_max);
    let min = resolve_y_floor(
        options.explicit_min.unwrap_or(data_min),
        max,
        options.count_from_zero,
    );
    let scale = LinearScale::new((min, max), (height, 0.0))?;
    trace!(min, max, height, "computed y scale");
    Ok(YScale { min, max, scale })
}

/// Min-max rescaling of a secondary series into the primary value range.
///
/// Only vertical placement uses converted values; tooltips keep the raw ones.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DualAxisNormalization {
    pub first_min: f64,
    pub first_max: f64,
    pub second_min: f64,
    pub second_max: f64,
}

impl DualAxisNormalization {
    #[must_use]
    pub fn new(first: (f64, f64), second: (f64, f64)) -> Self {
        Self {
            first_min: first.0,
            first_max: first.1,
            second_min: second.0,
            second_max: second.1,
        }
    }

    /// Builds the normalization from both series' values; empty series count as `[0, 0]`.
    #[must_use]
    pub fn from_values(
        primary: impl IntoIterator<Item = Option<f64>>,
        secondary: impl IntoIterator<Item = Option<f64>>,
    ) -> Self {
        Self::new(
            value_extent(primary).unwrap_or((0.0, 0.0)),
            value_extent(secondary).unwrap_or((0.0, 0.0)),
        )
    }

    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.second_max == self.second_min
    }

    fn second_span(&self) -> f64 {
        if self.is_degenerate() {
            1.0
        } else {
            self.second_max - self.second_min
        }
    }

    #[must_use]
    pub fn convert(&self, value: f64) -> f64 {
        (value - self.second_min) / self.second_span() * (self.first_max - self.first_min)
            + self.first_min
    }

    /// Inverse of [`Self::convert`]; a collapsed primary range maps back to `second_min`.
    #[must_use]
    pub fn invert(&self, converted: f64) -> f64 {
        let first_span = self.first_max - self.first_min;
        if first_span == 0.0 {
            return self.second_min;
        }
        (converted - self.first_min) / first_span * self.second_span() + self.second_min
    }
}
