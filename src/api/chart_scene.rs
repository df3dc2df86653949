use serde::{Deserialize, Serialize};

use crate::core::layout::stack_max;
use crate::core::ticks::{TickValues, axis_ticks};
use crate::core::value_scale::{resolve_y_floor, value_extent};
use crate::core::{
    ChartKind, ColumnType, DualAxisNormalization, TransformedSeries, Viewport, XScale,
    YDomainOptions, YScale, compute_x_scale, compute_y_scale,
};
use crate::error::ChartResult;

use super::PlotMargins;

/// Pixel rectangle the series are drawn into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotArea {
    /// Viewport minus margins; never narrower or shorter than one pixel.
    #[must_use]
    pub fn from_viewport(viewport: Viewport, margins: PlotMargins) -> Self {
        Self {
            left: margins.left,
            top: margins.top,
            width: (f64::from(viewport.width) - margins.left - margins.right).max(1.0),
            height: (f64::from(viewport.height) - margins.top - margins.bottom).max(1.0),
        }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// How secondary-axis values are placed vertically.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SecondaryPlacement {
    /// Line charts give the second axis its own scale over the plot height.
    Own(YScale),
    /// Bar and trend charts rescale secondary values into the primary range.
    Normalized(DualAxisNormalization),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecondaryAxis {
    pub column_type: ColumnType,
    /// Raw-value tick labels, computed from visible secondary metrics only.
    pub ticks: TickValues,
    pub placement: SecondaryPlacement,
}

impl SecondaryAxis {
    #[must_use]
    pub fn project(&self, value: f64, primary: &YScale) -> f64 {
        match self.placement {
            SecondaryPlacement::Own(scale) => scale.project(value),
            SecondaryPlacement::Normalized(normalization) => {
                primary.project(normalization.convert(value))
            }
        }
    }
}

/// Every scale needed for one redraw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartScales {
    pub x: XScale,
    pub primary: YScale,
    pub primary_column_type: ColumnType,
    pub primary_ticks: TickValues,
    pub secondary: Option<SecondaryAxis>,
}

impl ChartScales {
    /// Plot-relative y of `value` on the axis the owning series belongs to.
    #[must_use]
    pub fn project(&self, value: f64, is_primary_axis: bool) -> f64 {
        match (&self.secondary, is_primary_axis) {
            (Some(secondary), false) => secondary.project(value, &self.primary),
            _ => self.primary.project(value),
        }
    }
}

/// Computes the scales of a cartesian chart; radial charts have none.
///
/// The x domain covers hidden metrics too, so toggling the legend never
/// shifts the horizontal axis.
pub fn compute_scales(
    series: &TransformedSeries,
    chart_kind: ChartKind,
    area: &PlotArea,
) -> ChartResult<Option<ChartScales>> {
    if chart_kind.is_radial() {
        return Ok(None);
    }
    let x = compute_x_scale(series.all_keys(), area.width, series.period, chart_kind)?;

    let primary_series = series
        .axis_group(true)
        .or_else(|| series.filtered.first());
    let primary_column_type = primary_series.map_or(ColumnType::Plain, |group| group.column_type);
    let primary_values: Vec<Option<f64>> = primary_series
        .map(|group| group.values().collect())
        .unwrap_or_default();

    let primary = match chart_kind {
        ChartKind::Stack => {
            let groups: Vec<_> = series
                .grouped
                .iter()
                .filter(|group| group.is_primary_axis)
                .cloned()
                .collect();
            compute_y_scale(
                [Some(0.0), Some(stack_max(&groups))],
                area.height,
                YDomainOptions::from_zero(),
            )?
        }
        ChartKind::Bar => compute_y_scale(
            primary_values.iter().copied(),
            area.height,
            YDomainOptions::from_zero(),
        )?,
        _ => compute_y_scale(
            primary_values.iter().copied(),
            area.height,
            YDomainOptions::default(),
        )?,
    };
    let primary_ticks = axis_ticks(primary.min, primary.max, primary_column_type);

    let primary_is_secondary = primary_series.is_some_and(|group| !group.is_primary_axis);
    let secondary = match series.axis_group(false) {
        Some(group) if !primary_is_secondary => {
            secondary_axis(group.values(), group.column_type, chart_kind, &primary, area)?
        }
        _ => None,
    };

    Ok(Some(ChartScales {
        x,
        primary,
        primary_column_type,
        primary_ticks,
        secondary,
    }))
}

fn secondary_axis(
    values: impl IntoIterator<Item = Option<f64>>,
    column_type: ColumnType,
    chart_kind: ChartKind,
    primary: &YScale,
    area: &PlotArea,
) -> ChartResult<Option<SecondaryAxis>> {
    let values: Vec<Option<f64>> = values.into_iter().collect();
    let Some((data_min, data_max)) = value_extent(values.iter().copied()) else {
        return Ok(None);
    };
    let axis = match chart_kind {
        ChartKind::Linear | ChartKind::Area => {
            let scale = compute_y_scale(values, area.height, YDomainOptions::default())?;
            SecondaryAxis {
                column_type,
                ticks: axis_ticks(scale.min, scale.max, column_type),
                placement: SecondaryPlacement::Own(scale),
            }
        }
        _ => {
            let count_from_zero = matches!(chart_kind, ChartKind::Bar | ChartKind::Stack);
            let second_min = resolve_y_floor(data_min, data_max, count_from_zero);
            SecondaryAxis {
                column_type,
                ticks: axis_ticks(second_min, data_max, column_type),
                placement: SecondaryPlacement::Normalized(DualAxisNormalization::new(
                    (primary.min, primary.max),
                    (second_min, data_max),
                )),
            }
        }
    };
    Ok(Some(axis))
}
