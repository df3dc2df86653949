use indexmap::IndexMap;
use tracing::trace;

use crate::core::format::{format_axis_tick, format_trend_tick};
use crate::core::layout::{bar_slot, stack_segments, stack_width};
use crate::core::palette::{area_fill_color, event_color, trend_fill_color};
use crate::core::ticks::label_stride;
use crate::core::{
    ChartKind, DonutDataset, KeyGroup, PaletteVariant, Period, TemporalKey, TransformedSeries,
    Viewport, donut_slices, format_x_tick, series_color, split_forecast,
};
use crate::error::ChartResult;
use crate::extensions::{EventMarker, EventOverlay, period_supports_events};
use crate::interaction::TooltipState;
use crate::render::{
    ArcPrimitive, CirclePrimitive, Color, LinePrimitive, LineStrokeStyle, PathPrimitive,
    RectPrimitive, RenderFrame, RenderMode, TextHAlign, TextPrimitive,
};

use super::chart_scene::{ChartScales, PlotArea, compute_scales};
use super::ChartEngineConfig;

const GRID_COLOR: Color = Color::rgb(0.898, 0.906, 0.918);
const LABEL_COLOR: Color = Color::rgb(0.459, 0.490, 0.529);
const GUIDE_COLOR: Color = Color::rgb(0.694, 0.718, 0.749);
const PLACEHOLDER_COLOR: Color = Color::rgb(0.949, 0.953, 0.957);
const MARKER_TEXT_COLOR: Color = Color::rgb(1.0, 1.0, 1.0);

const LABEL_FONT_PX: f64 = 12.0;
const AXIS_LABEL_GAP_PX: f64 = 8.0;
const X_LABEL_OFFSET_PX: f64 = 20.0;
const EVENT_MARKER_OFFSET_PX: f64 = 44.0;
const EVENT_MARKER_RADIUS_PX: f64 = 8.0;
const SERIES_STROKE_PX: f64 = 2.0;
const POINT_RADIUS_PX: f64 = 2.0;
const HOVER_POINT_RADIUS_PX: f64 = 4.0;
const SPINNER_RADIUS_PX: f64 = 12.0;
const DONUT_PADDING_PX: f64 = 10.0;
const DONUT_INNER_RATIO: f64 = 0.6;
const DONUT_LABEL_MIN_SWEEP: f64 = 0.3;

/// Everything a frame is derived from.
#[derive(Debug, Clone, Copy)]
pub struct FrameInputs<'a> {
    pub viewport: Viewport,
    pub config: &'a ChartEngineConfig,
    /// `None` when the data could not be placed on the period's axis.
    pub series: Option<&'a TransformedSeries>,
    pub donut: Option<&'a DonutDataset>,
    pub events: &'a EventOverlay,
    pub tooltip: &'a TooltipState,
    pub mode: RenderMode,
    pub is_loading: bool,
}

/// Builds the declarative draw commands for one redraw.
pub fn build_render_frame(inputs: &FrameInputs<'_>) -> ChartResult<RenderFrame> {
    let frame = RenderFrame::new(inputs.viewport).with_mode(inputs.mode);
    let area = PlotArea::from_viewport(inputs.viewport, inputs.config.margins);
    if inputs.is_loading {
        return Ok(loading_placeholder(frame, &area));
    }
    if inputs.config.chart_kind.is_radial() {
        return match inputs.donut {
            Some(dataset) => push_donut(frame, inputs, dataset),
            None => Ok(frame),
        };
    }
    let Some(series) = inputs.series else {
        trace!("no renderable series, emitting empty frame");
        return Ok(frame);
    };
    let Some(scales) = compute_scales(series, inputs.config.chart_kind, &area)? else {
        return Ok(frame);
    };

    let mut builder = FrameBuilder {
        frame,
        inputs,
        series,
        scales: &scales,
        area,
        palette: inputs.config.palette,
    };
    builder.push_y_axes();
    builder.push_x_axis();
    match inputs.config.chart_kind {
        ChartKind::Bar => {
            builder.push_bars()?;
            builder.push_lines(false, false)?;
        }
        ChartKind::Stack => builder.push_stacks()?,
        ChartKind::Area | ChartKind::Trend => builder.push_lines(true, true)?,
        _ => builder.push_lines(true, false)?,
    }
    builder.push_event_markers()?;
    builder.push_tooltip_markers()?;
    trace!(
        primitives = builder.frame.primitive_count(),
        mode = ?inputs.mode,
        "built render frame"
    );
    Ok(builder.frame)
}

fn loading_placeholder(frame: RenderFrame, area: &PlotArea) -> RenderFrame {
    let placeholder =
        RectPrimitive::new(area.left, area.top, area.width, area.height, PLACEHOLDER_COLOR)
            .with_id("loading");
    let mut frame = frame.loading().with_rect(placeholder);
    frame.circles.push(CirclePrimitive::new(
        area.left + area.width / 2.0,
        area.top + area.height / 2.0,
        SPINNER_RADIUS_PX,
        GUIDE_COLOR,
    ));
    frame
}

fn push_donut(
    mut frame: RenderFrame,
    inputs: &FrameInputs<'_>,
    dataset: &DonutDataset,
) -> ChartResult<RenderFrame> {
    let cx = f64::from(inputs.viewport.width) / 2.0;
    let cy = f64::from(inputs.viewport.height) / 2.0;
    let radius = (cx.min(cy) - DONUT_PADDING_PX).max(1.0);
    let rings: Vec<(usize, f64, f64)> = if inputs.config.chart_kind == ChartKind::DoubleDonut {
        vec![(0, radius * 0.75, radius), (1, radius * 0.45, radius * 0.7)]
    } else {
        vec![(0, radius * DONUT_INNER_RATIO, radius)]
    };

    for (column, inner_radius, outer_radius) in rings {
        for (index, slice) in donut_slices(dataset, column).iter().enumerate() {
            if slice.end_angle <= slice.start_angle {
                continue;
            }
            let fill_color = if slice.is_placeholder {
                PLACEHOLDER_COLOR
            } else {
                Color::from_palette(series_color(index, true, inputs.config.palette))?
            };
            frame.arcs.push(ArcPrimitive {
                cx,
                cy,
                inner_radius,
                outer_radius,
                start_angle: slice.start_angle,
                end_angle: slice.end_angle,
                fill_color,
                id: Some(slice.id.clone()),
            });
            if column == 0
                && !slice.is_placeholder
                && slice.end_angle - slice.start_angle >= DONUT_LABEL_MIN_SWEEP
            {
                let middle = (slice.start_angle + slice.end_angle) / 2.0;
                let label_radius = (inner_radius + outer_radius) / 2.0;
                frame.texts.push(TextPrimitive::new(
                    slice.percent.clone(),
                    cx + label_radius * middle.sin(),
                    cy - label_radius * middle.cos(),
                    LABEL_FONT_PX,
                    MARKER_TEXT_COLOR,
                    TextHAlign::Center,
                ));
            }
        }
    }
    Ok(frame)
}

struct FrameBuilder<'a> {
    frame: RenderFrame,
    inputs: &'a FrameInputs<'a>,
    series: &'a TransformedSeries,
    scales: &'a ChartScales,
    area: PlotArea,
    palette: PaletteVariant,
}

impl FrameBuilder<'_> {
    fn x(&self, key: TemporalKey) -> Option<f64> {
        self.scales.x.anchor(key).map(|anchor| self.area.left + anchor)
    }

    fn y(&self, value: f64, is_primary_axis: bool) -> f64 {
        self.area.top + self.scales.project(value, is_primary_axis)
    }

    fn is_trend(&self) -> bool {
        self.inputs.config.chart_kind == ChartKind::Trend
    }

    fn push_y_axes(&mut self) {
        let primary_type = self.scales.primary_column_type;
        for tick in self.scales.primary_ticks.clone() {
            let y = self.area.top + self.scales.primary.project(tick);
            self.frame.lines.push(LinePrimitive::new(
                self.area.left,
                y,
                self.area.right(),
                y,
                1.0,
                GRID_COLOR,
            ));
            let label = if self.is_trend() {
                format_trend_tick(tick)
            } else {
                format_axis_tick(tick, primary_type)
            };
            self.frame.texts.push(TextPrimitive::new(
                label,
                self.area.left - AXIS_LABEL_GAP_PX,
                y,
                LABEL_FONT_PX,
                LABEL_COLOR,
                TextHAlign::Right,
            ));
        }

        let Some(secondary) = &self.scales.secondary else {
            return;
        };
        for tick in secondary.ticks.iter().copied() {
            let y = self.area.top + secondary.project(tick, &self.scales.primary);
            let label = if self.is_trend() {
                format_trend_tick(tick)
            } else {
                format_axis_tick(tick, secondary.column_type)
            };
            self.frame.texts.push(TextPrimitive::new(
                label,
                self.area.right() + AXIS_LABEL_GAP_PX,
                y,
                LABEL_FONT_PX,
                LABEL_COLOR,
                TextHAlign::Left,
            ));
        }
    }

    fn push_x_axis(&mut self) {
        let bottom = self.area.bottom();
        self.frame.lines.push(LinePrimitive::new(
            self.area.left,
            bottom,
            self.area.right(),
            bottom,
            1.0,
            GRID_COLOR,
        ));
        let ticks = self.scales.x.ticks();
        let stride = label_stride(self.area.width, ticks.len(), self.series.period);
        for (index, key) in ticks.into_iter().enumerate() {
            if stride > 0 && index % stride != 0 {
                continue;
            }
            let Some(x) = self.x(key) else {
                continue;
            };
            let label = format_x_tick(key, self.series.period, &self.series.bucket_index);
            if label.is_empty() {
                continue;
            }
            self.frame.texts.push(TextPrimitive::new(
                label,
                x,
                bottom + X_LABEL_OFFSET_PX,
                LABEL_FONT_PX,
                LABEL_COLOR,
                TextHAlign::Center,
            ));
        }
    }

    fn line_groups(&self) -> Vec<KeyGroup> {
        match self.inputs.config.forecast_start {
            Some(start) if self.series.period == Period::Day => {
                split_forecast(&self.series.grouped, start)
            }
            _ => self.series.grouped.clone(),
        }
    }

    /// Draws line groups; bar charts only draw their secondary axis as lines.
    fn push_lines(&mut self, include_primary: bool, fill: bool) -> ChartResult<()> {
        for group in self.line_groups() {
            if group.is_primary_axis && !include_primary {
                continue;
            }
            let stroke = Color::from_palette(series_color(
                group.color_index,
                group.is_primary_axis,
                self.palette,
            ))?;
            let fill_color = if !fill {
                None
            } else if self.is_trend() {
                let slot = usize::from(!group.is_primary_axis);
                Some(Color::from_palette(trend_fill_color(slot))?)
            } else {
                Some(Color::from_palette(area_fill_color(group.color_index, self.palette))?)
            };
            let style = if group.dashed {
                LineStrokeStyle::Dashed
            } else {
                LineStrokeStyle::Solid
            };

            for segment in self.segments(&group) {
                if let Some(fill_color) = fill_color {
                    self.frame.paths.push(self.area_polygon(&segment, fill_color, &group));
                }
                if let [(x, y)] = segment.as_slice() {
                    self.frame
                        .circles
                        .push(CirclePrimitive::new(*x, *y, POINT_RADIUS_PX, stroke));
                }
                self.frame.paths.push(
                    PathPrimitive::stroked(segment, stroke, SERIES_STROKE_PX)
                        .with_stroke_style(style)
                        .with_id(group.series_id.clone()),
                );
            }
        }
        Ok(())
    }

    /// Splits a group into continuous runs; gaps end a run.
    fn segments(&self, group: &KeyGroup) -> Vec<Vec<(f64, f64)>> {
        let mut points = group.points.clone();
        points.sort_by_key(|point| point.key);
        let mut segments = Vec::new();
        let mut current = Vec::new();
        for point in points {
            match (self.x(point.key), point.value) {
                (Some(x), Some(value)) => current.push((x, self.y(value, group.is_primary_axis))),
                _ => {
                    if !current.is_empty() {
                        segments.push(std::mem::take(&mut current));
                    }
                }
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }
        segments
    }

    fn area_polygon(
        &self,
        segment: &[(f64, f64)],
        color: Color,
        group: &KeyGroup,
    ) -> PathPrimitive {
        let baseline = self.area.bottom();
        let mut polygon = segment.to_vec();
        if let (Some((last_x, _)), Some((first_x, _))) = (segment.last(), segment.first()) {
            polygon.push((*last_x, baseline));
            polygon.push((*first_x, baseline));
        }
        PathPrimitive::filled(polygon, color).with_id(format!("{}-fill", group.series_id))
    }

    fn push_bars(&mut self) -> ChartResult<()> {
        let groups: Vec<&KeyGroup> = self
            .series
            .grouped
            .iter()
            .filter(|group| group.is_primary_axis)
            .collect();
        let bucket_count = self.scales.x.ticks().len();
        let bandwidth = self.scales.x.band_width();
        let zero = self.y(self.scales.primary.min.max(0.0), true);
        for (index, group) in groups.iter().enumerate() {
            let slot = bar_slot(self.area.width, bandwidth, bucket_count, groups.len(), index);
            let color = Color::from_palette(series_color(group.color_index, true, self.palette))?;
            for point in &group.points {
                let (Some(x), Some(value)) = (self.x(point.key), point.value) else {
                    continue;
                };
                let y = self.y(value, true);
                self.frame.rects.push(
                    RectPrimitive::new(
                        x + slot.offset_px,
                        y.min(zero),
                        slot.width_px,
                        (zero - y).abs(),
                        color,
                    )
                    .with_id(format!("{}-{}", group.series_id, point.key)),
                );
            }
        }
        Ok(())
    }

    fn push_stacks(&mut self) -> ChartResult<()> {
        let groups: Vec<KeyGroup> = self
            .series
            .grouped
            .iter()
            .filter(|group| group.is_primary_axis)
            .cloned()
            .collect();
        let width = stack_width(self.area.width, self.scales.x.ticks().len());
        for segment in stack_segments(&groups) {
            let Some(x) = self.x(segment.key) else {
                continue;
            };
            let top = self.y(segment.upper, true);
            let bottom = self.y(segment.lower, true);
            let color =
                Color::from_palette(series_color(segment.color_index, true, self.palette))?;
            let height = (bottom - top).abs();
            self.frame.rects.push(
                RectPrimitive::new(x - width / 2.0, top.min(bottom), width, height, color)
                    .with_id(format!("{}-{}", segment.series_id, segment.key)),
            );
        }
        Ok(())
    }

    fn push_event_markers(&mut self) -> ChartResult<()> {
        if !self.inputs.config.show_events || !period_supports_events(self.series.period) {
            return Ok(());
        }
        let buckets: IndexMap<_, _> = self
            .series
            .bucket_index
            .iter()
            .map(|(bucket, _, start)| (start, bucket))
            .collect();
        let y = self.area.bottom() + EVENT_MARKER_OFFSET_PX;
        for (date, items) in self.inputs.events.iter() {
            let key = match self.series.period {
                Period::Day => TemporalKey::Date(date),
                _ => match buckets.get(&date) {
                    Some(bucket) => TemporalKey::Bucket(*bucket),
                    None => continue,
                },
            };
            let (Some(x), Some(marker)) = (self.x(key), EventMarker::for_events(date, items))
            else {
                continue;
            };
            let fallback = items.first().map_or(0, |item| item.id);
            let color = match Color::from_hex(&marker.color) {
                Ok(color) => color,
                Err(_) => Color::from_hex(event_color(fallback))?,
            };
            self.frame
                .circles
                .push(CirclePrimitive::new(x, y, EVENT_MARKER_RADIUS_PX, color));
            if !marker.label.is_empty() {
                self.frame.texts.push(TextPrimitive::new(
                    marker.label,
                    x,
                    y,
                    LABEL_FONT_PX,
                    MARKER_TEXT_COLOR,
                    TextHAlign::Center,
                ));
            }
        }
        Ok(())
    }

    fn push_tooltip_markers(&mut self) -> ChartResult<()> {
        let tooltip = self.inputs.tooltip;
        if !tooltip.is_shown {
            return Ok(());
        }
        let Some((key, x)) = tooltip
            .active_key
            .and_then(|key| self.x(key).map(|x| (key, x)))
        else {
            return Ok(());
        };
        self.frame.lines.push(
            LinePrimitive::new(x, self.area.top, x, self.area.bottom(), 1.0, GUIDE_COLOR)
                .with_stroke_style(LineStrokeStyle::Dashed),
        );
        if self.inputs.config.chart_kind.is_banded() {
            return Ok(());
        }
        for group in &self.series.grouped {
            let Some(value) = group.value_at(key) else {
                continue;
            };
            let color = Color::from_palette(series_color(
                group.color_index,
                group.is_primary_axis,
                self.palette,
            ))?;
            self.frame.circles.push(CirclePrimitive::new(
                x,
                self.y(value, group.is_primary_axis),
                HOVER_POINT_RADIUS_PX,
                color,
            ));
        }
        Ok(())
    }
}
