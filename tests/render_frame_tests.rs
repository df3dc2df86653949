use chrono::NaiveDate;
use indexmap::IndexSet;
use metric_chart::api::{
    ChartEngine, ChartEngineConfig, PlotArea, PlotMargins, SecondaryPlacement, compute_scales,
};
use metric_chart::core::{
    ChartKind, ColumnType, DonutColumn, DonutDataset, DonutRow, MetricSeries, Period, RawDataPoint,
    TransformedSeries, Viewport, transform,
};
use metric_chart::render::{
    Color, LineStrokeStyle, NullRenderer, PathPrimitive, RenderFrame, Renderer,
};

fn sales() -> MetricSeries {
    MetricSeries::new("sales", "Продажи").with_points([
        RawDataPoint::new("msk", "Москва", "2024-01-01", Some(10.0)),
        RawDataPoint::new("kzn", "Казань", "2024-01-01", Some(15.0)),
        RawDataPoint::new("msk", "Москва", "2024-01-02", Some(20.0)),
        RawDataPoint::new("kzn", "Казань", "2024-01-02", Some(18.0)),
    ])
}

fn conversion() -> MetricSeries {
    MetricSeries::new("conversion", "Конверсия")
        .secondary()
        .with_column_type(ColumnType::Percent)
        .with_points([
            RawDataPoint::new("msk-cr", "Москва", "2024-01-01", Some(0.1)),
            RawDataPoint::new("msk-cr", "Москва", "2024-01-02", Some(0.3)),
        ])
}

fn drawn_frame(config: ChartEngineConfig, data: Vec<MetricSeries>) -> RenderFrame {
    let mut engine = ChartEngine::new(NullRenderer::default(), config).expect("engine init");
    engine.set_data(data).expect("set data");
    engine.tick(0).expect("tick");
    engine.into_renderer().last_frame.expect("rendered frame")
}

fn transformed(data: &[MetricSeries]) -> TransformedSeries {
    transform(data, Period::Day, &IndexSet::new())
        .expect("transform")
        .as_renderable()
        .cloned()
        .expect("renderable")
}

fn donut_dataset(values: [[Option<f64>; 2]; 2]) -> DonutDataset {
    DonutDataset {
        columns: vec![
            DonutColumn {
                name: "Заказы".to_owned(),
                column_type: ColumnType::Plain,
            },
            DonutColumn {
                name: "Выручка".to_owned(),
                column_type: ColumnType::Currency,
            },
        ],
        rows: vec![
            DonutRow {
                id: "msk".to_owned(),
                name: "Москва".to_owned(),
                values: values[0].to_vec(),
            },
            DonutRow {
                id: "kzn".to_owned(),
                name: "Казань".to_owned(),
                values: values[1].to_vec(),
            },
        ],
    }
}

#[test]
fn bar_chart_draws_one_rect_per_point() {
    let config = ChartEngineConfig::new(Viewport::new(800, 400), ChartKind::Bar);
    let frame = drawn_frame(config, vec![sales()]);

    assert_eq!(frame.rects.len(), 4);
    assert!(frame.rects.iter().any(|r| r.id.as_deref() == Some("msk-2024-01-01")));
    assert!(frame.rects.iter().all(|r| r.height >= 0.0));
}

#[test]
fn area_chart_fills_below_lines() {
    let config = ChartEngineConfig::new(Viewport::new(800, 400), ChartKind::Area);
    let frame = drawn_frame(config, vec![sales()]);

    assert!(frame.paths.iter().any(|p| p.id.as_deref() == Some("msk-fill")));
    assert!(frame.paths.iter().any(|p| p.fill_color.is_some()));
}

#[test]
fn forecast_part_is_dashed() {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).expect("date");
    let config = ChartEngineConfig::new(Viewport::new(800, 400), ChartKind::Linear)
        .with_forecast_start(start);
    let frame = drawn_frame(config, vec![sales()]);

    assert!(frame.paths.iter().any(|p| p.stroke_style == LineStrokeStyle::Dashed));
    assert!(frame.paths.iter().any(|p| p.stroke_style == LineStrokeStyle::Solid));
}

#[test]
fn donut_draws_one_arc_per_slice() {
    let config = ChartEngineConfig::new(Viewport::new(400, 400), ChartKind::Donut);
    let mut engine = ChartEngine::new(NullRenderer::default(), config).expect("engine init");
    engine.set_donut_data(donut_dataset([[Some(30.0), None], [Some(10.0), None]]));
    engine.tick(0).expect("tick");

    let frame = engine.renderer().last_frame.clone().expect("frame");
    assert_eq!(frame.arcs.len(), 2);
    let labels: Vec<&str> = frame.texts.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(labels, vec!["75.00%", "25.00%"]);
}

#[test]
fn double_donut_draws_two_rings() {
    let config = ChartEngineConfig::new(Viewport::new(400, 400), ChartKind::DoubleDonut);
    let mut engine = ChartEngine::new(NullRenderer::default(), config).expect("engine init");
    let dataset = donut_dataset([[Some(30.0), Some(1.0)], [Some(10.0), Some(3.0)]]);
    engine.set_donut_data(dataset);
    engine.tick(0).expect("tick");

    let frame = engine.into_renderer().last_frame.expect("frame");
    assert_eq!(frame.arcs.len(), 4);
    let outer = frame.arcs[0].outer_radius;
    assert!(frame.arcs[2].outer_radius < outer);
}

#[test]
fn empty_donut_draws_a_placeholder_ring() {
    let config = ChartEngineConfig::new(Viewport::new(400, 400), ChartKind::Donut);
    let mut engine = ChartEngine::new(NullRenderer::default(), config).expect("engine init");
    engine.set_donut_data(donut_dataset([[Some(0.0), None], [None, None]]));
    engine.tick(0).expect("tick");

    let frame = engine.into_renderer().last_frame.expect("frame");
    assert_eq!(frame.arcs.len(), 1);
    assert!(frame.texts.is_empty());
}

#[test]
fn line_secondary_axis_gets_its_own_scale() {
    let series = transformed(&[sales(), conversion()]);
    let area = PlotArea::from_viewport(Viewport::new(800, 400), PlotMargins::default());
    let scales = compute_scales(&series, ChartKind::Linear, &area)
        .expect("scales")
        .expect("cartesian chart");

    let secondary = scales.secondary.expect("secondary axis");
    assert!(matches!(secondary.placement, SecondaryPlacement::Own(_)));
    assert_eq!(secondary.column_type, ColumnType::Percent);
}

#[test]
fn bar_secondary_axis_is_normalized_into_the_primary_range() {
    let series = transformed(&[sales(), conversion()]);
    let area = PlotArea::from_viewport(Viewport::new(800, 400), PlotMargins::default());
    let scales = compute_scales(&series, ChartKind::Bar, &area)
        .expect("scales")
        .expect("cartesian chart");

    assert_eq!((scales.primary.min, scales.primary.max), (0.0, 20.0));
    let SecondaryPlacement::Normalized(normalization) =
        scales.secondary.as_ref().expect("secondary axis").placement
    else {
        panic!("bar charts normalize the secondary axis");
    };
    assert_eq!(normalization.second_min, 0.0);
    assert_eq!(scales.project(0.3, false), scales.project(20.0, true));
}

#[test]
fn stack_domain_covers_the_tallest_stack() {
    let series = transformed(&[sales()]);
    let area = PlotArea::from_viewport(Viewport::new(800, 400), PlotMargins::default());
    let scales = compute_scales(&series, ChartKind::Stack, &area)
        .expect("scales")
        .expect("cartesian chart");
    assert_eq!((scales.primary.min, scales.primary.max), (0.0, 38.0));
}

#[test]
fn radial_charts_have_no_cartesian_scales() {
    let series = transformed(&[sales()]);
    let area = PlotArea::from_viewport(Viewport::new(400, 400), PlotMargins::default());
    assert!(compute_scales(&series, ChartKind::Donut, &area).expect("scales").is_none());
}

#[test]
fn renderer_rejects_non_finite_geometry() {
    let mut renderer = NullRenderer::default();
    let black = Color::rgb(0.0, 0.0, 0.0);
    let path = PathPrimitive::stroked(vec![(0.0, 0.0), (f64::NAN, 1.0)], black, 2.0);
    let frame = RenderFrame::new(Viewport::new(100, 100)).with_path(path);
    assert!(renderer.render(&frame).is_err());
    assert_eq!(renderer.render_count, 0);
}

#[test]
fn hex_colors_are_parsed() {
    let color = Color::from_hex("#ff0000").expect("hex color");
    assert_eq!(color, Color::rgb(1.0, 0.0, 0.0));
    assert!(Color::from_hex("#zzzzzz").is_err());
}
