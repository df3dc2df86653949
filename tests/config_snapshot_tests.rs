use chrono::NaiveDate;
use metric_chart::ChartError;
use metric_chart::api::{
    ChartEngine, ChartEngineConfig, ENGINE_SNAPSHOT_JSON_SCHEMA_V1, EngineSnapshot,
    EngineTimings, PlotMargins,
};
use metric_chart::core::{
    ChartKind, MetricSeries, PaletteVariant, Period, RawDataPoint, ScaleKind, Viewport,
};
use metric_chart::render::NullRenderer;

fn mounted_engine() -> ChartEngine<NullRenderer> {
    let config = ChartEngineConfig::new(Viewport::new(800, 400), ChartKind::Linear);
    let mut engine = ChartEngine::new(NullRenderer::default(), config).expect("engine init");
    engine
        .set_data(vec![MetricSeries::new("sales", "Продажи").with_points([
            RawDataPoint::new("msk", "Москва", "2024-01-01", Some(10.0)),
            RawDataPoint::new("kzn", "Казань", "2024-01-01", Some(15.0)),
            RawDataPoint::new("msk", "Москва", "2024-01-02", Some(20.0)),
            RawDataPoint::new("kzn", "Казань", "2024-01-02", Some(18.0)),
        ])])
        .expect("set data");
    engine.tick(0).expect("tick");
    engine
}

#[test]
fn chart_engine_config_json_roundtrip() {
    let config = ChartEngineConfig::new(Viewport::new(1024, 768), ChartKind::Bar)
        .with_period(Period::Month)
        .with_palette(PaletteVariant::Antifraud)
        .with_currency_unit("$")
        .with_forecast_start(NaiveDate::from_ymd_opt(2024, 5, 1).expect("date"))
        .with_show_events(false);

    let json = config.to_json_pretty().expect("config should serialize");
    let restored = ChartEngineConfig::from_json_str(&json).expect("config should deserialize");
    assert_eq!(restored, config);
}

#[test]
fn minimal_config_json_uses_defaults() {
    let json = r#"{ "viewport": { "width": 640, "height": 320 } }"#;
    let config = ChartEngineConfig::from_json_str(json).expect("minimal config");

    assert_eq!(config.chart_kind, ChartKind::Linear);
    assert_eq!(config.period, Period::Day);
    assert_eq!(config.currency_unit, "р");
    assert_eq!(config.timings, EngineTimings::default());
    assert!(config.show_events);
}

#[test]
fn invalid_configs_are_rejected() {
    let zero = ChartEngineConfig::new(Viewport::new(0, 300), ChartKind::Linear);
    assert!(matches!(
        ChartEngine::new(NullRenderer::default(), zero),
        Err(ChartError::InvalidViewport { width: 0, .. })
    ));

    let timings = EngineTimings {
        resize_settle_ms: 0,
        ..EngineTimings::default()
    };
    let config = ChartEngineConfig::new(Viewport::new(10, 10), ChartKind::Linear)
        .with_timings(timings);
    assert!(matches!(config.validate(), Err(ChartError::InvalidConfig(_))));

    let margins = PlotMargins {
        left: -1.0,
        ..PlotMargins::default()
    };
    let config = ChartEngineConfig::new(Viewport::new(10, 10), ChartKind::Linear)
        .with_margins(margins);
    assert!(config.validate().is_err());
}

#[test]
fn snapshot_reports_resolved_axes() {
    let engine = mounted_engine();
    let snapshot = engine.snapshot().expect("snapshot");

    assert_eq!(snapshot.redraw_count, 1);
    assert!(snapshot.unrenderable_reason.is_none());
    let axes = snapshot.axes.expect("cartesian axes");
    assert_eq!(axes.x_kind, ScaleKind::Time);
    assert_eq!(axes.x_ticks.len(), 2);
    assert_eq!(axes.y_domain, (9.0, 20.0));
    assert_eq!(axes.y_ticks, vec![9.0, 13.0, 17.0, 20.0]);
    assert!(axes.secondary_ticks.is_none());
}

#[test]
fn snapshot_json_contract_v1_roundtrip() {
    let engine = mounted_engine();
    let snapshot = engine.snapshot().expect("snapshot");

    let json = engine
        .snapshot_json_contract_v1_pretty()
        .expect("contract json");
    assert!(json.contains("\"schema_version\": 1"));
    let restored = EngineSnapshot::from_json_compat_str(&json).expect("parse contract");
    assert_eq!(restored, snapshot);

    let bare = snapshot.to_json_pretty().expect("bare json");
    let restored = EngineSnapshot::from_json_compat_str(&bare).expect("parse bare");
    assert_eq!(restored, snapshot);
    assert_eq!(ENGINE_SNAPSHOT_JSON_SCHEMA_V1, 1);
}

#[test]
fn unsupported_snapshot_schema_is_rejected() {
    let engine = mounted_engine();
    let json = engine
        .snapshot_json_contract_v1_pretty()
        .expect("contract json")
        .replace("\"schema_version\": 1", "\"schema_version\": 2");
    assert!(EngineSnapshot::from_json_compat_str(&json).is_err());
}
