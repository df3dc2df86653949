use metric_chart::ChartError;
use metric_chart::core::{ChartKind, MetricSeries, RawDataPoint};
use metric_chart::interaction::{
    DEFAULT_TOTAL_METRIC_NAME, LegendData, LegendVisibilityController, ToggleOutcome,
    default_disabled_metrics,
};

fn group(id: &str, metrics: &[(&str, &str)]) -> MetricSeries {
    let points = metrics
        .iter()
        .map(|(metric_id, name)| RawDataPoint::new(*metric_id, *name, "2024-01-01", Some(1.0)));
    MetricSeries::new(id, id).with_points(points)
}

#[test]
fn legend_pairs_metrics_with_secondary_twins() {
    let legend = LegendData::from_series(&[
        group("sales", &[("a", "Москва"), ("b", "Казань")]),
        group("share", &[("a2", "Москва"), ("b2", "Казань")]).secondary(),
    ]);

    assert_eq!(legend.titles.len(), 2);
    assert_eq!(legend.columns.len(), 2);
    assert_eq!(legend.columns[1].primary_id(), Some("b"));
    assert_eq!(legend.columns[1].secondary_id(), Some("b2"));
    assert!(!legend.metric("b2").expect("twin").is_primary_axis);
}

#[test]
fn last_visible_metric_of_an_axis_is_locked() {
    let legend = LegendData::from_series(&[group("sales", &[("a", "A"), ("b", "B")])]);
    let mut controller = LegendVisibilityController::new(legend);

    assert!(!controller.is_locked("a"));
    assert_eq!(controller.toggle("a").expect("toggle"), ToggleOutcome::Hidden);
    assert!(controller.is_hidden("a"));
    assert!(controller.is_locked("b"));
    assert_eq!(controller.toggle("b").expect("toggle"), ToggleOutcome::Locked);
    assert!(!controller.is_hidden("b"));

    assert_eq!(controller.toggle("a").expect("toggle"), ToggleOutcome::Shown);
    assert_eq!(controller.state().last_toggled_id.as_deref(), Some("a"));
    assert_eq!(controller.state().last_toggled_index, Some(0));
}

#[test]
fn lock_is_tracked_per_axis_group() {
    let legend = LegendData::from_series(&[
        group("sales", &[("a", "A"), ("b", "B")]),
        group("share", &[("a2", "A")]).secondary(),
    ]);
    let controller = LegendVisibilityController::new(legend);

    assert!(controller.is_locked("a2"));
    assert!(!controller.is_locked("a"));
    assert_eq!(controller.visible_count(true), 2);
    assert_eq!(controller.visible_count(false), 1);
}

#[test]
fn unknown_metric_is_reported() {
    let legend = LegendData::from_series(&[group("sales", &[("a", "A")])]);
    let mut controller = LegendVisibilityController::new(legend);
    let err = controller.toggle("missing").expect_err("unknown metric");
    assert!(matches!(err, ChartError::UnknownMetric { .. }));
}

#[test]
fn five_row_legend_hides_its_last_two_rows() {
    let legend = LegendData::from_series(&[
        group(
            "sales",
            &[("a", "A"), ("b", "B"), ("c", "C"), ("d", "D"), ("e", "E")],
        ),
        group(
            "share",
            &[("a2", "A"), ("b2", "B"), ("c2", "C"), ("d2", "D"), ("e2", "E")],
        )
        .secondary(),
    ]);
    let hidden = default_disabled_metrics(&legend, ChartKind::Linear, DEFAULT_TOTAL_METRIC_NAME);
    let hidden: Vec<&str> = hidden.iter().map(String::as_str).collect();
    assert_eq!(hidden, vec!["e", "d", "e2", "d2"]);
}

#[test]
fn trailing_total_row_is_hidden_except_on_area_charts() {
    let legend = LegendData::from_series(&[group(
        "sales",
        &[("a", "Москва"), ("total", DEFAULT_TOTAL_METRIC_NAME)],
    )]);

    let controller = LegendVisibilityController::with_defaults(
        legend.clone(),
        ChartKind::Bar,
        DEFAULT_TOTAL_METRIC_NAME,
    );
    assert!(controller.is_hidden("total"));
    assert!(controller.is_locked("a"));

    let area = default_disabled_metrics(&legend, ChartKind::Area, DEFAULT_TOTAL_METRIC_NAME);
    assert!(area.is_empty());
}

#[test]
fn replacing_the_legend_drops_stale_hidden_ids() {
    let legend = LegendData::from_series(&[group("sales", &[("a", "A"), ("b", "B")])]);
    let mut controller = LegendVisibilityController::new(legend);
    controller.toggle("b").expect("toggle");

    controller.replace_legend(LegendData::from_series(&[group("sales", &[("a", "A")])]));
    assert!(controller.disabled_ids().is_empty());
}
