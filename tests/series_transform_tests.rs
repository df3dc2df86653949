use chrono::NaiveDate;
use indexmap::IndexSet;
use metric_chart::ChartError;
use metric_chart::core::{
    ColumnType, MetricSeries, Period, RawDataPoint, SeriesTransform, TemporalKey,
    TransformedSeries, split_forecast, transform,
};
use proptest::prelude::*;

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

fn revenue_group() -> MetricSeries {
    MetricSeries::new("revenue", "Выручка")
        .with_column_type(ColumnType::Currency)
        .with_points([
            RawDataPoint::new("online", "Онлайн", "2024-01-01", Some(10.0)),
            RawDataPoint::new("offline", "Офлайн", "2024-01-01", Some(4.0)),
            RawDataPoint::new("online", "Онлайн", "2024-01-02", Some(12.0)),
            RawDataPoint::new("offline", "Офлайн", "2024-01-03", Some(5.0)),
        ])
}

fn renderable(result: SeriesTransform) -> TransformedSeries {
    match result {
        SeriesTransform::Renderable(series) => series,
        SeriesTransform::Unrenderable { reason } => panic!("unexpected unrenderable: {reason}"),
    }
}

fn daily(hidden: &IndexSet<String>) -> TransformedSeries {
    renderable(transform(&[revenue_group()], Period::Day, hidden).expect("daily transform"))
}

#[test]
fn daily_points_are_grouped_per_metric() {
    let series = daily(&IndexSet::new());

    assert_eq!(series.grouped.len(), 2);
    assert_eq!(series.grouped[0].series_id, "online");
    assert_eq!(series.grouped[0].points.len(), 2);
    assert_eq!(series.grouped[1].color_index, 1);
    assert_eq!(
        series.grouped[0].value_at(TemporalKey::Date(ymd(2024, 1, 2))),
        Some(12.0)
    );
    assert_eq!(series.keys().len(), 3);
}

#[test]
fn hidden_metrics_are_filtered_but_keep_the_x_domain() {
    let hidden: IndexSet<String> = ["offline".to_owned()].into_iter().collect();
    let series = daily(&hidden);

    assert_eq!(series.grouped.len(), 1);
    assert!(series.filtered[0].points.iter().all(|p| p.series_id == "online"));
    assert_eq!(series.mapped[0].points.len(), 4);
    assert_eq!(series.keys().len(), 2);
    assert_eq!(series.all_keys().len(), 3);
}

#[test]
fn color_slots_survive_hiding_earlier_metrics() {
    let hidden: IndexSet<String> = ["online".to_owned()].into_iter().collect();
    let series = daily(&hidden);

    assert_eq!(series.grouped.len(), 1);
    assert_eq!(series.grouped[0].series_id, "offline");
    assert_eq!(series.grouped[0].color_index, 1);
}

#[test]
fn weekly_dates_become_ordinal_buckets() {
    let group = MetricSeries::new("orders", "Заказы").with_points([
        RawDataPoint::new("orders", "Заказы", "2024-03-18", Some(3.0)),
        RawDataPoint::new("orders", "Заказы", "2024-03-25", Some(8.0)),
        RawDataPoint::new("orders", "Заказы", "2024-04-01", None),
    ]);
    let series = renderable(transform(&[group], Period::Week, &IndexSet::new()).expect("ok"));

    let keys: Vec<TemporalKey> = series.keys().into_iter().collect();
    assert_eq!(
        keys,
        vec![TemporalKey::Bucket(0), TemporalKey::Bucket(1), TemporalKey::Bucket(2)]
    );
    assert_eq!(series.bucket_index.original_date(1), Some("2024-03-25"));
    assert_eq!(series.bucket_index.start_date(2), Some(ymd(2024, 4, 1)));
    assert_eq!(series.grouped[0].points[2].value, None);
}

#[test]
fn hourly_period_with_calendar_dates_is_unrenderable() {
    let result = transform(&[revenue_group()], Period::Hour, &IndexSet::new()).expect("ok");
    assert!(!result.is_renderable());
    assert!(matches!(result, SeriesTransform::Unrenderable { .. }));
}

#[test]
fn daily_period_with_integer_dates_is_unrenderable() {
    let group = MetricSeries::new("visits", "Визиты")
        .with_point(RawDataPoint::new("visits", "Визиты", 14_i64, Some(1.0)));
    let result = transform(&[group], Period::Day, &IndexSet::new()).expect("ok");
    assert!(result.as_renderable().is_none());
}

#[test]
fn hour_and_weekday_integers_resolve_to_keys() {
    let hourly = MetricSeries::new("visits", "Визиты").with_points([
        RawDataPoint::new("visits", "Визиты", 0_i64, Some(1.0)),
        RawDataPoint::new("visits", "Визиты", "23", Some(2.0)),
    ]);
    let series = renderable(transform(&[hourly], Period::Hour, &IndexSet::new()).expect("ok"));
    assert!(series.keys().contains(&TemporalKey::Hour(23)));

    let weekly = MetricSeries::new("visits", "Визиты")
        .with_point(RawDataPoint::new("visits", "Визиты", 7_i64, Some(1.0)));
    let series =
        renderable(transform(&[weekly], Period::DayOfWeek, &IndexSet::new()).expect("ok"));
    assert!(series.keys().contains(&TemporalKey::DayOfWeek(7)));
}

#[test]
fn malformed_calendar_date_is_an_error() {
    let group = MetricSeries::new("visits", "Визиты")
        .with_point(RawDataPoint::new("visits", "Визиты", "2024-13-45", Some(1.0)));
    let err = transform(&[group], Period::Day, &IndexSet::new()).expect_err("bad date");
    assert!(matches!(err, ChartError::InvalidDate { .. }));
}

#[test]
fn non_finite_values_become_gaps() {
    let group = MetricSeries::new("visits", "Визиты")
        .with_point(RawDataPoint::new("visits", "Визиты", "2024-01-01", Some(f64::NAN)));
    let series = renderable(transform(&[group], Period::Day, &IndexSet::new()).expect("ok"));
    assert_eq!(series.grouped[0].points[0].value, None);
}

#[test]
fn forecast_split_shares_the_start_date() {
    let series = daily(&IndexSet::new());
    let split = split_forecast(&series.grouped, ymd(2024, 1, 1));

    // "online" has a point after the start; "offline" too (2024-01-03).
    assert_eq!(split.len(), 4);
    let actual = &split[0];
    let forecast = &split[1];
    assert!(!actual.dashed);
    assert!(forecast.dashed);
    assert_eq!(actual.value_at(TemporalKey::Date(ymd(2024, 1, 1))), Some(10.0));
    assert_eq!(actual.value_at(TemporalKey::Date(ymd(2024, 1, 2))), None);
    assert_eq!(forecast.value_at(TemporalKey::Date(ymd(2024, 1, 1))), Some(10.0));
    assert_eq!(forecast.value_at(TemporalKey::Date(ymd(2024, 1, 2))), Some(12.0));
}

#[test]
fn forecast_split_keeps_groups_that_end_before_the_start() {
    let series = daily(&IndexSet::new());
    let split = split_forecast(&series.grouped, ymd(2024, 2, 1));
    assert_eq!(split, series.grouped);
}

proptest! {
    #[test]
    fn bucketing_is_stable_and_dense(offsets in prop::collection::vec(0u64..60, 1..40)) {
        let start = ymd(2024, 1, 1);
        let points = offsets.iter().map(|offset| {
            let date = start + chrono::Days::new(*offset);
            RawDataPoint::new("m", "M", date.format("%Y-%m-%d").to_string().as_str(), Some(1.0))
        });
        let raw = vec![MetricSeries::new("g", "G").with_points(points)];

        let first = transform(&raw, Period::Month, &IndexSet::new()).expect("transform");
        let second = transform(&raw, Period::Month, &IndexSet::new()).expect("transform");
        prop_assert_eq!(&first, &second);

        let series = renderable(first);
        let distinct: IndexSet<u64> = offsets.iter().copied().collect();
        prop_assert_eq!(series.bucket_index.len(), distinct.len());
        let expected: Vec<TemporalKey> = (0..distinct.len()).map(TemporalKey::Bucket).collect();
        let keys: Vec<TemporalKey> = series.keys().into_iter().collect();
        prop_assert_eq!(keys, expected);
    }
}
