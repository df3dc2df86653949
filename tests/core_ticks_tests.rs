use approx::assert_relative_eq;
use metric_chart::core::ticks::{axis_ticks, label_stride, tick_parts};
use metric_chart::core::{
    ColumnType, DEFAULT_TICK_GRANULARITY, PERCENT_TICK_GRANULARITY, Period, compute_ticks,
};
use proptest::prelude::*;

#[test]
fn span_ten_splits_into_three_parts() {
    let ticks = compute_ticks(0.0, 10.0, DEFAULT_TICK_GRANULARITY);
    assert_eq!(ticks.as_slice(), &[0.0, 3.0, 6.0, 10.0]);
}

#[test]
fn collapsed_span_keeps_both_bounds() {
    let ticks = compute_ticks(7.0, 7.0, DEFAULT_TICK_GRANULARITY);
    assert_eq!(ticks.as_slice(), &[7.0, 7.0]);
}

#[test]
fn narrow_span_gets_one_interior_tick() {
    let ticks = compute_ticks(2.0, 8.0, DEFAULT_TICK_GRANULARITY);
    assert_eq!(ticks.as_slice(), &[2.0, 5.0, 8.0]);
}

#[test]
fn percent_ticks_are_not_rounded() {
    let ticks = compute_ticks(0.0, 0.5, PERCENT_TICK_GRANULARITY);
    let expected = [0.0, 0.125, 0.25, 0.375, 0.5];
    assert_eq!(ticks.len(), expected.len());
    for (tick, expected) in ticks.iter().zip(expected) {
        assert_relative_eq!(*tick, expected, epsilon = 1e-12);
    }
}

#[test]
fn axis_ticks_round_non_percent_bounds() {
    let ticks = axis_ticks(0.4, 9.6, ColumnType::Currency);
    assert_eq!(ticks.as_slice(), &[0.0, 3.0, 6.0, 10.0]);
}

#[test]
fn tick_parts_follow_span_thresholds() {
    assert_eq!(tick_parts(8.0, 4.0), 2.0);
    assert_eq!(tick_parts(8.5, 4.0), 3.0);
    assert_eq!(tick_parts(15.0, 4.0), 3.0);
    assert_eq!(tick_parts(16.0, 4.0), 4.0);
}

#[test]
fn week_labels_thin_out_on_narrow_plots() {
    assert_eq!(label_stride(2_000.0, 10, Period::Week), 0);
    assert!(label_stride(300.0, 12, Period::Week) > 1);
}

proptest! {
    #[test]
    fn ticks_start_at_min_and_end_at_max(
        min in -1_000_000i64..1_000_000,
        span in 0i64..100_000
    ) {
        let min = min as f64;
        let max = min + span as f64;
        let ticks = compute_ticks(min, max, DEFAULT_TICK_GRANULARITY);

        prop_assert_eq!(ticks.first().copied(), Some(min));
        prop_assert_eq!(ticks.last().copied(), Some(max));
        prop_assert!(ticks.windows(2).all(|pair| pair[0] <= pair[1]));

        let parts = tick_parts(max - min, DEFAULT_TICK_GRANULARITY);
        let expected_len = if max - min < parts { 2 } else { parts as usize + 1 };
        prop_assert_eq!(ticks.len(), expected_len);
    }
}
