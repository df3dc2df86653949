use chrono::NaiveDate;
use metric_chart::core::Period;
use metric_chart::core::palette::EVENT_COLORS;
use metric_chart::extensions::{
    EventAnnotation, EventOverlay, EventRecord, ShortEvent, expand_days, map_events,
};

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

#[test]
fn iso_week_event_matches_only_its_week_bucket() {
    let starts = vec![ymd(2024, 3, 11), ymd(2024, 3, 18), ymd(2024, 3, 25)];
    let event = EventRecord::new(1, "Неделя скидок", "2024-03-18", "2024-03-24");
    let overlay = EventOverlay::from_records(&[event], Period::Week, starts).expect("overlay");

    let dates: Vec<NaiveDate> = overlay.iter().map(|(date, _)| date).collect();
    assert_eq!(dates, vec![ymd(2024, 3, 18)]);
}

#[test]
fn event_spanning_two_months_matches_both_buckets() {
    let starts = vec![ymd(2024, 1, 1), ymd(2024, 2, 1), ymd(2024, 3, 1)];
    let event = EventRecord::new(2, "Акция", "2024-01-20", "2024-02-10");
    let overlay = EventOverlay::from_records(&[event], Period::Month, starts).expect("overlay");

    assert!(overlay.events_at(ymd(2024, 1, 1)).is_some());
    assert!(overlay.events_at(ymd(2024, 2, 1)).is_some());
    assert!(overlay.events_at(ymd(2024, 3, 1)).is_none());
}

#[test]
fn daily_events_cover_every_day_of_their_range() {
    let event = EventRecord::new(3, "Релиз", "2024-01-01 09:00:00", "2024-01-03");
    let overlay =
        EventOverlay::from_records(&[event], Period::Day, Vec::new()).expect("overlay");

    let annotations = overlay.annotations();
    let dates: Vec<&str> = annotations.iter().map(|a| a.date.as_str()).collect();
    assert_eq!(dates, vec!["2024-01-01", "2024-01-02", "2024-01-03"]);
}

#[test]
fn events_on_the_same_day_are_merged() {
    let events = [
        EventRecord::new(1, "Релиз", "2024-01-01", "2024-01-01"),
        EventRecord::new(2, "Вебинар", "2024-01-01", "2024-01-01"),
    ];
    let overlay = EventOverlay::from_records(&events, Period::Day, Vec::new()).expect("overlay");
    assert_eq!(overlay.events_at(ymd(2024, 1, 1)).map(<[ShortEvent]>::len), Some(2));
}

#[test]
fn updating_an_event_moves_it_to_its_new_dates() {
    let mut overlay = EventOverlay::new(Period::Day, Vec::new());
    overlay
        .add_event(&EventRecord::new(1, "Релиз", "2024-01-01", "2024-01-02"))
        .expect("add");
    overlay
        .add_event(&EventRecord::new(2, "Вебинар", "2024-01-02", "2024-01-02"))
        .expect("add");

    overlay
        .update_event(&EventRecord::new(1, "Релиз 2", "2024-01-03", "2024-01-03"))
        .expect("update");

    assert!(overlay.events_at(ymd(2024, 1, 1)).is_none());
    let second_day = overlay.events_at(ymd(2024, 1, 2)).expect("untouched event");
    assert_eq!(second_day.len(), 1);
    assert_eq!(second_day[0].id, 2);
    let third_day = overlay.events_at(ymd(2024, 1, 3)).expect("moved event");
    assert_eq!(third_day[0].name, "Релиз 2");
}

#[test]
fn deleting_an_event_removes_empty_annotations() {
    let event = EventRecord::new(9, "Релиз", "2024-01-01", "2024-01-02");
    let mut overlay =
        EventOverlay::from_records(&[event], Period::Day, Vec::new()).expect("overlay");

    assert!(overlay.delete_event(9));
    assert!(overlay.is_empty());
    assert!(!overlay.delete_event(9));
}

#[test]
fn malformed_event_date_is_rejected() {
    let mut overlay = EventOverlay::new(Period::Day, Vec::new());
    let result = overlay.add_event(&EventRecord::new(1, "Релиз", "вчера", "2024-01-02"));
    assert!(result.is_err());
}

#[test]
fn preaggregated_annotations_are_loaded_as_is() {
    let annotation = EventAnnotation {
        date: "2024-03-18".to_owned(),
        items: vec![ShortEvent {
            id: 5,
            name: "Промо".to_owned(),
            color: Some("3ca60f".to_owned()),
        }],
    };
    let overlay = EventOverlay::from_annotations(vec![annotation], Period::Week, Vec::new())
        .expect("overlay");
    let items = overlay.events_at(ymd(2024, 3, 18)).expect("annotation");
    assert_eq!(items[0].display_color(), "#3ca60f");
}

#[test]
fn missing_colour_falls_back_to_id_based_palette() {
    let event = ShortEvent {
        id: 17,
        name: "Релиз".to_owned(),
        color: None,
    };
    assert_eq!(event.display_color(), EVENT_COLORS[17 % 15]);
}

#[test]
fn reversed_range_expands_to_its_end() {
    assert_eq!(expand_days(ymd(2024, 1, 5), ymd(2024, 1, 3)), vec![ymd(2024, 1, 3)]);
    assert_eq!(expand_days(ymd(2024, 1, 1), ymd(2024, 1, 3)).len(), 3);
}

#[test]
fn hourly_charts_have_no_events() {
    let events = [EventRecord::new(1, "Релиз", "2024-01-01", "2024-01-01")];
    assert!(map_events(&events, Period::Hour, &[]).is_err());
    let mapped = map_events(&events, Period::Day, &[]).expect("daily events");
    assert_eq!(mapped.len(), 1);
}
