use chrono::{NaiveDate, Weekday};
use schedule_impact::calculations::ImpactClassifier;
use schedule_impact::calendar::{NonWorkingReason, WorkCalendar};
use schedule_impact::graph::TaskGraph;
use schedule_impact::task::Task;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn every_task_gets_a_record_even_without_overlap() {
    let cal = WorkCalendar::standard(d(2024, 1, 1), d(2024, 1, 31)).unwrap();
    let graph = TaskGraph::build(vec![
        // Mon 8th .. Fri 12th: fully inside a work week
        Task::new("clear", "Clear", d(2024, 1, 8), 5),
        // Fri 5th .. Tue 9th: spans one weekend
        Task::new("split", "Split", d(2024, 1, 5), 5),
    ])
    .unwrap();

    let records = ImpactClassifier::new(&graph, &cal).execute().unwrap();
    assert_eq!(records.len(), 2);

    let clear = records.iter().find(|r| r.task_id == "clear").unwrap();
    assert!(clear.overlap.is_empty());
    assert_eq!(clear.exposure_ratio, 0.0);
    assert!(!clear.is_impacted());

    let split = records.iter().find(|r| r.task_id == "split").unwrap();
    assert_eq!(
        split.overlap.iter().map(|day| day.date).collect::<Vec<_>>(),
        vec![d(2024, 1, 6), d(2024, 1, 7)]
    );
    assert_eq!(split.exposure_ratio, 2.0 / 5.0);
    assert!(split.is_impacted());
}

#[test]
fn exposure_ratio_stays_within_bounds() {
    let cal = WorkCalendar::standard(d(2024, 1, 1), d(2024, 1, 31)).unwrap();
    let graph = TaskGraph::build(vec![
        // Sat 6th .. Sun 7th: the entire span is non-working
        Task::new("weekend_only", "Weekend only", d(2024, 1, 6), 2),
        Task::new("weekday", "Weekday", d(2024, 1, 10), 1),
    ])
    .unwrap();

    let records = ImpactClassifier::new(&graph, &cal).execute().unwrap();
    for record in &records {
        assert!(record.exposure_ratio >= 0.0 && record.exposure_ratio <= 1.0);
        assert_eq!(record.exposure_ratio == 0.0, record.overlap.is_empty());
    }
    let full = records.iter().find(|r| r.task_id == "weekend_only").unwrap();
    assert_eq!(full.exposure_ratio, 1.0);
}

#[test]
fn overlap_reasons_distinguish_weekends_from_named_holidays() {
    let cal = WorkCalendar::new(
        d(2024, 1, 1),
        d(2024, 1, 31),
        [Weekday::Sat, Weekday::Sun],
        [(d(2024, 1, 15), "Martin Luther King Jr. Day".to_string())],
    )
    .unwrap();
    // Fri 12th .. Tue 16th: Sat, Sun, then the Monday holiday
    let graph = TaskGraph::build(vec![Task::new("t", "T", d(2024, 1, 12), 5)]).unwrap();

    let records = ImpactClassifier::new(&graph, &cal).execute().unwrap();
    let record = &records[0];

    assert_eq!(record.overlap.len(), 3);
    assert_eq!(record.overlap[0].reason, NonWorkingReason::Weekend);
    assert_eq!(record.overlap[1].reason, NonWorkingReason::Weekend);
    assert_eq!(
        record.overlap[2].reason,
        NonWorkingReason::Holiday("Martin Luther King Jr. Day".to_string())
    );
    assert!(record.overlaps_holiday());
    assert!(record.overlaps_weekend());
}

#[test]
fn boundary_flags_mark_spans_touching_non_working_days() {
    let cal = WorkCalendar::standard(d(2024, 1, 1), d(2024, 1, 31)).unwrap();
    let graph = TaskGraph::build(vec![
        // Sat 6th .. Mon 8th
        Task::new("starts", "Starts on weekend", d(2024, 1, 6), 3),
        // Thu 4th .. Sat 6th
        Task::new("ends", "Ends on weekend", d(2024, 1, 4), 3),
        Task::new("neither", "Inside the week", d(2024, 1, 9), 2),
    ])
    .unwrap();

    let records = ImpactClassifier::new(&graph, &cal).execute().unwrap();
    let by_id = |id: &str| records.iter().find(|r| r.task_id == id).unwrap();

    assert!(by_id("starts").starts_non_working);
    assert!(!by_id("starts").ends_non_working);
    assert!(by_id("ends").ends_non_working);
    assert!(!by_id("ends").starts_non_working);
    assert!(!by_id("neither").starts_non_working);
    assert!(!by_id("neither").ends_non_working);
}

#[test]
fn records_come_back_in_topological_order() {
    let cal = WorkCalendar::standard(d(2024, 1, 1), d(2024, 1, 31)).unwrap();
    let graph = TaskGraph::build(vec![
        Task::new("late", "Late", d(2024, 1, 10), 2).with_predecessors(["early"]),
        Task::new("early", "Early", d(2024, 1, 8), 2),
    ])
    .unwrap();

    let records = ImpactClassifier::new(&graph, &cal).execute().unwrap();
    let order: Vec<&str> = records.iter().map(|r| r.task_id.as_str()).collect();
    assert_eq!(order, vec!["early", "late"]);
}

#[test]
fn span_outside_calendar_window_surfaces_the_range_error() {
    let cal = WorkCalendar::standard(d(2024, 1, 1), d(2024, 1, 10)).unwrap();
    let graph = TaskGraph::build(vec![Task::new("t", "T", d(2024, 1, 9), 5)]).unwrap();

    assert!(ImpactClassifier::new(&graph, &cal).execute().is_err());
}
