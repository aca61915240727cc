use chrono::{NaiveDate, Weekday};
use schedule_impact::calendar::{CalendarError, NonWorkingReason, WorkCalendar};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn january_2024() -> WorkCalendar {
    WorkCalendar::standard(d(2024, 1, 1), d(2024, 1, 31)).unwrap()
}

#[test]
fn standard_calendar_marks_weekends_non_working() {
    let cal = january_2024();
    // 2024-01-06 is a Saturday, 2024-01-07 a Sunday
    assert!(cal.is_non_working(d(2024, 1, 6)).unwrap());
    assert!(cal.is_non_working(d(2024, 1, 7)).unwrap());
    assert!(cal.is_working(d(2024, 1, 8)).unwrap());
}

#[test]
fn holidays_are_non_working_and_named() {
    let cal = WorkCalendar::new(
        d(2024, 1, 1),
        d(2024, 1, 31),
        [Weekday::Sat, Weekday::Sun],
        [(d(2024, 1, 15), "Martin Luther King Jr. Day".to_string())],
    )
    .unwrap();

    // 2024-01-15 is a Monday, non-working only because of the holiday
    assert!(cal.is_non_working(d(2024, 1, 15)).unwrap());
    assert_eq!(
        cal.holiday_name(d(2024, 1, 15)),
        Some("Martin Luther King Jr. Day")
    );
    assert_eq!(
        cal.non_working_reason(d(2024, 1, 15)).unwrap(),
        Some(NonWorkingReason::Holiday(
            "Martin Luther King Jr. Day".to_string()
        ))
    );
    assert_eq!(
        cal.non_working_reason(d(2024, 1, 13)).unwrap(),
        Some(NonWorkingReason::Weekend)
    );
    assert_eq!(cal.non_working_reason(d(2024, 1, 16)).unwrap(), None);
}

#[test]
fn queries_outside_range_fail_by_default() {
    let cal = january_2024();
    let err = cal.is_non_working(d(2024, 2, 1)).unwrap_err();
    assert!(matches!(err, CalendarError::OutOfRange { .. }));
    assert!(cal.first_working_on_or_after(d(2023, 12, 30)).is_err());
}

#[test]
fn extrapolation_extends_weekends_but_not_holidays() {
    let holidays = vec![(d(2024, 7, 4), "Independence Day".to_string())];
    let cal = WorkCalendar::new(
        d(2024, 1, 1),
        d(2024, 1, 31),
        [Weekday::Sat, Weekday::Sun],
        holidays,
    )
    .unwrap()
    .with_regular_calendar_beyond_range();

    // 2024-02-03 is a Saturday: the weekday rule extrapolates.
    assert!(cal.is_non_working(d(2024, 2, 3)).unwrap());
    // Independence Day falls outside the materialized range, so it reads as a
    // regular working Thursday. Documented asymmetry of the mode.
    assert!(!cal.is_non_working(d(2024, 7, 4)).unwrap());
}

#[test]
fn construction_rejects_inverted_range_and_empty_work_week() {
    let err = WorkCalendar::standard(d(2024, 2, 1), d(2024, 1, 1)).unwrap_err();
    assert!(matches!(err, CalendarError::InvalidRange { .. }));

    let err = WorkCalendar::new(
        d(2024, 1, 1),
        d(2024, 1, 31),
        [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ],
        [],
    )
    .unwrap_err();
    assert_eq!(err, CalendarError::EmptyWorkWeek);
}

#[test]
fn non_working_days_in_range_is_ordered_and_validates_bounds() {
    let cal = january_2024();
    let days = cal
        .non_working_days_in_range(d(2024, 1, 5), d(2024, 1, 14))
        .unwrap();
    assert_eq!(
        days,
        vec![d(2024, 1, 6), d(2024, 1, 7), d(2024, 1, 13), d(2024, 1, 14)]
    );

    let err = cal
        .non_working_days_in_range(d(2024, 1, 10), d(2024, 1, 5))
        .unwrap_err();
    assert!(matches!(err, CalendarError::InvalidRange { .. }));
}

#[test]
fn first_working_on_or_after_skips_weekend() {
    let cal = january_2024();
    // Saturday the 6th rolls forward to Monday the 8th
    assert_eq!(
        cal.first_working_on_or_after(d(2024, 1, 6)).unwrap(),
        d(2024, 1, 8)
    );
    // A working day stays put
    assert_eq!(
        cal.first_working_on_or_after(d(2024, 1, 5)).unwrap(),
        d(2024, 1, 5)
    );
}

#[test]
fn add_working_days_skips_non_working_without_counting() {
    let cal = january_2024();
    // Friday the 5th + 2 working days: Sat/Sun skipped, lands Tuesday the 9th
    assert_eq!(
        cal.add_working_days(d(2024, 1, 5), 2).unwrap(),
        d(2024, 1, 9)
    );
    assert_eq!(
        cal.add_working_days(d(2024, 1, 5), 0).unwrap(),
        d(2024, 1, 5)
    );
}

#[test]
fn count_working_days_over_full_weeks() {
    let cal = january_2024();
    // Mon 8th .. Fri 19th spans two work weeks
    assert_eq!(
        cal.count_working_days(d(2024, 1, 8), d(2024, 1, 19)).unwrap(),
        10
    );
}

#[test]
fn united_states_holiday_table_has_named_fixed_and_floating_dates() {
    let table = WorkCalendar::united_states_holidays(2024, 2024);

    let find = |name: &str| {
        table
            .iter()
            .find(|(_, n)| n == name)
            .map(|(date, _)| *date)
    };

    assert_eq!(find("Independence Day"), Some(d(2024, 7, 4)));
    assert_eq!(find("Thanksgiving"), Some(d(2024, 11, 28)));
    assert_eq!(find("Martin Luther King Jr. Day"), Some(d(2024, 1, 15)));
    assert_eq!(find("Memorial Day"), Some(d(2024, 5, 27)));
}
