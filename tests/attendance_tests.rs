use chrono::{NaiveDate, Weekday};
use skiplan::{
    CalendarState, Class, ClassMark, ClassStatus, DayMode, PercentageColorConfig, SemesterConfig,
    ThresholdBand,
};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// 2025-03-10 is a Monday.
fn monday() -> NaiveDate {
    d(2025, 3, 10)
}

/// One class "A" meeting on Mondays, semester covering a single Monday.
fn scenario_a() -> CalendarState {
    CalendarState::new(SemesterConfig::new(monday(), monday()))
        .add_class(Class::new("A", "Algebra", 10.0))
        .set_day_schedule(Weekday::Mon, vec!["A".into()])
}

fn two_week_state() -> CalendarState {
    CalendarState::new(SemesterConfig::new(d(2025, 3, 10), d(2025, 3, 23)))
        .add_class(Class::new("MATH", "Calculus", 5.0))
        .add_class(Class::new("BIO", "Biology", 10.0))
        .set_day_schedule(Weekday::Mon, vec!["MATH".into(), "BIO".into()])
        .set_day_schedule(Weekday::Wed, vec!["MATH".into()])
}

#[test]
fn scenario_a_unmarked_class_keeps_full_percentage() {
    let stats = scenario_a().class_stats();
    assert_eq!(stats.len(), 1);
    let a = &stats[0];
    assert_eq!(a.code, "A");
    assert_eq!(a.name, "Algebra");
    assert_eq!(a.remaining_percentage, 100.0);
    assert_eq!(a.absence_count, 0);
    assert_eq!(a.free_count, 0);
    assert_eq!(a.total_days, 1);
}

#[test]
fn scenario_b_absence_costs_the_class_weight() {
    let state = scenario_a().set_day_mark(
        monday(),
        vec![ClassMark::new("A", ClassStatus::Absence)],
        false,
    );
    let stats = state.class_stats();
    assert_eq!(stats[0].remaining_percentage, 90.0);
    assert_eq!(stats[0].absence_count, 1);
    assert_eq!(state.class_status(monday(), "A"), ClassStatus::Absence);
}

#[test]
fn scenario_c_all_day_free_counts_as_free() {
    let state = scenario_a().set_day_mark(monday(), vec![], true);
    let stats = state.class_stats();
    assert_eq!(stats[0].free_count, 1);
    assert_eq!(stats[0].remaining_percentage, 100.0);
    assert!(state.day_mark_for(monday()).all_day_free);
}

#[test]
fn scenario_e_removed_class_leaves_inert_marks() {
    let state = scenario_a()
        .set_day_mark(
            monday(),
            vec![ClassMark::new("A", ClassStatus::Absence)],
            false,
        )
        .remove_class("A");
    assert!(state.classes.is_empty());
    assert!(state.semester.week_schedule.monday.classes.is_empty());
    let mark = state.marks.get(&monday()).expect("mark kept");
    assert_eq!(mark.class_marks, vec![ClassMark::new("A", ClassStatus::Absence)]);
    assert!(state.class_stats().is_empty());
}

#[test]
fn all_day_free_supersedes_recorded_class_statuses() {
    let state = scenario_a().set_day_mark(
        monday(),
        vec![ClassMark::new("A", ClassStatus::Absence)],
        true,
    );
    assert_eq!(state.class_status(monday(), "A"), ClassStatus::Free);
    // recorded marks are kept, just superseded
    assert_eq!(
        state.day_mark_for(monday()).recorded_status("A"),
        Some(ClassStatus::Absence)
    );
    assert_eq!(state.class_stats()[0].absence_count, 0);
}

#[test]
fn unmarked_day_synthesizes_empty_mark() {
    let state = scenario_a();
    let mark = state.day_mark_for(d(2025, 3, 11));
    assert_eq!(mark.date, d(2025, 3, 11));
    assert!(mark.class_marks.is_empty());
    assert!(!mark.all_day_free);
    assert_eq!(state.class_status(d(2025, 3, 11), "A"), ClassStatus::Regular);
}

#[test]
fn dangling_schedule_codes_are_skipped() {
    let state = scenario_a().set_day_schedule(Weekday::Mon, vec!["GHOST".into(), "A".into()]);
    assert!(state.is_class_day(monday()));
    let codes: Vec<&str> = state
        .classes_on_date(monday())
        .iter()
        .map(|c| c.code.as_str())
        .collect();
    assert_eq!(codes, vec!["A"]);
    assert!(state.meets_on("A", monday()));
    assert!(!state.meets_on("GHOST", monday()));
}

#[test]
fn class_day_only_needs_a_listed_code() {
    let state = CalendarState::new(SemesterConfig::new(monday(), monday()))
        .set_day_schedule(Weekday::Mon, vec!["GHOST".into()]);
    assert!(state.is_class_day(monday()));
    assert!(state.classes_on_date(monday()).is_empty());
    assert!(!state.is_class_day(d(2025, 3, 11)));
}

#[test]
fn class_stats_are_sorted_and_count_each_meeting() {
    let state = two_week_state()
        .set_day_mark(
            d(2025, 3, 10),
            vec![
                ClassMark::new("MATH", ClassStatus::Absence),
                ClassMark::new("BIO", ClassStatus::Free),
            ],
            false,
        )
        .set_day_mark(d(2025, 3, 12), vec![], true);

    let stats = state.class_stats();
    let codes: Vec<&str> = stats.iter().map(|s| s.code.as_str()).collect();
    assert_eq!(codes, vec!["BIO", "MATH"]);

    let bio = &stats[0];
    assert_eq!(bio.total_days, 2);
    assert_eq!(bio.free_count, 1);
    assert_eq!(bio.remaining_percentage, 100.0);

    let math = &stats[1];
    assert_eq!(math.total_days, 4);
    assert_eq!(math.absence_count, 1);
    assert_eq!(math.free_count, 1);
    assert_eq!(math.remaining_percentage, 95.0);
}

#[test]
fn class_never_scheduled_in_range_is_untouched() {
    let state = two_week_state().add_class(Class::new("ART", "Drawing", 20.0));
    let stats = state.class_stats();
    let art = stats.iter().find(|s| s.code == "ART").unwrap();
    assert_eq!(art.total_days, 0);
    assert_eq!(art.remaining_percentage, 100.0);
    assert_eq!(art.absence_count + art.free_count, 0);
}

#[test]
fn remaining_percentage_never_goes_negative() {
    let mut state = CalendarState::new(SemesterConfig::new(d(2025, 3, 10), d(2025, 5, 30)))
        .add_class(Class::new("HEAVY", "Heavy", 40.0))
        .set_day_schedule(Weekday::Mon, vec!["HEAVY".into()]);
    for week in 0..5 {
        let date = d(2025, 3, 10) + chrono::Duration::weeks(week);
        state = state.set_day_mark(date, vec![ClassMark::new("HEAVY", ClassStatus::Absence)], false);
    }
    let stats = state.class_stats();
    assert_eq!(stats[0].absence_count, 5);
    assert_eq!(stats[0].remaining_percentage, 0.0);
}

#[test]
fn marks_outside_semester_are_ignored_but_kept() {
    let state = scenario_a().set_day_mark(
        d(2025, 3, 17),
        vec![ClassMark::new("A", ClassStatus::Absence)],
        false,
    );
    assert!(!state.is_within_semester(d(2025, 3, 17)));
    assert_eq!(state.marks.len(), 1);
    assert_eq!(state.class_stats()[0].absence_count, 0);
    assert_eq!(state.semester_stats(monday()).total_absences, 0);
}

#[test]
fn reversed_semester_yields_empty_statistics() {
    let state = two_week_state().set_semester_period(d(2025, 3, 23), d(2025, 3, 10));
    let semester = state.semester_stats(d(2025, 3, 1));
    assert_eq!(semester.total_class_days, 0);
    assert_eq!(semester.free_days, 0);
    assert!(state.class_stats().iter().all(|s| s.total_days == 0));
}

#[test]
fn semester_stats_split_past_and_future_days() {
    let state = two_week_state()
        .set_day_mark(
            d(2025, 3, 10),
            vec![ClassMark::new("MATH", ClassStatus::Absence)],
            false,
        )
        .set_day_mark(
            d(2025, 3, 17),
            vec![ClassMark::new("BIO", ClassStatus::Free)],
            false,
        )
        .set_day_mark(d(2025, 3, 19), vec![], true);

    // today is Monday of week two: it still counts as available
    let stats = state.semester_stats(d(2025, 3, 17));
    // Mondays: 2 classes each, Wednesdays: 1 class (the second one is free)
    assert_eq!(stats.total_class_days, 5);
    assert_eq!(stats.free_days, 1);
    assert_eq!(stats.total_absences, 1);
    // 03-17 MATH (BIO is free)
    assert_eq!(stats.available_class_days, 1);
    assert_eq!(
        stats.to_cli_summary(),
        "classes=5, available=1, free_days=1, absences=1"
    );
}

#[test]
fn day_mode_reflects_the_recorded_statuses() {
    let state = two_week_state();
    let date = d(2025, 3, 10);
    assert_eq!(state.day_mode(date), DayMode::AllRegular);

    let absent = state.set_day_mode(date, DayMode::AllAbsence);
    assert_eq!(absent.day_mode(date), DayMode::AllAbsence);

    let mixed = state.set_day_mark(date, vec![ClassMark::new("BIO", ClassStatus::Free)], false);
    assert_eq!(mixed.day_mode(date), DayMode::Individual);

    let free = state.set_day_mode(date, DayMode::AllFree);
    assert_eq!(free.day_mode(date), DayMode::AllFree);

    // a day without classes has no bulk mode
    assert_eq!(state.day_mode(d(2025, 3, 11)), DayMode::Individual);
}

#[test]
fn threshold_bands_use_inclusive_upper_bounds() {
    let colors = PercentageColorConfig::default();
    assert_eq!(colors.classify(75.0), ThresholdBand::Low);
    assert_eq!(colors.classify(75.5), ThresholdBand::Caution);
    assert_eq!(colors.classify(85.0), ThresholdBand::Caution);
    assert_eq!(colors.classify(85.1), ThresholdBand::Healthy);

    let state = scenario_a().set_day_mark(
        monday(),
        vec![ClassMark::new("A", ClassStatus::Absence)],
        false,
    );
    assert_eq!(state.class_stats()[0].band(&colors), ThresholdBand::Healthy);
}

#[test]
fn status_and_mode_names_parse_loosely_and_reject_unknown_words() {
    assert_eq!(" Absent ".parse::<ClassStatus>().unwrap(), ClassStatus::Absence);
    assert_eq!("free".parse::<ClassStatus>().unwrap(), ClassStatus::Free);

    let err = "bogus".parse::<ClassStatus>().unwrap_err();
    assert_eq!(err.to_string(), "unknown class status 'bogus'");
    let err: Box<dyn std::error::Error> = Box::new("weekend".parse::<DayMode>().unwrap_err());
    assert_eq!(err.to_string(), "unknown day mode 'weekend'");
}
