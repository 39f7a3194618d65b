#![forbid(unsafe_code)]
use chrono::{NaiveDate, NaiveDateTime, Timelike, Utc};
use chrono_tz::Tz;
use releve::dst::DST_FLAG_KEY;
use releve::{DstCheck, DstTransition, DstValidator, KeyValueStore, MemoryStore};

fn local(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn detects_transitions_from_day_entry_offsets() {
    let ny = Tz::America__New_York;
    assert_eq!(
        DstValidator::transition_on(date(2026, 3, 8), ny),
        Some(DstTransition::SpringForward)
    );
    assert_eq!(
        DstValidator::transition_on(date(2026, 11, 1), ny),
        Some(DstTransition::FallBack)
    );
    assert_eq!(DstValidator::transition_on(date(2026, 3, 7), ny), None);
    assert_eq!(DstValidator::transition_on(date(2026, 3, 8), Tz::Asia__Tokyo), None);
    assert_eq!(
        DstValidator::transition_on(date(2026, 3, 29), Tz::Europe__Paris),
        Some(DstTransition::SpringForward)
    );
}

#[test]
fn skipped_hour_is_advanced_with_minutes_zeroed() {
    let check = DstValidator::new(true)
        .validate_shift_time(local("2026-03-08 02:30:45"), Tz::America__New_York);

    assert!(check.is_in_window);
    assert_eq!(check.transition, Some(DstTransition::SpringForward));
    let adjusted = check.adjusted_time.unwrap();
    assert_eq!(adjusted.hour(), 3);
    assert_eq!(adjusted.minute(), 0);
    assert_eq!(adjusted.second(), 0);
    assert_eq!(adjusted.to_rfc3339(), "2026-03-08T03:00:00-04:00");
    assert!(check.message.is_some());
}

#[test]
fn valid_time_on_transition_day_is_not_adjusted() {
    let check = DstValidator::default()
        .validate_shift_time(local("2026-03-08 09:00:00"), Tz::America__New_York);

    assert!(check.is_in_window);
    assert_eq!(check.transition, Some(DstTransition::SpringForward));
    assert!(check.adjusted_time.is_none());
}

#[test]
fn ambiguous_time_resolves_to_first_occurrence() {
    let check = DstValidator::default()
        .validate_shift_time(local("2026-11-01 01:30:00"), Tz::America__New_York);

    assert_eq!(check.transition, Some(DstTransition::FallBack));
    let adjusted = check.adjusted_time.unwrap();
    // première occurrence : encore en EDT (UTC-4)
    assert_eq!(adjusted.to_rfc3339(), "2026-11-01T01:30:00-04:00");
    assert_eq!(adjusted.with_timezone(&Utc).hour(), 5);
}

#[test]
fn ordinary_day_is_clean() {
    let check = DstValidator::default()
        .validate_shift_time(local("2026-06-15 02:30:00"), Tz::America__New_York);
    assert_eq!(check, DstCheck::clean());
}

#[test]
fn disabled_validator_always_reports_clean() {
    let check = DstValidator::new(false)
        .validate_shift_time(local("2026-03-08 02:30:00"), Tz::America__New_York);
    assert_eq!(check, DstCheck::clean());
}

#[test]
fn flag_is_read_from_the_store() {
    let mut store = MemoryStore::new();
    assert!(DstValidator::from_store(&store).unwrap().is_enabled());

    store.set_int(DST_FLAG_KEY, 0).unwrap();
    assert!(!DstValidator::from_store(&store).unwrap().is_enabled());

    store.set_int(DST_FLAG_KEY, 1).unwrap();
    assert!(DstValidator::from_store(&store).unwrap().is_enabled());
}

#[test]
fn transition_at_local_midnight_belongs_to_the_day_it_opens() {
    // Santiago : 00:00 → 01:00 le 6 septembre, 24:00 → 23:00 le 4 avril
    let santiago = Tz::America__Santiago;
    assert_eq!(DstValidator::transition_on(date(2026, 9, 5), santiago), None);
    assert_eq!(
        DstValidator::transition_on(date(2026, 9, 6), santiago),
        Some(DstTransition::SpringForward)
    );
    assert_eq!(DstValidator::transition_on(date(2026, 9, 7), santiago), None);
    assert_eq!(
        DstValidator::transition_on(date(2026, 4, 4), santiago),
        Some(DstTransition::FallBack)
    );
    assert_eq!(DstValidator::transition_on(date(2026, 4, 5), santiago), None);
}

#[test]
fn midnight_gap_is_adjusted_on_its_own_day() {
    let validator = DstValidator::default();
    let santiago = Tz::America__Santiago;

    let skipped = validator.validate_shift_time(local("2026-09-06 00:30:00"), santiago);
    assert_eq!(skipped.transition, Some(DstTransition::SpringForward));
    assert_eq!(
        skipped.adjusted_time.unwrap().to_rfc3339(),
        "2026-09-06T01:00:00-03:00"
    );

    let later = validator.validate_shift_time(local("2026-09-06 10:00:00"), santiago);
    assert!(later.is_in_window);
    assert!(later.adjusted_time.is_none());

    let eve = validator.validate_shift_time(local("2026-09-05 23:30:00"), santiago);
    assert_eq!(eve, DstCheck::clean());

    let repeated = validator.validate_shift_time(local("2026-04-04 23:30:00"), santiago);
    assert_eq!(repeated.transition, Some(DstTransition::FallBack));
    assert_eq!(
        repeated.adjusted_time.unwrap().to_rfc3339(),
        "2026-04-04T23:30:00-03:00"
    );
}

#[test]
fn half_hour_gap_moves_to_the_next_whole_hour() {
    // Lord Howe : 02:00 → 02:30, seule une demi-heure disparaît
    let check = DstValidator::default()
        .validate_shift_time(local("2026-10-04 02:10:00"), Tz::Australia__Lord_Howe);

    assert_eq!(check.transition, Some(DstTransition::SpringForward));
    assert_eq!(
        check.adjusted_time.unwrap().to_rfc3339(),
        "2026-10-04T03:00:00+11:00"
    );
}
