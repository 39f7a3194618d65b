#![forbid(unsafe_code)]
use chrono::{NaiveDate, NaiveTime, Timelike};
use chrono_tz::Tz;
use insta::assert_snapshot;
use releve::{
    build_timeline, CalendarEnv, LocaleCalendar, NoHolidays, Phase, PhaseTiming, ShiftContext,
    ShiftSystem, SystemId, TimelineItem,
};
use std::collections::BTreeSet;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn seven() -> NaiveTime {
    NaiveTime::from_hms_opt(7, 0, 0).unwrap()
}

fn phases(items: &[TimelineItem]) -> String {
    items
        .iter()
        .map(|i| i.phase.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

#[test]
fn prefix_is_stable_for_every_cyclic_system() {
    let calendar = LocaleCalendar::utc();
    let env = CalendarEnv::new(&calendar, &NoHolidays);
    let start = date(2026, 2, 20);

    for id in SystemId::ALL {
        let ctx = ShiftContext::new(id, seven(), date(2026, 3, 1)).with_setup_index(1);
        let short = build_timeline(&ctx, &env, start, 30);
        let long = build_timeline(&ctx, &env, start, 31);
        assert_eq!(short.len(), 30, "{id}");
        assert_eq!(long.len(), 31, "{id}");
        assert_eq!(&long[..30], &short[..], "{id}");
    }
}

#[test]
fn negative_offset_uses_mathematical_modulo() {
    let calendar = LocaleCalendar::utc();
    let env = CalendarEnv::without_holidays(&calendar);
    let start = date(2026, 5, 1);
    let ctx = ShiftContext::new(SystemId::ThreeShiftTwoOff, seven(), date(2026, 5, 8))
        .with_setup_index(0);

    let timeline = build_timeline(&ctx, &env, start, 8);
    // (0 - 7) mod 5 = 3
    assert_eq!(timeline[0].phase, Phase::Off);
    assert_snapshot!(phases(&timeline), @"off,off,morning,evening,night,off,off,morning");
    assert_eq!(timeline[7].date, ctx.reference_date);
}

#[test]
fn twenty_four_forty_eight_round_trip() {
    let calendar = LocaleCalendar::utc();
    let env = CalendarEnv::without_holidays(&calendar);
    let d = date(2026, 1, 5);
    let ctx = ShiftContext::new(SystemId::TwentyFourFortyEight, seven(), d).with_setup_index(0);

    let got: Vec<Phase> = build_timeline(&ctx, &env, d, 4)
        .into_iter()
        .map(|i| i.phase)
        .collect();
    assert_eq!(got, vec![Phase::Morning, Phase::Off, Phase::Off, Phase::Morning]);
}

#[test]
fn setup_index_wraps_and_accepts_negative_values() {
    let calendar = LocaleCalendar::utc();
    let env = CalendarEnv::without_holidays(&calendar);
    let d = date(2026, 1, 5);
    let negative =
        ShiftContext::new(SystemId::TwentyFourFortyEight, seven(), d).with_setup_index(-1);
    let wrapped =
        ShiftContext::new(SystemId::TwentyFourFortyEight, seven(), d).with_setup_index(5);

    assert_eq!(
        build_timeline(&negative, &env, d, 6),
        build_timeline(&wrapped, &env, d, 6)
    );
    assert_eq!(build_timeline(&negative, &env, d, 1)[0].phase, Phase::Off);
}

#[test]
fn start_phase_anchors_on_first_matching_position() {
    let calendar = LocaleCalendar::utc();
    let env = CalendarEnv::without_holidays(&calendar);
    let d = date(2026, 4, 1);
    let ctx = ShiftContext::new(SystemId::FourTeamThreeShift, seven(), d)
        .with_start_phase(Phase::Evening);

    let timeline = build_timeline(&ctx, &env, d, 8);
    assert_snapshot!(phases(&timeline), @"evening,evening,night,night,off,off,morning,morning");
}

#[test]
fn setup_index_wins_over_start_phase() {
    let calendar = LocaleCalendar::utc();
    let env = CalendarEnv::without_holidays(&calendar);
    let d = date(2026, 4, 1);
    let ctx = ShiftContext::new(SystemId::ThreeShiftTwoOff, seven(), d)
        .with_start_phase(Phase::Night)
        .with_setup_index(0);

    assert_eq!(build_timeline(&ctx, &env, d, 1)[0].phase, Phase::Morning);
}

#[test]
fn unresolved_anchor_yields_empty_timeline() {
    let calendar = LocaleCalendar::utc();
    let env = CalendarEnv::without_holidays(&calendar);
    let d = date(2026, 4, 1);

    let unset = ShiftContext::new(SystemId::ThreeShiftTwoOff, seven(), d);
    assert!(build_timeline(&unset, &env, d, 10).is_empty());

    // pas de poste du soir dans un 12/36
    let absent = ShiftContext::new(SystemId::TwelveThirtySix, seven(), d)
        .with_start_phase(Phase::Evening);
    assert!(build_timeline(&absent, &env, d, 10).is_empty());
}

#[test]
fn fixed_week_ignores_anchor_and_honours_weekend_and_holidays() {
    let calendar = LocaleCalendar::from_identifier("Europe/Paris").unwrap();
    let holidays: BTreeSet<NaiveDate> = [date(2026, 5, 1)].into_iter().collect();
    let env = CalendarEnv::new(&calendar, &holidays);
    // lundi 27 avril 2026
    let ctx = ShiftContext::new(SystemId::StandardWeek, seven(), date(2000, 1, 1))
        .with_setup_index(3);

    let timeline = build_timeline(&ctx, &env, date(2026, 4, 27), 7);
    assert_snapshot!(phases(&timeline), @"morning,morning,morning,morning,off,off,off");
}

#[test]
fn timeline_stops_at_the_last_representable_date() {
    let calendar = LocaleCalendar::utc();
    let env = CalendarEnv::without_holidays(&calendar);
    let cyclic = ShiftContext::new(SystemId::ThreeShiftTwoOff, seven(), date(2026, 1, 1))
        .with_setup_index(0);
    let fixed = ShiftContext::new(SystemId::StandardWeek, seven(), date(2026, 1, 1));

    for ctx in [&cyclic, &fixed] {
        let last = build_timeline(ctx, &env, NaiveDate::MAX, u32::MAX);
        assert_eq!(last.len(), 1, "{}", ctx.system);
        assert_eq!(last[0].date, NaiveDate::MAX);

        let before = NaiveDate::MAX.pred_opt().unwrap();
        assert_eq!(build_timeline(ctx, &env, before, u32::MAX).len(), 2);
    }
}

#[test]
fn timeline_items_order_by_date() {
    let calendar = LocaleCalendar::utc();
    let env = CalendarEnv::without_holidays(&calendar);
    let ctx = ShiftContext::new(SystemId::FourTeamThreeShift, seven(), date(2026, 2, 1))
        .with_setup_index(2);

    let timeline = build_timeline(&ctx, &env, date(2026, 2, 1), 12);
    let mut shuffled: Vec<TimelineItem> = timeline.iter().rev().copied().collect();
    shuffled.sort();
    assert_eq!(shuffled, timeline);
    assert!(Phase::Morning < Phase::Off);
}

#[test]
fn schedule_pairs_each_day_with_its_interval() {
    let calendar = LocaleCalendar::from_identifier("Europe/Paris").unwrap();
    let env = CalendarEnv::without_holidays(&calendar);
    let ctx = ShiftContext::new(
        SystemId::ThreeShiftTwoOff,
        NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
        date(2026, 1, 10),
    )
    .with_setup_index(0);
    let system = ShiftSystem::for_context(&ctx);

    let schedule = system.schedule(&ctx, &env, date(2026, 1, 10), 5);
    let items: Vec<TimelineItem> = schedule.iter().map(|day| day.item).collect();
    assert_eq!(items, system.build_timeline(&ctx, &env, date(2026, 1, 10), 5));

    for day in &schedule {
        match &day.interval {
            Some(interval) => {
                assert_eq!(interval.date, day.item.date);
                assert_eq!(interval.phase, day.item.phase);
            }
            None => assert_eq!(day.item.phase, Phase::Off),
        }
    }
    let evening = schedule[1].interval.as_ref().unwrap();
    assert_eq!(evening.start.to_rfc3339(), "2026-01-11T14:00:00+01:00");
    assert!(schedule[3].interval.is_none());
}

#[test]
fn time_logic_per_system() {
    let three = ShiftSystem::from_id(SystemId::ThreeShiftTwoOff);
    assert_eq!(three.time_logic(Phase::Morning), PhaseTiming::new(0, 8));
    assert_eq!(three.time_logic(Phase::Evening), PhaseTiming::new(8, 8));
    assert_eq!(three.time_logic(Phase::Night), PhaseTiming::new(16, 8));
    assert_eq!(three.time_logic(Phase::Off), PhaseTiming::NONE);

    let guard = ShiftSystem::from_id(SystemId::TwentyFourSeventyTwo);
    assert_eq!(guard.time_logic(Phase::Morning), PhaseTiming::new(0, 24));
    assert_eq!(guard.time_logic(Phase::Off), PhaseTiming::new(0, 0));
    assert_eq!(guard.base_duration_minutes(), 1440);
    assert_eq!(ShiftSystem::from_id(SystemId::TwelveThirtySix).base_duration_minutes(), 720);
}

#[test]
fn night_shift_interval_crosses_midnight() {
    let calendar = LocaleCalendar::from_identifier("Europe/Paris").unwrap();
    let ctx = ShiftContext::new(
        SystemId::ThreeShiftTwoOff,
        NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
        date(2026, 1, 10),
    )
    .with_setup_index(0);
    let system = ShiftSystem::for_context(&ctx);

    let night = system
        .shift_interval(&ctx, &calendar, date(2026, 1, 10), Phase::Night)
        .unwrap();
    assert_eq!(night.start.to_rfc3339(), "2026-01-10T22:00:00+01:00");
    assert_eq!(night.end.to_rfc3339(), "2026-01-11T06:00:00+01:00");
    assert_eq!(night.duration_minutes(), 480);

    assert!(system
        .shift_interval(&ctx, &calendar, date(2026, 1, 10), Phase::Off)
        .is_none());
}

#[test]
fn shift_start_in_skipped_hour_moves_past_the_gap() {
    let calendar = LocaleCalendar::new(Tz::America__New_York);
    let ctx = ShiftContext::new(
        SystemId::StandardWeek,
        NaiveTime::from_hms_opt(2, 30, 0).unwrap(),
        date(2026, 3, 2),
    );
    let system = ShiftSystem::for_context(&ctx);

    let interval = system
        .shift_interval(&ctx, &calendar, date(2026, 3, 8), Phase::Morning)
        .unwrap();
    assert_eq!(interval.start.hour(), 3);
    assert_eq!(interval.start.minute(), 0);
    assert_eq!(interval.start.to_rfc3339(), "2026-03-08T03:00:00-04:00");
}

#[test]
fn system_ids_parse_and_display() {
    for id in SystemId::ALL {
        let parsed: SystemId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }
    assert!("five-on-five-off".parse::<SystemId>().is_err());
}
