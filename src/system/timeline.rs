use super::{CalendarEnv, FIXED_WEEKEND};
use crate::calendar::LocaleCalendar;
use crate::model::{Phase, ShiftContext, TimelineItem};
use chrono::NaiveDate;

/// Position du cycle correspondant à `ctx.reference_date`.
pub(super) fn resolve_anchor(cycle: &[Phase], ctx: &ShiftContext) -> Option<usize> {
    if cycle.is_empty() {
        return None;
    }
    if let Some(index) = ctx.setup_index {
        return Some(index.rem_euclid(cycle.len() as i64) as usize);
    }
    let phase = ctx.start_phase?;
    cycle.iter().position(|p| *p == phase)
}

pub(super) fn cyclic(
    cycle: &'static [Phase],
    ctx: &ShiftContext,
    calendar: &LocaleCalendar,
    start: NaiveDate,
    day_count: u32,
) -> Vec<TimelineItem> {
    let Some(anchor) = resolve_anchor(cycle, ctx) else {
        return Vec::new();
    };
    let len = cycle.len() as i64;
    let anchor = anchor as i64;

    days(calendar, start, day_count)
        .map(|date| {
            let diff = calendar.days_between(ctx.reference_date, date);
            // rem_euclid : jamais d'indice négatif quand date < reference_date
            let index = (anchor + diff).rem_euclid(len) as usize;
            TimelineItem {
                date,
                phase: cycle[index],
            }
        })
        .collect()
}

pub(super) fn fixed_week(
    env: &CalendarEnv<'_>,
    start: NaiveDate,
    day_count: u32,
) -> Vec<TimelineItem> {
    days(env.calendar, start, day_count)
        .map(|date| TimelineItem {
            date,
            phase: classify_fixed_week(env, date),
        })
        .collect()
}

/// Jours successifs depuis `start`, arrêtés au premier débordement de date.
fn days(
    calendar: &LocaleCalendar,
    start: NaiveDate,
    day_count: u32,
) -> impl Iterator<Item = NaiveDate> + '_ {
    (0..day_count).map_while(move |offset| {
        let date = calendar.add_days(start, i64::from(offset));
        if date.is_none() {
            tracing::debug!(%start, offset, "date overflow, timeline truncated");
        }
        date
    })
}

fn classify_fixed_week(env: &CalendarEnv<'_>, date: NaiveDate) -> Phase {
    let weekday = env.calendar.weekday(date);
    if FIXED_WEEKEND.contains(&weekday) || env.holidays.is_holiday(date) {
        Phase::Off
    } else {
        Phase::Morning
    }
}
