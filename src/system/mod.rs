//! Systèmes de roulement : ensemble fermé de variantes choisies par identifiant.

mod cycles;
mod timeline;

pub use cycles::{phase_cycle, time_logic};

use crate::calendar::LocaleCalendar;
use crate::error::ReleveError;
use crate::model::{
    Phase, PhaseTiming, ScheduledDay, ShiftContext, ShiftInterval, TimelineItem,
};
use crate::providers::{HolidayCalendar, NoHolidays};
use chrono::{NaiveDate, TimeDelta, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Jours de repos de la semaine fixe (constantes, pas de dérivation locale).
pub const FIXED_WEEKEND: [Weekday; 2] = [Weekday::Sat, Weekday::Sun];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SystemId {
    StandardWeek,
    ThreeShiftTwoOff,
    FourTeamThreeShift,
    TwelveThirtySix,
    TwentyFourFortyEight,
    TwentyFourSeventyTwo,
}

impl SystemId {
    pub const ALL: [SystemId; 6] = [
        SystemId::StandardWeek,
        SystemId::ThreeShiftTwoOff,
        SystemId::FourTeamThreeShift,
        SystemId::TwelveThirtySix,
        SystemId::TwentyFourFortyEight,
        SystemId::TwentyFourSeventyTwo,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SystemId::StandardWeek => "standard-week",
            SystemId::ThreeShiftTwoOff => "three-shift-two-off",
            SystemId::FourTeamThreeShift => "four-team-three-shift",
            SystemId::TwelveThirtySix => "twelve-thirty-six",
            SystemId::TwentyFourFortyEight => "twenty-four-forty-eight",
            SystemId::TwentyFourSeventyTwo => "twenty-four-seventy-two",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            SystemId::StandardWeek => "semaine fixe, repos samedi et dimanche",
            SystemId::ThreeShiftTwoOff => "3x8 : matin, soir, nuit puis 2 jours de repos",
            SystemId::FourTeamThreeShift => "4 équipes : 2 matins, 2 soirs, 2 nuits, 2 repos",
            SystemId::TwelveThirtySix => "12h jour, 12h nuit, 2 repos",
            SystemId::TwentyFourFortyEight => "24h de garde, 48h de repos",
            SystemId::TwentyFourSeventyTwo => "24h de garde, 72h de repos",
        }
    }
}

impl fmt::Display for SystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SystemId {
    type Err = ReleveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SystemId::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ReleveError::UnknownSystem(s.to_string()))
    }
}

/// Calendrier actif + jours fériés, passés explicitement à chaque calcul.
#[derive(Clone, Copy)]
pub struct CalendarEnv<'a> {
    pub calendar: &'a LocaleCalendar,
    pub holidays: &'a dyn HolidayCalendar,
}

impl<'a> CalendarEnv<'a> {
    pub fn new(calendar: &'a LocaleCalendar, holidays: &'a dyn HolidayCalendar) -> Self {
        Self { calendar, holidays }
    }

    pub fn without_holidays(calendar: &'a LocaleCalendar) -> Self {
        Self {
            calendar,
            holidays: &NoHolidays,
        }
    }
}

impl fmt::Debug for CalendarEnv<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CalendarEnv")
            .field("calendar", self.calendar)
            .finish_non_exhaustive()
    }
}

/// Semaine fixe : indépendante de tout ancrage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FixedWeek;

/// Roulement cyclique : seuls le contenu du cycle et les horaires diffèrent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CyclicSystem {
    id: SystemId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftSystem {
    FixedWeek(FixedWeek),
    Cyclic(CyclicSystem),
}

impl ShiftSystem {
    pub fn from_id(id: SystemId) -> Self {
        match id {
            SystemId::StandardWeek => ShiftSystem::FixedWeek(FixedWeek),
            other => ShiftSystem::Cyclic(CyclicSystem { id: other }),
        }
    }

    pub fn for_context(ctx: &ShiftContext) -> Self {
        Self::from_id(ctx.system)
    }

    pub fn id(&self) -> SystemId {
        match self {
            ShiftSystem::FixedWeek(_) => SystemId::StandardWeek,
            ShiftSystem::Cyclic(c) => c.id,
        }
    }

    pub fn is_fixed_week(&self) -> bool {
        matches!(self, ShiftSystem::FixedWeek(_))
    }

    pub fn phase_cycle(&self) -> &'static [Phase] {
        phase_cycle(self.id())
    }

    pub fn time_logic(&self, phase: Phase) -> PhaseTiming {
        time_logic(self.id(), phase)
    }

    /// Durée de la plus longue phase travaillée, en minutes.
    pub fn base_duration_minutes(&self) -> u32 {
        self.phase_cycle()
            .iter()
            .filter(|p| p.is_counted_as_work_day())
            .map(|p| self.time_logic(*p).duration_hours * 60)
            .max()
            .unwrap_or(0)
    }

    /// Frise de `day_count` jours à partir de `start`.
    ///
    /// Le cycle utilisé est celui de `self` ; `ctx` ne fournit que l'ancrage.
    /// Un ancrage non résolu rend une frise vide.
    pub fn build_timeline(
        &self,
        ctx: &ShiftContext,
        env: &CalendarEnv<'_>,
        start: NaiveDate,
        day_count: u32,
    ) -> Vec<TimelineItem> {
        match self {
            ShiftSystem::FixedWeek(_) => timeline::fixed_week(env, start, day_count),
            ShiftSystem::Cyclic(c) => {
                timeline::cyclic(phase_cycle(c.id), ctx, env.calendar, start, day_count)
            }
        }
    }

    /// Instants de début/fin du poste `phase` le jour `date`.
    ///
    /// `None` pour le repos ou une phase sans durée dans ce système.
    pub fn shift_interval(
        &self,
        ctx: &ShiftContext,
        calendar: &LocaleCalendar,
        date: NaiveDate,
        phase: Phase,
    ) -> Option<ShiftInterval> {
        let timing = self.time_logic(phase);
        if !phase.is_counted_as_work_day() || timing.duration_hours == 0 {
            return None;
        }
        let local_start = date
            .and_time(ctx.shift_start)
            .checked_add_signed(TimeDelta::hours(i64::from(timing.start_offset_hours)))?;
        let start = calendar.resolve_local(local_start)?;
        let end = start.checked_add_signed(TimeDelta::hours(i64::from(timing.duration_hours)))?;
        Some(ShiftInterval {
            date,
            phase,
            start,
            end,
        })
    }

    /// Frise et instants des jours travaillés, en une seule passe.
    pub fn schedule(
        &self,
        ctx: &ShiftContext,
        env: &CalendarEnv<'_>,
        start: NaiveDate,
        day_count: u32,
    ) -> Vec<ScheduledDay> {
        self.build_timeline(ctx, env, start, day_count)
            .into_iter()
            .map(|item| ScheduledDay {
                item,
                interval: self.shift_interval(ctx, env.calendar, item.date, item.phase),
            })
            .collect()
    }
}

/// Frise du système désigné par `ctx.system`.
pub fn build_timeline(
    ctx: &ShiftContext,
    env: &CalendarEnv<'_>,
    start: NaiveDate,
    day_count: u32,
) -> Vec<TimelineItem> {
    ShiftSystem::for_context(ctx).build_timeline(ctx, env, start, day_count)
}
