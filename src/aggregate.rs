//! Bilan des jours et minutes travaillés sur une plage de dates.

use crate::model::{AggregateResult, DateRange, DayTally, ShiftContext, TimelineItem};
use crate::providers::{EventAdjustmentProvider, LeaveProvider};
use crate::system::{CalendarEnv, ShiftSystem};

/// Agrégateur sans état : calendrier et jours fériés injectés à la construction.
#[derive(Debug, Clone, Copy)]
pub struct WorkDaysAggregator<'a> {
    env: CalendarEnv<'a>,
}

impl<'a> WorkDaysAggregator<'a> {
    pub fn new(env: CalendarEnv<'a>) -> Self {
        Self { env }
    }

    /// Minutes nettes d'une journée travaillée : base moins pause, au minimum 0.
    pub fn net_daily_minutes(ctx: &ShiftContext) -> i64 {
        let base = ctx
            .flexibility
            .daily_minutes
            .unwrap_or_else(|| ShiftSystem::for_context(ctx).base_duration_minutes());
        (i64::from(base) - i64::from(ctx.flexibility.break_minutes)).max(0)
    }

    /// Détail par jour travaillé, dans l'ordre chronologique.
    pub fn breakdown(
        &self,
        range: DateRange,
        ctx: &ShiftContext,
        leaves: &dyn LeaveProvider,
        events: &dyn EventAdjustmentProvider,
    ) -> Vec<DayTally> {
        if range.is_inverted() {
            return Vec::new();
        }
        let system = ShiftSystem::for_context(ctx);
        let timeline = system.build_timeline(ctx, &self.env, range.start, range.day_count());
        self.breakdown_timeline(ctx, &timeline, leaves, events)
    }

    /// Détail d'une frise déjà construite (par exemple celle affichée à l'utilisateur).
    ///
    /// En semaine fixe, un jour férié n'est jamais compté, même si la frise
    /// fournie le marque travaillé.
    pub fn breakdown_timeline(
        &self,
        ctx: &ShiftContext,
        timeline: &[TimelineItem],
        leaves: &dyn LeaveProvider,
        events: &dyn EventAdjustmentProvider,
    ) -> Vec<DayTally> {
        let net_daily = Self::net_daily_minutes(ctx);
        let fixed_week = ShiftSystem::for_context(ctx).is_fixed_week();

        timeline
            .iter()
            .filter(|item| item.phase.is_counted_as_work_day())
            .filter(|item| !(fixed_week && self.env.holidays.is_holiday(item.date)))
            .map(|item| {
                let leave = leaves.leave_on(item.date);
                let deductible = leave.is_some_and(|leave| leave.deductible);
                let minutes = if deductible {
                    0
                } else {
                    net_daily
                        .saturating_add(events.net_minutes_adjustment(item.date))
                        .max(0)
                };
                DayTally {
                    date: item.date,
                    phase: item.phase,
                    deducted: deductible,
                    leave: leave.map(|leave| leave.kind),
                    minutes,
                }
            })
            .collect()
    }

    /// Bilan de la plage ; une plage inversée rend un bilan nul.
    pub fn aggregate(
        &self,
        range: DateRange,
        ctx: &ShiftContext,
        leaves: &dyn LeaveProvider,
        events: &dyn EventAdjustmentProvider,
    ) -> AggregateResult {
        let days = self.breakdown(range, ctx, leaves, events);
        let mut result = AggregateResult::default();
        for day in &days {
            result.scheduled_work_days += 1;
            if day.deducted {
                result.effective_deduction_days += 1;
            }
            result.net_working_minutes = result.net_working_minutes.saturating_add(day.minutes);
        }
        result.net_working_days = result
            .scheduled_work_days
            .saturating_sub(result.effective_deduction_days);
        tracing::debug!(
            start = %range.start,
            end = %range.end,
            scheduled = result.scheduled_work_days,
            deducted = result.effective_deduction_days,
            "aggregated work days"
        );
        result
    }
}
