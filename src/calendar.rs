//! Calendrier unique lié à un fuseau : toute l'arithmétique de dates passe ici.
//!
//! Les dates manipulées par la lib sont des `NaiveDate` interprétées comme
//! jours locaux de ce fuseau. Résolution des heures locales :
//! - heure sautée (passage à l'heure d'été) : première heure pleine valide après le trou ;
//!   pour un trou d'une demi-heure (Australia/Lord_Howe, 02:00 → 02:30), 02:10
//!   devient donc 03:00 et non 02:30 ;
//! - heure dupliquée (retour à l'heure d'hiver) : première occurrence.

use crate::error::ReleveError;
use chrono::{
    DateTime, Datelike, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeDelta,
    TimeZone, Timelike, Utc, Weekday,
};
use chrono_tz::Tz;

/// Aucun fuseau IANA n'a de trou de plus de quelques heures.
const MAX_GAP_HOURS: u32 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocaleCalendar {
    tz: Tz,
}

impl Default for LocaleCalendar {
    fn default() -> Self {
        Self::utc()
    }
}

impl LocaleCalendar {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn utc() -> Self {
        Self { tz: Tz::UTC }
    }

    /// Construit depuis un identifiant IANA (`Europe/Paris`).
    pub fn from_identifier(identifier: &str) -> Result<Self, ReleveError> {
        parse_timezone(identifier).map(Self::new)
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Premier instant du jour local.
    pub fn start_of_day(&self, date: NaiveDate) -> Option<DateTime<Tz>> {
        self.resolve_local(date.and_time(NaiveTime::MIN))
    }

    /// Résout une heure murale locale en instant, selon la politique du module.
    pub fn resolve_local(&self, local: NaiveDateTime) -> Option<DateTime<Tz>> {
        match self.tz.from_local_datetime(&local) {
            LocalResult::Single(dt) => Some(dt),
            LocalResult::Ambiguous(first, _) => Some(first),
            LocalResult::None => self.first_valid_after_gap(local),
        }
    }

    /// Première heure pleine valide après une heure locale inexistante.
    pub(crate) fn first_valid_after_gap(&self, local: NaiveDateTime) -> Option<DateTime<Tz>> {
        let mut candidate = local.date().and_hms_opt(local.hour(), 0, 0)?;
        for _ in 0..MAX_GAP_HOURS {
            candidate = candidate.checked_add_signed(TimeDelta::hours(1))?;
            if let Some(dt) = self.tz.from_local_datetime(&candidate).earliest() {
                return Some(dt);
            }
        }
        None
    }

    /// Écart en jours calendaires, négatif si `to` précède `from`.
    pub fn days_between(&self, from: NaiveDate, to: NaiveDate) -> i64 {
        to.signed_duration_since(from).num_days()
    }

    pub fn add_days(&self, date: NaiveDate, days: i64) -> Option<NaiveDate> {
        date.checked_add_signed(TimeDelta::try_days(days)?)
    }

    pub fn weekday(&self, date: NaiveDate) -> Weekday {
        date.weekday()
    }

    /// Jour local contenant l'instant donné.
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.tz).date_naive()
    }

    pub fn today(&self) -> NaiveDate {
        self.local_date(Utc::now())
    }

    /// Décalage UTC (secondes) du fuseau à un instant donné.
    pub fn utc_offset_seconds(&self, instant: DateTime<Utc>) -> i32 {
        self.tz
            .offset_from_utc_datetime(&instant.naive_utc())
            .fix()
            .local_minus_utc()
    }

    /// Décalage UTC en vigueur juste avant le premier instant du jour local.
    ///
    /// Un saut placé à minuit pile appartient ainsi au jour qu'il ouvre.
    pub fn utc_offset_entering_day(&self, date: NaiveDate) -> Option<i32> {
        let start = self.start_of_day(date)?;
        let before = start.checked_sub_signed(TimeDelta::seconds(1))?;
        Some(before.offset().fix().local_minus_utc())
    }
}

pub(crate) fn parse_timezone(identifier: &str) -> Result<Tz, ReleveError> {
    identifier
        .trim()
        .parse::<Tz>()
        .map_err(|_| ReleveError::InvalidTimezone(identifier.to_string()))
}
