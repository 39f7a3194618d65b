//! Données externes consultées par le cœur (jours fériés, congés, ajustements).
//!
//! Le cœur ne suppose ni ordre ni bornes : une requête par jour, en O(1)
//! ou O(log n) pour les implémentations fournies ici.

use crate::error::ReleveError;
use crate::model::LeaveRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::str::FromStr;

pub trait HolidayCalendar {
    fn is_holiday(&self, date: NaiveDate) -> bool;
}

pub trait LeaveProvider {
    fn leave_on(&self, date: NaiveDate) -> Option<LeaveRecord>;
}

pub trait EventAdjustmentProvider {
    /// Delta signé en minutes (retard négatif, heures sup positives).
    fn net_minutes_adjustment(&self, date: NaiveDate) -> i64;
}

/// Aucun jour férié.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHolidays;

impl HolidayCalendar for NoHolidays {
    fn is_holiday(&self, _date: NaiveDate) -> bool {
        false
    }
}

impl HolidayCalendar for BTreeSet<NaiveDate> {
    fn is_holiday(&self, date: NaiveDate) -> bool {
        self.contains(&date)
    }
}

impl HolidayCalendar for HashSet<NaiveDate> {
    fn is_holiday(&self, date: NaiveDate) -> bool {
        self.contains(&date)
    }
}

/// Aucun congé.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoLeave;

impl LeaveProvider for NoLeave {
    fn leave_on(&self, _date: NaiveDate) -> Option<LeaveRecord> {
        None
    }
}

impl LeaveProvider for BTreeMap<NaiveDate, LeaveRecord> {
    fn leave_on(&self, date: NaiveDate) -> Option<LeaveRecord> {
        self.get(&date).copied()
    }
}

impl LeaveProvider for HashMap<NaiveDate, LeaveRecord> {
    fn leave_on(&self, date: NaiveDate) -> Option<LeaveRecord> {
        self.get(&date).copied()
    }
}

/// Aucun ajustement.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoAdjustments;

impl EventAdjustmentProvider for NoAdjustments {
    fn net_minutes_adjustment(&self, _date: NaiveDate) -> i64 {
        0
    }
}

impl EventAdjustmentProvider for BTreeMap<NaiveDate, i64> {
    fn net_minutes_adjustment(&self, date: NaiveDate) -> i64 {
        self.get(&date).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentKind {
    Lateness,
    EarlyLeave,
    Overtime,
}

impl FromStr for AdjustmentKind {
    type Err = ReleveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "lateness" | "late" => Ok(AdjustmentKind::Lateness),
            "early_leave" | "early" => Ok(AdjustmentKind::EarlyLeave),
            "overtime" => Ok(AdjustmentKind::Overtime),
            _ => Err(ReleveError::UnknownAdjustmentKind(s.to_string())),
        }
    }
}

/// Événement ponctuel modifiant la durée travaillée d'un jour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustmentEvent {
    pub date: NaiveDate,
    pub kind: AdjustmentKind,
    pub minutes: u32,
}

impl AdjustmentEvent {
    pub fn signed_minutes(&self) -> i64 {
        let minutes = i64::from(self.minutes);
        match self.kind {
            AdjustmentKind::Lateness | AdjustmentKind::EarlyLeave => -minutes,
            AdjustmentKind::Overtime => minutes,
        }
    }
}

/// Cumule les événements d'une journée en un seul delta.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLedger {
    deltas: BTreeMap<NaiveDate, i64>,
}

impl EventLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: AdjustmentEvent) {
        let delta = self.deltas.entry(event.date).or_insert(0);
        *delta = delta.saturating_add(event.signed_minutes());
    }
}

impl FromIterator<AdjustmentEvent> for EventLedger {
    fn from_iter<I: IntoIterator<Item = AdjustmentEvent>>(iter: I) -> Self {
        let mut ledger = EventLedger::new();
        for event in iter {
            ledger.record(event);
        }
        ledger
    }
}

impl EventAdjustmentProvider for EventLedger {
    fn net_minutes_adjustment(&self, date: NaiveDate) -> i64 {
        self.deltas.get(&date).copied().unwrap_or(0)
    }
}
