use crate::error::ReleveError;
use crate::system::SystemId;
use chrono::{DateTime, NaiveDate, NaiveTime};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Phase d'une journée dans un roulement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Morning,
    Evening,
    Night,
    Off,
}

impl Phase {
    pub const ALL: [Phase; 4] = [Phase::Morning, Phase::Evening, Phase::Night, Phase::Off];

    /// Vrai pour les phases travaillées (matin, soir, nuit).
    pub fn is_counted_as_work_day(self) -> bool {
        !matches!(self, Phase::Off)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Morning => "morning",
            Phase::Evening => "evening",
            Phase::Night => "night",
            Phase::Off => "off",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Phase {
    type Err = ReleveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Phase::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ReleveError::UnknownPhase(s.to_string()))
    }
}

/// Décalage et durée d'une phase, relatifs à l'heure zéro configurée.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseTiming {
    pub start_offset_hours: u32,
    pub duration_hours: u32,
}

impl PhaseTiming {
    pub const NONE: PhaseTiming = PhaseTiming::new(0, 0);

    pub const fn new(start_offset_hours: u32, duration_hours: u32) -> Self {
        Self {
            start_offset_hours,
            duration_hours,
        }
    }
}

/// Souplesse horaire de l'utilisateur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Flexibility {
    /// Pause retranchée de chaque journée travaillée.
    #[serde(default)]
    pub break_minutes: u32,
    /// Remplace la durée de base du système quand renseigné.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_minutes: Option<u32>,
}

/// Ancrage d'un roulement : quel système, quelle position du cycle à quelle date.
///
/// `setup_index` prime sur `start_phase`. Si aucun des deux ne donne de
/// position valide, la frise générée est vide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftContext {
    pub system: SystemId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_phase: Option<Phase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setup_index: Option<i64>,
    pub shift_start: NaiveTime,
    pub reference_date: NaiveDate,
    #[serde(default)]
    pub flexibility: Flexibility,
}

impl ShiftContext {
    pub fn new(system: SystemId, shift_start: NaiveTime, reference_date: NaiveDate) -> Self {
        Self {
            system,
            start_phase: None,
            setup_index: None,
            shift_start,
            reference_date,
            flexibility: Flexibility::default(),
        }
    }

    pub fn with_setup_index(mut self, index: i64) -> Self {
        self.setup_index = Some(index);
        self
    }

    pub fn with_start_phase(mut self, phase: Phase) -> Self {
        self.start_phase = Some(phase);
        self
    }

    pub fn with_break_minutes(mut self, minutes: u32) -> Self {
        self.flexibility.break_minutes = minutes;
        self
    }
}

/// Jour de la frise : date locale + phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimelineItem {
    pub date: NaiveDate,
    pub phase: Phase,
}

/// Instants exacts de début et de fin d'un poste.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftInterval {
    pub date: NaiveDate,
    pub phase: Phase,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl ShiftInterval {
    /// Durée réelle en minutes (un changement d'heure ne la modifie pas).
    pub fn duration_minutes(&self) -> i64 {
        self.end.signed_duration_since(self.start).num_minutes()
    }
}

/// Jour de frise accompagné, s'il est travaillé, de ses instants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledDay {
    pub item: TimelineItem,
    pub interval: Option<ShiftInterval>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveKind {
    Annual,
    Sick,
    Unpaid,
    Excuse,
    Other,
}

impl LeaveKind {
    pub fn as_str(self) -> &'static str {
        match self {
            LeaveKind::Annual => "annual",
            LeaveKind::Sick => "sick",
            LeaveKind::Unpaid => "unpaid",
            LeaveKind::Excuse => "excuse",
            LeaveKind::Other => "other",
        }
    }
}

impl FromStr for LeaveKind {
    type Err = ReleveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "annual" => Ok(LeaveKind::Annual),
            "sick" => Ok(LeaveKind::Sick),
            "unpaid" => Ok(LeaveKind::Unpaid),
            "excuse" => Ok(LeaveKind::Excuse),
            "other" => Ok(LeaveKind::Other),
            _ => Err(ReleveError::UnknownLeaveKind(s.to_string())),
        }
    }
}

/// Congé d'une journée, fourni par l'extérieur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRecord {
    pub kind: LeaveKind,
    pub deductible: bool,
}

impl LeaveRecord {
    pub fn new(kind: LeaveKind, deductible: bool) -> Self {
        Self { kind, deductible }
    }
}

/// Intervalle de jours calendaires, bornes incluses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Construit sans contrôle ; une plage inversée agrège à zéro.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn checked(start: NaiveDate, end: NaiveDate) -> Result<Self, ReleveError> {
        if end < start {
            return Err(ReleveError::InvalidRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    pub fn single(day: NaiveDate) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    pub fn is_inverted(&self) -> bool {
        self.end < self.start
    }

    /// Nombre de jours couverts (0 si inversée).
    pub fn day_count(&self) -> u32 {
        if self.is_inverted() {
            return 0;
        }
        let days = self.end.signed_duration_since(self.start).num_days() + 1;
        u32::try_from(days).unwrap_or(u32::MAX)
    }
}

/// Bilan agrégé sur une plage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AggregateResult {
    pub scheduled_work_days: u32,
    pub effective_deduction_days: u32,
    pub net_working_days: u32,
    pub net_working_minutes: i64,
}

/// Détail d'un jour travaillé dans un bilan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayTally {
    pub date: NaiveDate,
    pub phase: Phase,
    pub deducted: bool,
    /// Nature du congé posé ce jour, déductible ou non.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leave: Option<LeaveKind>,
    pub minutes: i64,
}

/// Fuseau mémorisé entre deux activations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimezoneSnapshot {
    pub identifier: String,
    pub utc_offset_seconds: i32,
}
