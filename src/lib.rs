#![forbid(unsafe_code)]
//! Relève — moteur de roulements d'équipes et de bilans de temps de travail.
//!
//! - Cycles de postes (3x8, 4 équipes, 12/36, 24/48, 24/72) et semaine fixe.
//! - Instants exacts de prise et de fin de poste, fuseau et changement d'heure compris.
//! - Bilans jours/minutes tenant compte des congés et ajustements fournis par l'hôte.
//! - Détection des changements de fuseau entre deux activations.
//!
//! Tout le calcul est pur ; seul le détecteur de fuseau écrit dans un magasin.

pub mod aggregate;
pub mod calendar;
pub mod config;
pub mod dst;
pub mod error;
pub mod io;
pub mod model;
pub mod providers;
pub mod storage;
pub mod system;
pub mod tz_change;

pub use aggregate::WorkDaysAggregator;
pub use calendar::LocaleCalendar;
pub use config::Profile;
pub use dst::{DstCheck, DstTransition, DstValidator};
pub use error::ReleveError;
pub use model::{
    AggregateResult, DateRange, DayTally, Flexibility, LeaveKind, LeaveRecord, Phase,
    PhaseTiming, ScheduledDay, ShiftContext, ShiftInterval, TimelineItem, TimezoneSnapshot,
};
pub use providers::{
    AdjustmentEvent, AdjustmentKind, EventAdjustmentProvider, EventLedger, HolidayCalendar,
    LeaveProvider, NoAdjustments, NoHolidays, NoLeave,
};
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore};
pub use system::{build_timeline, CalendarEnv, ShiftSystem, SystemId};
pub use tz_change::{TimezoneChange, TimezoneChangeDetector};
