//! Détection des changements d'heure et ajustement des heures de prise de poste.
//!
//! Politique de résolution :
//! - passage à l'heure d'été : une heure locale sautée est avancée à la
//!   première heure pleine valide après le trou (minutes et secondes à zéro),
//!   y compris pour les trous d'une demi-heure ;
//! - retour à l'heure d'hiver : une heure locale dupliquée est toujours
//!   résolue sur sa PREMIÈRE occurrence. C'est une simplification assumée :
//!   aucune tentative de distinguer la seconde occurrence.

use crate::calendar::LocaleCalendar;
use crate::storage::KeyValueStore;
use anyhow::Context;
use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Clé du drapeau d'activation dans le magasin clé/valeur (0 = désactivé).
pub const DST_FLAG_KEY: &str = "dst.validation_enabled";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DstTransition {
    SpringForward,
    FallBack,
}

/// Résultat d'une vérification d'heure de poste.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DstCheck {
    pub is_in_window: bool,
    pub transition: Option<DstTransition>,
    pub adjusted_time: Option<DateTime<Tz>>,
    pub message: Option<String>,
}

impl DstCheck {
    /// Pas de changement d'heure ce jour-là (ou vérification désactivée).
    pub fn clean() -> Self {
        Self {
            is_in_window: false,
            transition: None,
            adjusted_time: None,
            message: None,
        }
    }

    fn in_window(
        transition: DstTransition,
        adjusted_time: Option<DateTime<Tz>>,
        message: String,
    ) -> Self {
        Self {
            is_in_window: true,
            transition: Some(transition),
            adjusted_time,
            message: Some(message),
        }
    }
}

/// Validateur pur ; seul l'état du drapeau le paramètre.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DstValidator {
    enabled: bool,
}

impl Default for DstValidator {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl DstValidator {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Lit le drapeau dans le magasin ; absent = activé.
    pub fn from_store(store: &dyn KeyValueStore) -> anyhow::Result<Self> {
        let flag = store
            .get_int(DST_FLAG_KEY)
            .with_context(|| format!("reading {DST_FLAG_KEY}"))?;
        Ok(Self {
            enabled: flag.map_or(true, |v| v != 0),
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Compare le décalage UTC à l'entrée du jour et à l'entrée du lendemain.
    pub fn transition_on(date: NaiveDate, tz: Tz) -> Option<DstTransition> {
        let calendar = LocaleCalendar::new(tz);
        let next = calendar.add_days(date, 1)?;
        let today = calendar.utc_offset_entering_day(date)?;
        let tomorrow = calendar.utc_offset_entering_day(next)?;
        match tomorrow.cmp(&today) {
            std::cmp::Ordering::Greater => Some(DstTransition::SpringForward),
            std::cmp::Ordering::Less => Some(DstTransition::FallBack),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Vérifie une heure de poste locale dans le fuseau `tz`.
    ///
    /// Désactivé, le validateur répond toujours « propre » : l'appelant ne
    /// peut pas en déduire que la détection a eu lieu.
    pub fn validate_shift_time(&self, local: NaiveDateTime, tz: Tz) -> DstCheck {
        if !self.enabled {
            return DstCheck::clean();
        }
        let Some(transition) = Self::transition_on(local.date(), tz) else {
            return DstCheck::clean();
        };
        let calendar = LocaleCalendar::new(tz);

        match (transition, tz.from_local_datetime(&local)) {
            (DstTransition::SpringForward, LocalResult::None) => {
                let adjusted = calendar.first_valid_after_gap(local);
                tracing::debug!(
                    %local,
                    timezone = %tz.name(),
                    ?adjusted,
                    "shift time in skipped hour"
                );
                let message = match adjusted {
                    Some(at) => format!(
                        "{local} does not exist in {}; moved to {}",
                        tz.name(),
                        at.to_rfc3339()
                    ),
                    None => format!("{local} does not exist in {}", tz.name()),
                };
                DstCheck::in_window(transition, adjusted, message)
            }
            (DstTransition::FallBack, LocalResult::Ambiguous(first, _)) => {
                tracing::debug!(
                    %local,
                    timezone = %tz.name(),
                    "ambiguous shift time, first occurrence"
                );
                let message = format!(
                    "{local} occurs twice in {}; first occurrence {} used",
                    tz.name(),
                    first.to_rfc3339()
                );
                DstCheck::in_window(transition, Some(first), message)
            }
            (DstTransition::SpringForward, _) => DstCheck::in_window(
                transition,
                None,
                format!("clocks move forward in {} on {}", tz.name(), local.date()),
            ),
            (DstTransition::FallBack, _) => DstCheck::in_window(
                transition,
                None,
                format!("clocks move back in {} on {}", tz.name(), local.date()),
            ),
        }
    }
}
