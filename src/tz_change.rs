//! Détection d'un changement de fuseau de l'appareil entre deux activations.
//!
//! Sondage manuel : l'hôte appelle `check_for_change` à la reprise de
//! l'application, depuis un seul point d'entrée.

use crate::calendar::{parse_timezone, LocaleCalendar};
use crate::model::TimezoneSnapshot;
use crate::storage::KeyValueStore;
use anyhow::Context;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

pub const TZ_IDENTIFIER_KEY: &str = "timezone.identifier";
pub const TZ_OFFSET_KEY: &str = "timezone.utc_offset_seconds";

/// Changement détecté entre le fuseau mémorisé et le fuseau courant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimezoneChange {
    pub old_timezone: String,
    pub new_timezone: String,
    /// Écart en heures entières, tronqué vers zéro.
    pub hours_difference: i32,
    pub is_significant: bool,
}

#[derive(Debug)]
pub struct TimezoneChangeDetector<S> {
    store: S,
}

impl<S: KeyValueStore> TimezoneChangeDetector<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Instantané mémorisé ; un identifiant illisible compte comme absent.
    pub fn snapshot(&self) -> anyhow::Result<Option<TimezoneSnapshot>> {
        let Some(identifier) = self
            .store
            .get_string(TZ_IDENTIFIER_KEY)
            .with_context(|| format!("reading {TZ_IDENTIFIER_KEY}"))?
        else {
            return Ok(None);
        };
        let Ok(tz) = parse_timezone(&identifier) else {
            tracing::warn!(%identifier, "stored timezone is not a known identifier, ignored");
            return Ok(None);
        };
        let offset = self
            .store
            .get_int(TZ_OFFSET_KEY)
            .with_context(|| format!("reading {TZ_OFFSET_KEY}"))?
            .and_then(|v| i32::try_from(v).ok())
            .unwrap_or_else(|| LocaleCalendar::new(tz).utc_offset_seconds(Utc::now()));
        Ok(Some(TimezoneSnapshot {
            identifier,
            utc_offset_seconds: offset,
        }))
    }

    fn persist(&mut self, snapshot: &TimezoneSnapshot) -> anyhow::Result<()> {
        self.store
            .set_string(TZ_IDENTIFIER_KEY, &snapshot.identifier)
            .with_context(|| "persisting timezone identifier")?;
        self.store
            .set_int(TZ_OFFSET_KEY, i64::from(snapshot.utc_offset_seconds))
            .with_context(|| "persisting timezone offset")?;
        Ok(())
    }

    /// Compare le fuseau `current` (décalage évalué à `now`) à l'instantané.
    ///
    /// - premier passage : mémorise `current`, rien à signaler ;
    /// - identifiant différent : mémorise `current`, rend le changement ;
    /// - identifiant identique : rien à signaler, aucune écriture.
    pub fn check_for_change(
        &mut self,
        current: Tz,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Option<TimezoneChange>> {
        let current_snapshot = TimezoneSnapshot {
            identifier: current.name().to_string(),
            utc_offset_seconds: LocaleCalendar::new(current).utc_offset_seconds(now),
        };

        let Some(previous) = self.snapshot()? else {
            tracing::debug!(timezone = %current_snapshot.identifier, "first run, timezone stored");
            self.persist(&current_snapshot)?;
            return Ok(None);
        };

        if previous.identifier == current_snapshot.identifier {
            return Ok(None);
        }

        let hours_difference =
            (current_snapshot.utc_offset_seconds - previous.utc_offset_seconds) / 3600;
        let change = TimezoneChange {
            old_timezone: previous.identifier,
            new_timezone: current_snapshot.identifier.clone(),
            hours_difference,
            is_significant: hours_difference.abs() >= 1,
        };
        tracing::info!(
            old = %change.old_timezone,
            new = %change.new_timezone,
            hours = change.hours_difference,
            "timezone change detected"
        );
        self.persist(&current_snapshot)?;
        Ok(Some(change))
    }

    /// Variante horodatée à l'instant présent.
    pub fn check_now(&mut self, current: Tz) -> anyhow::Result<Option<TimezoneChange>> {
        self.check_for_change(current, Utc::now())
    }
}
