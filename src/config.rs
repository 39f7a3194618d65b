//! Profil utilisateur persisté en JSON : ancrage du roulement, fuseau, fériés.
//!
//! Le drapeau de validation DST n'en fait pas partie : il vit dans le magasin d'état.

use crate::calendar::LocaleCalendar;
use crate::error::ReleveError;
use crate::model::ShiftContext;
use crate::storage::write_atomic;
use crate::system::CalendarEnv;
use anyhow::Context;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

fn default_timezone() -> String {
    "UTC".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub context: ShiftContext,
    /// Identifiant IANA du calendrier actif.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub holidays: BTreeSet<NaiveDate>,
}

impl Profile {
    pub fn new<S: Into<String>>(context: ShiftContext, timezone: S) -> Self {
        Self {
            context,
            timezone: timezone.into(),
            holidays: BTreeSet::new(),
        }
    }

    /// Charge et valide (le fuseau doit être connu).
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let profile: Profile = serde_json::from_slice(&data)
            .with_context(|| format!("parsing profile {}", path.display()))?;
        profile
            .calendar()
            .with_context(|| format!("validating profile {}", path.display()))?;
        Ok(profile)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        self.calendar()?;
        let json = serde_json::to_vec_pretty(self)?;
        write_atomic(path.as_ref(), &json)
            .with_context(|| format!("writing profile {}", path.as_ref().display()))
    }

    pub fn calendar(&self) -> Result<LocaleCalendar, ReleveError> {
        LocaleCalendar::from_identifier(&self.timezone)
    }

    pub fn env<'a>(&'a self, calendar: &'a LocaleCalendar) -> CalendarEnv<'a> {
        CalendarEnv::new(calendar, &self.holidays)
    }
}
