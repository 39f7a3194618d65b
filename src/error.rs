use thiserror::Error;

/// Erreurs de frontière (parsing, construction de valeurs).
///
/// Le cœur de calcul ne lève jamais : il rend des résultats vides ou nuls.
#[derive(Error, Debug)]
pub enum ReleveError {
    #[error("invalid timezone: {0}")]
    InvalidTimezone(String),
    #[error("unknown shift system: {0}")]
    UnknownSystem(String),
    #[error("unknown phase: {0}")]
    UnknownPhase(String),
    #[error("unknown leave kind: {0}")]
    UnknownLeaveKind(String),
    #[error("unknown adjustment kind: {0}")]
    UnknownAdjustmentKind(String),
    #[error("invalid date range: end {end} is before start {start}")]
    InvalidRange { start: String, end: String },
}
