//! Fehlertypen fuer Werkhof
//!
//! Zentraler Fehler-Enum fuer Start- und Konfigurationsfehler.
//! Die Fach-Crates (db, auth) definieren eigene Fehler; dieser Enum
//! fasst sie auf Prozessebene zusammen.

use thiserror::Error;

/// Globaler Result-Alias fuer Werkhof
pub type Result<T> = std::result::Result<T, WerkhofError>;

/// Fehler auf Prozessebene (Start, Konfiguration)
#[derive(Debug, Error)]
pub enum WerkhofError {
    #[error("Konfigurationsfehler: {0}")]
    Konfiguration(String),

    #[error("Datenbankfehler: {0}")]
    Datenbank(String),

    #[error("Interner Fehler: {0}")]
    Intern(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl WerkhofError {
    pub fn konfiguration(msg: impl Into<String>) -> Self {
        Self::Konfiguration(msg.into())
    }

    /// Erstellt einen internen Fehler aus einer beliebigen Nachricht
    pub fn intern(msg: impl Into<String>) -> Self {
        Self::Intern(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fehler_anzeige() {
        let e = WerkhofError::konfiguration("api_port darf nicht 0 sein");
        assert_eq!(e.to_string(), "Konfigurationsfehler: api_port darf nicht 0 sein");
    }

    #[test]
    fn anyhow_ist_transparent() {
        let e: WerkhofError = anyhow::anyhow!("kaputt").into();
        assert_eq!(e.to_string(), "kaputt");
    }
}
