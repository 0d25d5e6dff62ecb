//! Fehlertypen fuer das Datenbank-Crate

use thiserror::Error;

/// Datenbank-Fehlertypen
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Datensatz nicht gefunden: {0}")]
    NichtGefunden(String),

    #[error("Eindeutigkeitsverletzung: {0}")]
    Eindeutigkeit(String),

    #[error("Ungueltige Daten: {0}")]
    UngueltigeDaten(String),

    #[error("SQL-Fehler: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Interner DB-Fehler: {0}")]
    Intern(String),
}

impl DbError {
    pub fn nicht_gefunden(msg: impl Into<String>) -> Self {
        Self::NichtGefunden(msg.into())
    }

    pub fn intern(msg: impl Into<String>) -> Self {
        Self::Intern(msg.into())
    }

    /// Uebersetzt einen SQLx-Fehler; UNIQUE-Verletzungen werden zu
    /// `Eindeutigkeit` mit dem gegebenen Kontext, alles andere bleibt `Sqlx`.
    pub(crate) fn aus_sqlx(e: sqlx::Error, kontext: impl FnOnce() -> String) -> Self {
        let unique = e
            .as_database_error()
            .map(|d| d.is_unique_violation())
            .unwrap_or(false);
        if unique {
            Self::Eindeutigkeit(kontext())
        } else {
            Self::Sqlx(e)
        }
    }

    /// Gibt true zurueck wenn es sich um einen Eindeutigkeitsfehler handelt
    ///
    /// Nur `Eindeutigkeit` zaehlt; die Einordnung passiert in `aus_sqlx`.
    pub fn ist_eindeutigkeit(&self) -> bool {
        matches!(self, Self::Eindeutigkeit(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nur_eindeutigkeit_ist_eindeutigkeit() {
        assert!(DbError::Eindeutigkeit("x".into()).ist_eindeutigkeit());
        assert!(!DbError::nicht_gefunden("x").ist_eindeutigkeit());
        assert!(!DbError::intern("UNIQUE constraint failed").ist_eindeutigkeit());
    }

    #[test]
    fn sqlx_fehler_mit_unique_im_text_ist_keine_eindeutigkeit() {
        let e = DbError::Sqlx(sqlx::Error::Protocol("unique: UNIQUE constraint failed".into()));
        assert!(!e.ist_eindeutigkeit());

        let e = DbError::aus_sqlx(sqlx::Error::RowNotFound, || "kontext".into());
        assert!(matches!(e, DbError::Sqlx(_)));
        assert!(!e.ist_eindeutigkeit());
    }
}
