//! Wiederverwendbare SQL-Praedikate und Spalten-Hilfsfunktionen

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::Row;

use crate::error::DbError;
use crate::repository::DbResult;

/// "Normaler" Benutzer: nicht weich geloescht
pub(crate) fn normaler_benutzer(tabelle: &str) -> String {
    format!("{tabelle}.deleted_at IS NULL")
}

/// Weich geloeschter Benutzer
pub(crate) fn geloeschter_benutzer(tabelle: &str) -> String {
    format!("{tabelle}.deleted_at IS NOT NULL")
}

/// Noch nicht aktivierter Benutzer
pub(crate) fn inaktiver_benutzer(tabelle: &str) -> String {
    format!("{tabelle}.verified_at IS NULL")
}

/// Qualifizierte Spaltenliste (`"t".spalte AS spalte, ...`)
pub(crate) fn spalten(tabelle: &str, namen: &[&str]) -> String {
    namen
        .iter()
        .map(|s| format!("{tabelle}.{s} AS {s}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `?, ?, ?` fuer IN-Listen
pub(crate) fn platzhalter(anzahl: usize) -> String {
    vec!["?"; anzahl].join(", ")
}

/// Zeitstempel in fester Breite (Mikrosekunden, `Z`), damit Textvergleich
/// in SQL der zeitlichen Ordnung entspricht
pub(crate) fn zeit_text(zeit: &DateTime<Utc>) -> String {
    zeit.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_datetime(row: &sqlx::sqlite::SqliteRow, col: &str) -> DbResult<DateTime<Utc>> {
    let s: String = row.try_get(col)?;
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DbError::intern(format!("Ungueltige DateTime in '{col}': {e}")))
}

pub(crate) fn parse_opt_datetime(
    row: &sqlx::sqlite::SqliteRow,
    col: &str,
) -> DbResult<Option<DateTime<Utc>>> {
    let s: Option<String> = row.try_get(col)?;
    s.as_deref()
        .map(|v| {
            DateTime::parse_from_rfc3339(v)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| DbError::intern(format!("Ungueltige DateTime in '{col}': {e}")))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn praedikate() {
        assert_eq!(normaler_benutzer("\"user\""), "\"user\".deleted_at IS NULL");
        assert_eq!(inaktiver_benutzer("\"user\""), "\"user\".verified_at IS NULL");
        assert_eq!(geloeschter_benutzer("\"user\""), "\"user\".deleted_at IS NOT NULL");
    }

    #[test]
    fn spaltenliste_ist_qualifiziert() {
        assert_eq!(
            spalten("\"user\"", &["id", "email"]),
            "\"user\".id AS id, \"user\".email AS email"
        );
        assert_eq!(platzhalter(3), "?, ?, ?");
    }

    #[test]
    fn zeit_text_ist_lexikografisch_geordnet() {
        let a = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
        let b = a + Duration::microseconds(1);
        let c = a + Duration::days(30);
        assert_eq!(zeit_text(&a), "2026-01-01T12:00:00.000000Z");
        assert!(zeit_text(&a) < zeit_text(&b));
        assert!(zeit_text(&b) < zeit_text(&c));
    }
}
