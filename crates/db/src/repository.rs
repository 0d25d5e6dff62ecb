//! Repository-Trait-Definitionen
//!
//! Das Repository-Pattern entkoppelt die Geschaeftslogik von der konkreten
//! Datenbank-Implementierung. `SqliteDb` implementiert alle Traits.

use serde::{Deserialize, Serialize};
use werkhof_core::{NamespaceId, OwnerTyp, UserId};

use crate::error::DbError;
use crate::models::{
    BenutzerMitNamespace, BenutzerRecord, LoginErgebnis, NamespaceRecord, NeueSession,
    NeuerBenutzer, NeuerNamespace, SessionRecord,
};

/// Result-Alias fuer Datenbankoperationen
pub type DbResult<T> = Result<T, DbError>;

/// Tabellennamen der drei Relationen
///
/// Werden beim Oeffnen der Datenbank explizit uebergeben. Namen muessen
/// einfache Bezeichner sein (`[A-Za-z_][A-Za-z0-9_]*`) und werden in SQL
/// immer in doppelte Anfuehrungszeichen gesetzt (`user` ist in PostgreSQL
/// ein reserviertes Wort).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tabellennamen {
    pub benutzer: String,
    pub session: String,
    pub namespace: String,
}

impl Default for Tabellennamen {
    fn default() -> Self {
        Self {
            benutzer: "user".into(),
            session: "session".into(),
            namespace: "namespace".into(),
        }
    }
}

impl Tabellennamen {
    /// Prueft alle Namen auf gueltige Bezeichner und Eindeutigkeit
    pub fn validieren(&self) -> DbResult<()> {
        for name in [&self.benutzer, &self.session, &self.namespace] {
            if !bezeichner_gueltig(name) {
                return Err(DbError::UngueltigeDaten(format!(
                    "Ungueltiger Tabellenname '{name}'"
                )));
            }
        }
        if self.benutzer == self.session
            || self.benutzer == self.namespace
            || self.session == self.namespace
        {
            return Err(DbError::UngueltigeDaten(
                "Tabellennamen muessen verschieden sein".into(),
            ));
        }
        Ok(())
    }

    pub fn benutzer_q(&self) -> String {
        quote(&self.benutzer)
    }

    pub fn session_q(&self) -> String {
        quote(&self.session)
    }

    pub fn namespace_q(&self) -> String {
        quote(&self.namespace)
    }
}

fn quote(name: &str) -> String {
    format!("\"{name}\"")
}

fn bezeichner_gueltig(name: &str) -> bool {
    let mut zeichen = name.chars();
    match zeichen.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    zeichen.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Konfiguration fuer die Datenbankverbindung
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Verbindungs-URL (z.B. "sqlite://werkhof.db")
    pub url: String,
    /// Maximale Anzahl gleichzeitiger Verbindungen im Pool
    pub max_verbindungen: u32,
    /// Ob WAL-Modus bei SQLite aktiviert werden soll
    pub sqlite_wal: bool,
    pub tabellen: Tabellennamen,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://werkhof.db".into(),
            max_verbindungen: 5,
            sqlite_wal: true,
            tabellen: Tabellennamen::default(),
        }
    }
}

/// Repository fuer Benutzer-Datenzugriffe
///
/// Alle lesenden Methoden liefern ausschliesslich normale (nicht geloeschte)
/// Benutzer.
#[allow(async_fn_in_trait)]
pub trait UserRepository: Send + Sync {
    /// Legt einen neuen (unverifizierten) Benutzer an
    async fn create(&self, data: NeuerBenutzer<'_>) -> DbResult<BenutzerRecord>;

    async fn get_by_id(&self, id: UserId) -> DbResult<Option<BenutzerRecord>>;

    async fn get_by_username(&self, username: &str) -> DbResult<Option<BenutzerRecord>>;

    async fn get_by_email(&self, email: &str) -> DbResult<Option<BenutzerRecord>>;

    /// True wenn ein normaler Benutzer mit diesem Namen oder dieser E-Mail
    /// existiert. Leere Argumente werden uebersprungen.
    async fn exists_email_or_username(&self, username: &str, email: &str) -> DbResult<bool>;

    /// Seitenweise Liste (OFFSET = page * per), sortiert nach ID
    async fn list_all(&self, page: u64, per: u64) -> DbResult<Vec<BenutzerRecord>>;

    /// Alle Administratoren inklusive Namespace
    async fn list_admins(&self) -> DbResult<Vec<BenutzerMitNamespace>>;

    /// Setzt Zeitpunkt und IP des letzten Logins
    async fn update_login(&self, id: UserId, client_ip: &str) -> DbResult<()>;

    async fn update_namespace(&self, id: UserId, namespace_id: NamespaceId) -> DbResult<()>;

    /// Setzt `verified_at`, sofern der Benutzer noch inaktiv ist.
    /// Gibt zurueck ob eine Zeile geaendert wurde.
    async fn activate(&self, id: UserId) -> DbResult<bool>;

    /// Weicher Loeschvorgang: setzt `deleted_at`
    async fn soft_delete(&self, id: UserId) -> DbResult<bool>;

    /// Benutzer zu einem noch gueltigen Session-Token (Join auf die Session-Tabelle)
    async fn get_by_session_token(&self, token: &str) -> DbResult<Option<BenutzerRecord>>;
}

/// Repository fuer Session-Datenzugriffe
#[allow(async_fn_in_trait)]
pub trait SessionRepository: Send + Sync {
    async fn create(&self, data: NeueSession<'_>) -> DbResult<SessionRecord>;

    /// Session zum Token, nur wenn noch nicht abgelaufen
    async fn get_valid(&self, token: &str) -> DbResult<Option<SessionRecord>>;
}

/// Repository fuer Namespace-Datenzugriffe
#[allow(async_fn_in_trait)]
pub trait NamespaceRepository: Send + Sync {
    async fn create(&self, data: NeuerNamespace<'_>) -> DbResult<NamespaceRecord>;

    async fn get(&self, id: NamespaceId) -> DbResult<Option<NamespaceRecord>>;

    async fn get_by_owner(
        &self,
        owner_id: i64,
        owner_typ: OwnerTyp,
    ) -> DbResult<Option<NamespaceRecord>>;

    /// Bulk-Abfrage fuer mehrere Owner in einer einzigen Query
    async fn list_by_owners(
        &self,
        owner_typ: OwnerTyp,
        owner_ids: &[i64],
    ) -> DbResult<Vec<NamespaceRecord>>;
}

/// Mehrschrittige Schreibvorgaenge, die atomar in einer Transaktion laufen
#[allow(async_fn_in_trait)]
pub trait LoginRepository: Send + Sync {
    /// Login-Metadaten aktualisieren, Session anlegen und Namespace laden.
    /// Schlaegt ein Schritt fehl, wird nichts davon festgeschrieben.
    async fn login_festschreiben(
        &self,
        user_id: UserId,
        client_ip: &str,
        session: NeueSession<'_>,
    ) -> DbResult<LoginErgebnis>;

    /// Benutzer und zugehoerigen Benutzer-Namespace anlegen und verknuepfen
    async fn registrierung_festschreiben(
        &self,
        benutzer: NeuerBenutzer<'_>,
        namespace_path: &str,
    ) -> DbResult<BenutzerMitNamespace>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_config_standard() {
        let cfg = DatabaseConfig::default();
        assert!(cfg.sqlite_wal);
        assert_eq!(cfg.max_verbindungen, 5);
        assert_eq!(cfg.tabellen.benutzer, "user");
    }

    #[test]
    fn tabellennamen_werden_gequotet() {
        let t = Tabellennamen::default();
        assert_eq!(t.benutzer_q(), "\"user\"");
        assert_eq!(t.session_q(), "\"session\"");
    }

    #[test]
    fn tabellennamen_validierung() {
        assert!(Tabellennamen::default().validieren().is_ok());

        let boese = Tabellennamen {
            benutzer: "user\"; DROP TABLE x; --".into(),
            ..Default::default()
        };
        assert!(matches!(boese.validieren(), Err(DbError::UngueltigeDaten(_))));

        let doppelt = Tabellennamen {
            session: "user".into(),
            ..Default::default()
        };
        assert!(doppelt.validieren().is_err());

        let ziffer = Tabellennamen {
            namespace: "1ns".into(),
            ..Default::default()
        };
        assert!(ziffer.validieren().is_err());
    }
}
