//! Datenbankmodelle fuer Werkhof
//!
//! Diese Typen repraesentieren Datensaetze aus der Datenbank.
//! Sie sind von den HTTP-Antworttypen getrennt und dienen als reine
//! Datenuebertragungsobjekte.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use werkhof_core::{NamespaceId, OwnerTyp, UserId};

// ---------------------------------------------------------------------------
// Benutzer
// ---------------------------------------------------------------------------

/// Benutzer-Datensatz aus der Datenbank
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenutzerRecord {
    pub id: UserId,
    pub email: String,
    pub username: String,
    pub name: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub public_email: bool,
    pub is_admin: bool,
    pub namespace_id: Option<NamespaceId>,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub verified_at: Option<DateTime<Utc>>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub last_login_ip: Option<String>,
    pub register_ip: String,
}

impl BenutzerRecord {
    /// Ein Konto gilt als aktiv, sobald `verified_at` gesetzt ist
    pub fn ist_verifiziert(&self) -> bool {
        self.verified_at.is_some()
    }

    pub fn ist_geloescht(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Daten zum Erstellen eines neuen Benutzers
///
/// Neue Benutzer sind immer unverifiziert; `verified_at`, `deleted_at` und
/// die Login-Felder bleiben leer.
#[derive(Debug, Clone)]
pub struct NeuerBenutzer<'a> {
    pub email: &'a str,
    pub username: &'a str,
    pub name: &'a str,
    pub password_hash: &'a str,
    pub public_email: bool,
    pub is_admin: bool,
    pub register_ip: &'a str,
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

/// Session-Datensatz aus der Datenbank
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: i64,
    pub owner_id: UserId,
    pub token: String,
    pub client_ip: String,
    pub created_at: DateTime<Utc>,
    pub expired_at: DateTime<Utc>,
}

impl SessionRecord {
    /// Gueltig genau dann, wenn `expired_at >= jetzt` (wie in den SQL-Abfragen)
    pub fn ist_gueltig(&self) -> bool {
        self.gueltig_am(Utc::now())
    }

    /// Der Ablaufzeitpunkt selbst zaehlt noch als gueltig
    pub fn gueltig_am(&self, zeitpunkt: DateTime<Utc>) -> bool {
        self.expired_at >= zeitpunkt
    }
}

/// Daten zum Anlegen einer Session
#[derive(Debug, Clone)]
pub struct NeueSession<'a> {
    pub owner_id: UserId,
    pub token: &'a str,
    pub client_ip: &'a str,
    pub created_at: DateTime<Utc>,
    pub expired_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Namespaces
// ---------------------------------------------------------------------------

/// Namespace-Datensatz aus der Datenbank
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceRecord {
    pub id: NamespaceId,
    pub owner_id: i64,
    pub owner_typ: OwnerTyp,
    pub path: String,
}

/// Daten zum Anlegen eines Namespaces
#[derive(Debug, Clone)]
pub struct NeuerNamespace<'a> {
    pub owner_id: i64,
    pub owner_typ: OwnerTyp,
    pub path: &'a str,
}

// ---------------------------------------------------------------------------
// Zusammengesetzte Sichten
// ---------------------------------------------------------------------------

/// Benutzer zusammen mit seinem (optionalen) Namespace
#[derive(Debug, Clone, Serialize)]
pub struct BenutzerMitNamespace {
    pub benutzer: BenutzerRecord,
    pub namespace: Option<NamespaceRecord>,
}

impl BenutzerMitNamespace {
    pub fn namespace_path(&self) -> Option<&str> {
        self.namespace.as_ref().map(|n| n.path.as_str())
    }
}

/// Ergebnis der Login-Transaktion
#[derive(Debug, Clone)]
pub struct LoginErgebnis {
    pub session: SessionRecord,
    pub namespace: Option<NamespaceRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn session_ist_bis_einschliesslich_ablauf_gueltig() {
        let ablauf = Utc::now() + Duration::days(1);
        let s = SessionRecord {
            id: 1,
            owner_id: UserId(1),
            token: "t".into(),
            client_ip: "127.0.0.1".into(),
            created_at: ablauf - Duration::days(30),
            expired_at: ablauf,
        };
        assert!(s.gueltig_am(ablauf - Duration::seconds(1)));
        assert!(s.gueltig_am(ablauf));
        assert!(!s.gueltig_am(ablauf + Duration::microseconds(1)));
        assert!(s.ist_gueltig());
    }
}
