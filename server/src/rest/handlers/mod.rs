//! REST-Handler Module

pub mod auth;
pub mod users;

use chrono::{DateTime, Utc};
use serde::Serialize;
use werkhof_db::models::BenutzerRecord;

/// Oeffentliche Sicht auf einen Benutzer
///
/// Die E-Mail-Adresse erscheint nur, wenn sie freigegeben ist oder der
/// Benutzer sich selbst abfragt.
#[derive(Debug, Serialize)]
pub struct BenutzerProfil {
    pub id: i64,
    pub username: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub is_admin: bool,
    pub verified: bool,
    pub namespace_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl BenutzerProfil {
    pub fn aus_record(b: BenutzerRecord, namespace_path: Option<String>, email_zeigen: bool) -> Self {
        let verified = b.ist_verifiziert();
        Self {
            id: b.id.inner(),
            username: b.username,
            name: b.name,
            email: (email_zeigen || b.public_email).then_some(b.email),
            is_admin: b.is_admin,
            verified,
            namespace_path,
            created_at: b.created_at,
            last_login_at: b.last_login_at,
        }
    }
}
