//! Session-Ausgabe fuer Werkhof
//!
//! Sessions liegen in der Datenbank (siehe `werkhof_db::SessionRepository`).
//! Hier werden nur Token erzeugt und die Lebensdauer festgelegt; die
//! gespeicherte `expired_at` ist fuer die Gueltigkeit massgeblich.

use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use werkhof_core::UserId;
use werkhof_db::models::NeueSession;

/// Standard-Session-Lebensdauer: 30 Tage
pub const SESSION_TTL_TAGE: i64 = 30;

/// Lebensdauer neu ausgegebener Sessions
#[derive(Debug, Clone, Copy)]
pub struct SessionRichtlinie {
    pub ttl: Duration,
}

impl Default for SessionRichtlinie {
    fn default() -> Self {
        Self {
            ttl: Duration::days(SESSION_TTL_TAGE),
        }
    }
}

impl SessionRichtlinie {
    pub fn mit_tagen(tage: i64) -> Self {
        Self {
            ttl: Duration::days(tage),
        }
    }

    /// Ablaufzeitpunkt einer jetzt erstellten Session
    pub fn ablauf_ab(&self, erstellt_am: DateTime<Utc>) -> DateTime<Utc> {
        erstellt_am + self.ttl
    }

    /// Lebensdauer in Sekunden (fuer Cookie `Max-Age`)
    pub fn ttl_sekunden(&self) -> i64 {
        self.ttl.num_seconds()
    }
}

/// Frisch erzeugtes Session-Token samt Zeitstempeln, bereit zum Speichern
#[derive(Debug, Clone)]
pub struct SessionEntwurf {
    pub token: String,
    pub created_at: DateTime<Utc>,
    pub expired_at: DateTime<Utc>,
}

impl SessionEntwurf {
    pub fn neu(richtlinie: &SessionRichtlinie) -> Self {
        let jetzt = Utc::now();
        Self {
            token: token_generieren(),
            created_at: jetzt,
            expired_at: richtlinie.ablauf_ab(jetzt),
        }
    }

    pub fn als_neue_session<'a>(&'a self, owner_id: UserId, client_ip: &'a str) -> NeueSession<'a> {
        NeueSession {
            owner_id,
            token: &self.token,
            client_ip,
            created_at: self.created_at,
            expired_at: self.expired_at,
        }
    }
}

/// Generiert einen kryptografisch sicheren Session-Token (URL-sicheres Base64)
pub fn token_generieren() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    base64::Engine::encode(&base64::engine::general_purpose::URL_SAFE_NO_PAD, bytes)
}
