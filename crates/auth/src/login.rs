//! Anfrage- und Antworttypen fuer Login und Registrierung

use serde::{Deserialize, Serialize};

use crate::error::{AuthError, AuthResult};

/// Login-Anfrage; `email` darf auch ein Benutzername sein
#[derive(Debug, Clone, Deserialize)]
pub struct LoginAnfrage {
    pub email: String,
    pub password: String,
}

/// Antwort auf einen erfolgreichen Login
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginAntwort {
    pub token: String,
    pub namespace_path: Option<String>,
    pub name: String,
    pub email: String,
    pub public_email: bool,
}

/// Wie ein Login-Bezeichner aufgeloest wird
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kennung<'a> {
    Email(&'a str),
    Username(&'a str),
}

impl<'a> Kennung<'a> {
    /// Enthaelt der Bezeichner ein `@`, ist es eine E-Mail-Adresse
    pub fn aufloesen(bezeichner: &'a str) -> Self {
        if bezeichner.contains('@') {
            Self::Email(bezeichner)
        } else {
            Self::Username(bezeichner)
        }
    }

    pub fn als_str(&self) -> &'a str {
        match self {
            Self::Email(s) | Self::Username(s) => s,
        }
    }
}

/// Registrierungsanfrage
#[derive(Debug, Clone, Deserialize)]
pub struct Registrierung {
    pub email: String,
    pub username: String,
    #[serde(default)]
    pub name: String,
    pub password: String,
    #[serde(default)]
    pub public_email: bool,
}

const MAX_USERNAME_LAENGE: usize = 40;

impl Registrierung {
    /// Grundlegende Formpruefung vor jedem Datenbankzugriff
    pub fn pruefen(&self) -> AuthResult<()> {
        let username = self.username.trim();
        if username.is_empty() {
            return Err(AuthError::UngueltigeEingabe("Benutzername fehlt".into()));
        }
        if username.len() > MAX_USERNAME_LAENGE {
            return Err(AuthError::UngueltigeEingabe(format!(
                "Benutzername laenger als {MAX_USERNAME_LAENGE} Zeichen"
            )));
        }
        // Der Benutzername wird zum Namespace-Pfad
        if !username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
        {
            return Err(AuthError::UngueltigeEingabe(format!(
                "Benutzername '{username}' enthaelt ungueltige Zeichen"
            )));
        }
        let email = self.email.trim();
        if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
            return Err(AuthError::UngueltigeEingabe(format!(
                "Ungueltige E-Mail-Adresse '{email}'"
            )));
        }
        if self.password.is_empty() {
            return Err(AuthError::UngueltigeEingabe("Passwort fehlt".into()));
        }
        Ok(())
    }

    /// Anzeigename; faellt auf den Benutzernamen zurueck
    pub fn anzeigename(&self) -> &str {
        let name = self.name.trim();
        if name.is_empty() {
            self.username.trim()
        } else {
            name
        }
    }
}
