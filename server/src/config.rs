//! Server-Konfiguration
//!
//! Wird beim Start aus einer TOML-Datei geladen. Alle Felder haben
//! sinnvolle Standardwerte, sodass der Server ohne Konfigurationsdatei
//! lauffaehig ist.

use serde::{Deserialize, Serialize};
use werkhof_auth::SessionRichtlinie;
use werkhof_core::{Result, WerkhofError};
use werkhof_db::{DatabaseConfig, Tabellennamen};

/// Vollstaendige Server-Konfiguration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Allgemeine Server-Einstellungen
    pub server: ServerEinstellungen,
    /// Netzwerk-Einstellungen
    pub netzwerk: NetzwerkEinstellungen,
    /// Datenbank-Einstellungen
    pub datenbank: DatenbankEinstellungen,
    /// Session- und Cookie-Einstellungen
    pub session: SessionEinstellungen,
    /// Logging-Einstellungen
    pub logging: LoggingEinstellungen,
    /// Observability-Einstellungen (Health)
    pub observability: ObservabilityEinstellungen,
}

/// Allgemeine Server-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerEinstellungen {
    /// Anzeigename des Servers
    pub name: String,
}

impl Default for ServerEinstellungen {
    fn default() -> Self {
        Self {
            name: "Werkhof".into(),
        }
    }
}

/// Netzwerk-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetzwerkEinstellungen {
    /// Bind-Adresse fuer die REST-API
    pub bind_adresse: String,
    /// Port fuer die REST-API
    pub api_port: u16,
    /// CORS-Origins fuer REST (leer = alle erlaubt)
    pub cors_origins: Vec<String>,
}

impl Default for NetzwerkEinstellungen {
    fn default() -> Self {
        Self {
            bind_adresse: "0.0.0.0".into(),
            api_port: 10080,
            cors_origins: vec![],
        }
    }
}

/// Datenbank-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatenbankEinstellungen {
    /// Verbindungs-URL
    pub url: String,
    /// Maximale Verbindungspool-Groesse
    pub max_verbindungen: u32,
    /// WAL-Modus fuer SQLite
    pub sqlite_wal: bool,
    /// Namen der Benutzer-, Session- und Namespace-Tabelle
    pub tabellen: Tabellennamen,
}

impl Default for DatenbankEinstellungen {
    fn default() -> Self {
        let db = DatabaseConfig::default();
        Self {
            url: db.url,
            max_verbindungen: db.max_verbindungen,
            sqlite_wal: db.sqlite_wal,
            tabellen: db.tabellen,
        }
    }
}

impl DatenbankEinstellungen {
    pub fn als_database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.url.clone(),
            max_verbindungen: self.max_verbindungen,
            sqlite_wal: self.sqlite_wal,
            tabellen: self.tabellen.clone(),
        }
    }
}

/// Session- und Cookie-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionEinstellungen {
    /// Lebensdauer neuer Sessions in Tagen
    pub ttl_tage: i64,
    /// Name des Session-Cookies
    pub cookie_name: String,
    /// `Secure`-Attribut setzen (nur ueber HTTPS senden)
    pub cookie_secure: bool,
    /// `HttpOnly`-Attribut setzen
    pub cookie_http_only: bool,
}

impl Default for SessionEinstellungen {
    fn default() -> Self {
        Self {
            ttl_tage: werkhof_auth::session::SESSION_TTL_TAGE,
            cookie_name: "auth-user-token".into(),
            cookie_secure: false,
            cookie_http_only: false,
        }
    }
}

impl SessionEinstellungen {
    pub fn richtlinie(&self) -> SessionRichtlinie {
        SessionRichtlinie::mit_tagen(self.ttl_tage)
    }
}

/// Logging-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingEinstellungen {
    /// Log-Level: "trace", "debug", "info", "warn", "error"
    pub level: String,
    /// Format: "json" oder "text"
    pub format: String,
}

impl Default for LoggingEinstellungen {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "text".into(),
        }
    }
}

/// Observability-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityEinstellungen {
    /// Stellt `GET /health` bereit
    pub health_aktiviert: bool,
}

impl Default for ObservabilityEinstellungen {
    fn default() -> Self {
        Self {
            health_aktiviert: true,
        }
    }
}

impl ServerConfig {
    /// Laedt die Konfiguration aus einer TOML-Datei.
    /// Gibt die Standardkonfiguration zurueck wenn die Datei nicht existiert.
    pub fn laden(pfad: &str) -> Result<Self> {
        let config: Self = match std::fs::read_to_string(pfad) {
            Ok(inhalt) => toml::from_str(&inhalt).map_err(|e| {
                WerkhofError::konfiguration(format!("Konfigurationsfehler in '{pfad}': {e}"))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    pfad = pfad,
                    "Konfigurationsdatei nicht gefunden, verwende Standardwerte"
                );
                Self::default()
            }
            Err(e) => {
                return Err(WerkhofError::konfiguration(format!(
                    "Konfigurationsdatei '{pfad}' nicht lesbar: {e}"
                )))
            }
        };
        config.validieren()?;
        Ok(config)
    }

    /// Prueft Werte, die serde allein nicht abfangen kann
    pub fn validieren(&self) -> Result<()> {
        if self.session.ttl_tage <= 0 {
            return Err(WerkhofError::konfiguration(format!(
                "session.ttl_tage muss positiv sein, ist {}",
                self.session.ttl_tage
            )));
        }
        let name = &self.session.cookie_name;
        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(WerkhofError::konfiguration(format!(
                "Ungueltiger Cookie-Name '{name}'"
            )));
        }
        if self.datenbank.max_verbindungen == 0 {
            return Err(WerkhofError::konfiguration(
                "datenbank.max_verbindungen muss mindestens 1 sein",
            ));
        }
        self.datenbank
            .tabellen
            .validieren()
            .map_err(|e| WerkhofError::konfiguration(e.to_string()))?;
        if !werkhof_observability::logging::log_format_gueltig(&self.logging.format) {
            return Err(WerkhofError::konfiguration(format!(
                "Unbekanntes Log-Format '{}'",
                self.logging.format
            )));
        }
        Ok(())
    }

    /// Gibt die Bind-Adresse fuer die REST-API zurueck
    pub fn api_bind_adresse(&self) -> String {
        format!("{}:{}", self.netzwerk.bind_adresse, self.netzwerk.api_port)
    }
}
