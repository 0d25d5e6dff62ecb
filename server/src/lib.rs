//! werkhof-server – Bibliotheks-Root
//!
//! Deklariert alle Server-Module und stellt den oeffentlichen Einstiegspunkt
//! fuer Integrationstests bereit.

pub mod config;
pub mod rest;

use std::sync::Arc;

use anyhow::Result;
use config::ServerConfig;
use werkhof_auth::AuthService;
use werkhof_core::WerkhofError;
use werkhof_db::SqliteDb;
use werkhof_observability::{db_probe, HealthState};

use crate::rest::{app_bauen, AppState, RestServer};

/// Haelt den laufenden Server-Zustand zusammen
pub struct Server {
    pub config: ServerConfig,
}

impl Server {
    /// Erstellt einen neuen Server aus der gegebenen Konfiguration
    pub fn neu(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Startet alle Server-Subsysteme und laeuft bis zum Shutdown-Signal
    ///
    /// Reihenfolge:
    /// 1. Datenbank oeffnen und Schema anlegen
    /// 2. Auth-Service aufbauen
    /// 3. REST-API (und Health) starten
    /// 4. Auf Ctrl-C warten
    pub async fn starten(self) -> Result<()> {
        tracing::info!(
            server_name = %self.config.server.name,
            api = %self.config.api_bind_adresse(),
            "Server startet"
        );

        let db = SqliteDb::oeffnen(&self.config.datenbank.als_database_config())
            .await
            .map_err(|e| WerkhofError::Datenbank(e.to_string()))?;
        let db = Arc::new(db);

        let auth = AuthService::neu(Arc::clone(&db), self.config.session.richtlinie());
        let state = AppState::neu(auth, self.config.session.clone());

        let health = self.config.observability.health_aktiviert.then(|| {
            let db = Arc::clone(&db);
            HealthState::neu(db_probe(move || {
                let db = Arc::clone(&db);
                async move { db.ping().await }
            }))
        });

        let app = app_bauen(state, &self.config.netzwerk.cors_origins, health);
        RestServer::neu(self.config.api_bind_adresse())
            .starten(app)
            .await
    }
}
