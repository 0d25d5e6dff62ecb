//! Health-Check-Endpunkt fuer Werkhof
//!
//! Endpoint: `GET /health`
//! Response: JSON mit Status, Version, Uptime und DB-Verbindungsstatus

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;

/// Typ-Alias fuer eine geboxte Send-Future
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Asynchrone Pruefung der Datenbankverbindung
pub type DbProbe = Arc<dyn Fn() -> BoxFuture<'static, bool> + Send + Sync>;

/// Baut eine `DbProbe` aus einer async Closure
pub fn db_probe<F, Fut>(f: F) -> DbProbe
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = bool> + Send + 'static,
{
    Arc::new(move || -> BoxFuture<'static, bool> { Box::pin(f()) })
}

/// Status des Health-Checks
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Antwort des Health-Check-Endpunkts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    pub uptime_seconds: u64,
    pub db_connected: bool,
}

/// Geteilter Zustand fuer den Health-Check-Handler
#[derive(Clone)]
pub struct HealthState {
    start_time: Arc<Instant>,
    db_probe: DbProbe,
}

impl HealthState {
    pub fn neu(db_probe: DbProbe) -> Self {
        Self {
            start_time: Arc::new(Instant::now()),
            db_probe,
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    pub async fn db_verbunden(&self) -> bool {
        (self.db_probe)().await
    }
}

/// Axum-Router fuer den `/health`-Endpunkt
pub fn health_router<S>(state: HealthState) -> Router<S> {
    Router::new()
        .route("/health", get(health_handler))
        .with_state(state)
}

/// `GET /health` – gibt den Serverstatus zurueck
///
/// Ohne Datenbank kann kein Login bedient werden, daher 503.
async fn health_handler(State(state): State<HealthState>) -> impl IntoResponse {
    let db_connected = state.db_verbunden().await;
    let (http_status, status) = if db_connected {
        (StatusCode::OK, HealthStatus::Healthy)
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, HealthStatus::Unhealthy)
    };

    if !db_connected {
        tracing::warn!("Health-Check: Datenbank nicht erreichbar");
    }

    let response = HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
        db_connected,
    };

    (http_status, Json(response))
}
