//! Axum HTTP-Server fuer Werkhof

use std::net::SocketAddr;

use anyhow::Result;
use axum::http::{HeaderValue, Method};
use axum::Router;
use tower_http::cors::CorsLayer;
use werkhof_observability::{health_router, request_trace_layer, timing_middleware, HealthState};

use crate::rest::{routes::v1_router, AppState};

/// Baut die vollstaendige Anwendung (API, optional Health, Layer)
///
/// CORS: leere Origin-Liste erlaubt alle Origins (nur fuer Entwicklung).
pub fn app_bauen(state: AppState, cors_origins: &[String], health: Option<HealthState>) -> Router {
    let cors = if cors_origins.is_empty() {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(tower_http::cors::Any)
    };

    let mut app = v1_router().with_state(state);
    if let Some(health) = health {
        app = app.merge(health_router(health));
    }

    app.layer(axum::middleware::from_fn(timing_middleware))
        .layer(request_trace_layer())
        .layer(cors)
}

/// Axum HTTP-Server fuer die REST-API
pub struct RestServer {
    bind_addr: String,
}

impl RestServer {
    pub fn neu(bind_addr: impl Into<String>) -> Self {
        Self {
            bind_addr: bind_addr.into(),
        }
    }

    /// Startet den REST-Server und laeuft bis zum Shutdown-Signal
    pub async fn starten(self, app: Router) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(&self.bind_addr).await?;
        tracing::info!(addr = %self.bind_addr, "REST-Server gestartet");

        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(fehler = %e, "Ctrl-C-Handler konnte nicht installiert werden");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown-Signal empfangen, Server wird beendet");
}
