//! REST-Interface fuer Werkhof

pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;

use std::sync::Arc;

use axum::{http::HeaderMap, http::StatusCode, response::Response};
use werkhof_auth::AuthService;
use werkhof_db::{models::BenutzerRecord, SqliteDb};

use crate::config::SessionEinstellungen;
use crate::rest::middleware::{auth_fehler_antwort, fehler_antwort, session_token};

/// Axum-State fuer den REST-Server
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService<SqliteDb>,
    pub session: Arc<SessionEinstellungen>,
}

impl AppState {
    pub fn neu(auth: AuthService<SqliteDb>, session: SessionEinstellungen) -> Self {
        Self {
            auth,
            session: Arc::new(session),
        }
    }
}

/// Ermittelt den angemeldeten Benutzer aus Cookie oder Bearer-Header
pub async fn benutzer_aus_headers(
    headers: &HeaderMap,
    state: &AppState,
) -> Result<BenutzerRecord, Response> {
    let token = session_token(headers, &state.session.cookie_name).ok_or_else(|| {
        fehler_antwort(StatusCode::UNAUTHORIZED, "Session-Token fehlt")
    })?;

    state
        .auth
        .session_validieren(token)
        .await
        .map_err(auth_fehler_antwort)
}

/// Wie `benutzer_aus_headers`, verlangt aber Administratorrechte
pub async fn admin_aus_headers(
    headers: &HeaderMap,
    state: &AppState,
) -> Result<BenutzerRecord, Response> {
    let benutzer = benutzer_aus_headers(headers, state).await?;
    if !benutzer.is_admin {
        tracing::warn!(user_id = %benutzer.id, "Admin-Endpunkt ohne Adminrechte aufgerufen");
        return Err(fehler_antwort(
            StatusCode::FORBIDDEN,
            "Nur fuer Administratoren",
        ));
    }
    Ok(benutzer)
}

pub use server::{app_bauen, RestServer};
