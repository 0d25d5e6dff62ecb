//! REST-Handler fuer Login, Registrierung und eigene Sitzung

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use werkhof_auth::{LoginAnfrage, Registrierung};

use crate::rest::handlers::BenutzerProfil;
use crate::rest::middleware::{auth_fehler_antwort, client_ip, session_cookie};
use crate::rest::{benutzer_aus_headers, AppState};

/// POST /v1/login
///
/// Liefert die Login-Antwort als JSON und setzt zusaetzlich den Session-Cookie.
pub async fn login(
    State(state): State<AppState>,
    peer: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    Json(anfrage): Json<LoginAnfrage>,
) -> Response {
    let ip = client_ip(&headers, peer.map(|ConnectInfo(a)| a));
    let antwort = match state.auth.anmelden(&anfrage, &ip).await {
        Ok(a) => a,
        Err(e) => return auth_fehler_antwort(e),
    };

    let max_age = state.auth.richtlinie().ttl_sekunden();
    match session_cookie(&state.session, &antwort.token, max_age) {
        Some(cookie) => (
            StatusCode::OK,
            [(header::SET_COOKIE, cookie)],
            Json(antwort),
        )
            .into_response(),
        None => {
            tracing::warn!("Session-Cookie konnte nicht gebaut werden");
            (StatusCode::OK, Json(antwort)).into_response()
        }
    }
}

/// POST /v1/register
pub async fn register(
    State(state): State<AppState>,
    peer: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    Json(daten): Json<Registrierung>,
) -> Response {
    let ip = client_ip(&headers, peer.map(|ConnectInfo(a)| a));
    match state.auth.registrieren(&daten, &ip).await {
        Ok(ergebnis) => {
            let path = ergebnis.namespace_path().map(str::to_string);
            (
                StatusCode::CREATED,
                Json(BenutzerProfil::aus_record(ergebnis.benutzer, path, true)),
            )
                .into_response()
        }
        Err(e) => auth_fehler_antwort(e),
    }
}

/// GET /v1/me
pub async fn me(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let benutzer = match benutzer_aus_headers(&headers, &state).await {
        Ok(b) => b,
        Err(r) => return r,
    };
    let namespace = match state.auth.namespace_laden(&benutzer).await {
        Ok(ns) => ns,
        Err(e) => return auth_fehler_antwort(e),
    };
    let profil = BenutzerProfil::aus_record(benutzer, namespace.map(|n| n.path), true);
    (StatusCode::OK, Json(profil)).into_response()
}
