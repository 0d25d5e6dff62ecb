//! Hilfsfunktionen rund um Request-Header, Cookies und Fehlerantworten

use std::net::SocketAddr;

use axum::{
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use werkhof_auth::AuthError;

use crate::config::SessionEinstellungen;

/// Ermittelt die Client-IP
///
/// Erster Eintrag aus `X-Forwarded-For`, sonst die Adresse der TCP-Gegenstelle.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .or_else(|| peer.map(|p| p.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

/// Fehlerantwort fuer REST-API
pub fn fehler_antwort(status: StatusCode, nachricht: &str) -> Response {
    (
        status,
        Json(json!({
            "error": {
                "code": status.as_u16(),
                "message": nachricht
            }
        })),
    )
        .into_response()
}

/// HTTP-Status fuer einen Auth-Fehler
pub fn auth_status(e: &AuthError) -> StatusCode {
    match e {
        AuthError::NichtGefunden(_) => StatusCode::NOT_FOUND,
        AuthError::ZugriffVerweigert => StatusCode::FORBIDDEN,
        AuthError::UngueltigerParameter | AuthError::UngueltigeEingabe(_) => {
            StatusCode::BAD_REQUEST
        }
        AuthError::BereitsVergeben => StatusCode::CONFLICT,
        AuthError::SessionUngueltig => StatusCode::UNAUTHORIZED,
        AuthError::PasswortHashing(_) | AuthError::Datenbank(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Wandelt einen Auth-Fehler in eine JSON-Fehlerantwort um
///
/// Interne Fehler werden geloggt, der Client sieht nur eine generische Meldung.
pub fn auth_fehler_antwort(e: AuthError) -> Response {
    let status = auth_status(&e);
    if status.is_server_error() {
        tracing::error!(fehler = %e, "Interner Fehler bei Auth-Anfrage");
        return fehler_antwort(status, "Interner Serverfehler");
    }
    fehler_antwort(status, &e.to_string())
}

/// Extrahiert Bearer-Token aus Authorization-Header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Liest einen Cookie-Wert aus allen `Cookie`-Headern
pub fn cookie_wert<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|s| s.split(';'))
        .filter_map(|paar| paar.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v)
        .filter(|v| !v.is_empty())
}

/// Session-Token aus Cookie oder Bearer-Header; der Cookie hat Vorrang
pub fn session_token<'a>(headers: &'a HeaderMap, cookie_name: &str) -> Option<&'a str> {
    cookie_wert(headers, cookie_name).or_else(|| bearer_token(headers))
}

/// Baut den `Set-Cookie`-Header fuer ein frisch ausgegebenes Session-Token
///
/// `Max-Age` entspricht der Session-Lebensdauer; massgeblich bleibt das
/// gespeicherte `expired_at`.
pub fn session_cookie(
    einstellungen: &SessionEinstellungen,
    token: &str,
    max_age_sekunden: i64,
) -> Option<HeaderValue> {
    let mut cookie = format!(
        "{}={}; Path=/; Max-Age={}",
        einstellungen.cookie_name, token, max_age_sekunden
    );
    if einstellungen.cookie_secure {
        cookie.push_str("; Secure");
    }
    if einstellungen.cookie_http_only {
        cookie.push_str("; HttpOnly");
    }
    HeaderValue::from_str(&cookie).ok()
}
