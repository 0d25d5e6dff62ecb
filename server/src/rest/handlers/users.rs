//! REST-Handler fuer Benutzerlisten und Aktivierung

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use serde_json::json;
use werkhof_core::UserId;

use crate::rest::handlers::BenutzerProfil;
use crate::rest::middleware::auth_fehler_antwort;
use crate::rest::{admin_aus_headers, benutzer_aus_headers, AppState};

const STANDARD_PRO_SEITE: u64 = 20;
const MAX_PRO_SEITE: u64 = 100;

/// Query-Parameter fuer die Paginierung (Seiten ab 0)
#[derive(Debug, Default, Deserialize)]
pub struct Seite {
    pub page: Option<u64>,
    pub per: Option<u64>,
}

impl Seite {
    fn aufloesen(&self) -> (u64, u64) {
        let per = self
            .per
            .unwrap_or(STANDARD_PRO_SEITE)
            .clamp(1, MAX_PRO_SEITE);
        (self.page.unwrap_or(0), per)
    }
}

/// GET /v1/users?page=&per=
pub async fn list_users(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(seite): Query<Seite>,
) -> Response {
    let anfragender = match benutzer_aus_headers(&headers, &state).await {
        Ok(b) => b,
        Err(r) => return r,
    };
    let (page, per) = seite.aufloesen();
    match state.auth.benutzer_liste(page, per).await {
        Ok(liste) => {
            let profile: Vec<BenutzerProfil> = liste
                .into_iter()
                .map(|b| {
                    let selbst = b.id == anfragender.id;
                    BenutzerProfil::aus_record(b, None, selbst || anfragender.is_admin)
                })
                .collect();
            (
                StatusCode::OK,
                Json(json!({ "page": page, "per": per, "users": profile })),
            )
                .into_response()
        }
        Err(e) => auth_fehler_antwort(e),
    }
}

/// GET /v1/admins
pub async fn list_admins(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Err(r) = admin_aus_headers(&headers, &state).await {
        return r;
    }
    match state.auth.admin_liste().await {
        Ok(liste) => {
            let profile: Vec<BenutzerProfil> = liste
                .into_iter()
                .map(|eintrag| {
                    let path = eintrag.namespace.map(|n| n.path);
                    BenutzerProfil::aus_record(eintrag.benutzer, path, true)
                })
                .collect();
            (StatusCode::OK, Json(profile)).into_response()
        }
        Err(e) => auth_fehler_antwort(e),
    }
}

/// POST /v1/users/:id/activate
pub async fn activate_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    let admin = match admin_aus_headers(&headers, &state).await {
        Ok(a) => a,
        Err(r) => return r,
    };
    match state.auth.aktivieren(UserId(id)).await {
        Ok(aktiviert) => {
            tracing::info!(admin_id = %admin.id, user_id = id, aktiviert, "Aktivierung angefordert");
            (StatusCode::OK, Json(json!({ "id": id, "activated": aktiviert }))).into_response()
        }
        Err(e) => auth_fehler_antwort(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seite_standardwerte_und_grenzen() {
        assert_eq!(Seite::default().aufloesen(), (0, 20));
        let s = Seite { page: Some(3), per: Some(0) };
        assert_eq!(s.aufloesen(), (3, 1));
        let s = Seite { page: None, per: Some(5000) };
        assert_eq!(s.aufloesen(), (0, 100));
    }
}
