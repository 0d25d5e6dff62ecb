//! Route-Definitionen fuer die REST-API (/v1/...)

use axum::{
    routing::{get, post},
    Router,
};

use crate::rest::{handlers, AppState};

/// Erstellt den vollstaendigen /v1/-Router
pub fn v1_router() -> Router<AppState> {
    Router::new()
        // Anmeldung
        .route("/v1/login", post(handlers::auth::login))
        .route("/v1/register", post(handlers::auth::register))
        .route("/v1/me", get(handlers::auth::me))
        // Benutzer
        .route("/v1/users", get(handlers::users::list_users))
        .route("/v1/users/:id/activate", post(handlers::users::activate_user))
        .route("/v1/admins", get(handlers::users::list_admins))
}
