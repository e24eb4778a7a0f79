//! Router assembly

pub mod auth;
pub mod students;
pub mod users;

use axum::{middleware, routing::get, Json, Router};
use serde_json::json;

use crate::auth::require_auth;
use crate::state::AppState;

/// Build the application router. Everything except login, registration
/// and the liveness probe sits behind the authentication middleware.
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .merge(users::router())
        .merge(students::router())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/healthz", get(healthz))
        .nest("/auth", auth::router())
        .merge(protected)
        .with_state(state)
}

async fn healthz() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
