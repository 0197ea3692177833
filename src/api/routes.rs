//! Router assembly.
//!
//! `/auth/*` is public; everything under `/api` sits behind the bearer
//! token middleware.

use axum::{extract::State, http::StatusCode, middleware, response::Json, routing::get, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{auth_routes, organisation_routes, user_routes};
use super::middleware::auth_middleware;
use super::openapi::ApiDoc;
use super::AppState;

pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .nest("/users", user_routes())
        .nest("/organisations", organisation_routes())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/auth", auth_routes())
        .nest("/api", protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> &'static str {
    "Welcome to Tenancy API"
}

/// Liveness plus a store connectivity probe.
async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match state.database.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "services": { "database": { "status": "healthy" } },
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "degraded",
                "services": {
                    "database": { "status": "unhealthy", "error": e.to_string() },
                },
            })),
        ),
    }
}
