use std::sync::Arc;

use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    middleware::{make_span_with_request_id, request_id_middleware},
    services::providers::CatalogProvider,
    store::PreferenceStore,
};

pub mod interactions;
pub mod movies;
pub mod profile;
pub mod recommendations;

/// Shared application state
pub struct AppState {
    pub store: PreferenceStore,
    pub provider: Arc<dyn CatalogProvider>,
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Catalog pass-throughs
        .route("/movies/popular", get(movies::popular))
        .route("/movies/search", get(movies::search))
        .route("/genres", get(movies::genres))
        // Preference profile
        .route("/profile", get(profile::load).delete(profile::reset))
        .route("/statistics", get(profile::statistics))
        .route("/interactions", post(interactions::record))
        // Scoring
        .route("/score", post(recommendations::score))
        .route("/score/batch", post(recommendations::score_batch))
        .route("/recommendations", post(recommendations::recommend))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
