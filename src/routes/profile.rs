use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    models::ProfileStatistics,
    routes::AppState,
    store::LoadedProfile,
};

/// Handler returning the current preference profile and its provenance
pub async fn load(State(state): State<Arc<AppState>>) -> Json<LoadedProfile> {
    Json(state.store.load().await)
}

/// Handler clearing the stored profile and interaction log
pub async fn reset(State(state): State<Arc<AppState>>) -> StatusCode {
    state.store.reset().await;
    StatusCode::NO_CONTENT
}

/// Handler for interaction/profile statistics
pub async fn statistics(State(state): State<Arc<AppState>>) -> Json<ProfileStatistics> {
    Json(state.store.statistics().await)
}
