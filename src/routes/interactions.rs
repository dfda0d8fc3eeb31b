use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use serde::Deserialize;

use crate::{
    middleware::RequestId,
    models::{InteractionAction, Movie, PreferenceProfile},
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct RecordInteractionRequest {
    /// Snapshot of the movie being acted on, as served by the catalog routes
    pub movie: Movie,
    pub action: InteractionAction,
}

/// Handler recording a like/dislike/skip and returning the updated profile
pub async fn record(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecordInteractionRequest>,
) -> Json<PreferenceProfile> {
    tracing::info!(
        request_id = %request_id,
        movie_id = request.movie.id,
        action = ?request.action,
        "Recording interaction"
    );

    let profile = state
        .store
        .record_interaction(&request.movie, request.action)
        .await;

    Json(profile)
}
