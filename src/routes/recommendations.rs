use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use chrono::{Datelike, Utc};
use serde::Deserialize;

use crate::{
    error::AppResult,
    middleware::RequestId,
    models::{Movie, PreferenceProfile},
    routes::AppState,
    services::{
        recommendations::{self, RankedMovie},
        scoring::{self, ScoreResult, ScoreWeights},
    },
};

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    pub movie: Movie,
    /// Profile to score against; defaults to the stored one
    #[serde(default)]
    pub profile: Option<PreferenceProfile>,
    #[serde(default)]
    pub weights: ScoreWeights,
}

#[derive(Debug, Deserialize)]
pub struct BatchScoreRequest {
    pub movies: Vec<Movie>,
    #[serde(default)]
    pub profile: Option<PreferenceProfile>,
    #[serde(default)]
    pub weights: ScoreWeights,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default)]
    pub weights: ScoreWeights,
}

fn default_page() -> u32 {
    1
}

/// Handler scoring a single movie against the stored (or supplied) profile
pub async fn score(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ScoreRequest>,
) -> AppResult<Json<ScoreResult>> {
    let profile = match request.profile {
        Some(profile) => profile,
        None => state.store.load().await.profile,
    };

    let result = scoring::score_movie(&request.movie, &profile, &request.weights, current_year())?;
    Ok(Json(result))
}

/// Handler scoring a caller-supplied batch, returned in descending score
/// order with ties keeping input order
pub async fn score_batch(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BatchScoreRequest>,
) -> AppResult<Json<Vec<ScoreResult>>> {
    let profile = match request.profile {
        Some(profile) => profile,
        None => state.store.load().await.profile,
    };

    let results = scoring::rank_movies(
        &request.movies,
        &profile,
        &request.weights,
        current_year(),
    );
    Ok(Json(results))
}

/// Handler for ranked recommendations over a popular-movies page
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<Vec<RankedMovie>>> {
    tracing::info!(
        request_id = %request_id,
        page = request.page,
        "Processing recommendation request"
    );

    let results = recommendations::recommend(
        state.provider.clone(),
        &state.store,
        &request.weights,
        request.page,
        current_year(),
    )
    .await?;

    tracing::info!(
        request_id = %request_id,
        results = results.len(),
        "Recommendation request completed"
    );

    Ok(Json(results))
}

/// Reference year for the recency factor; scoring itself stays pure
fn current_year() -> i32 {
    Utc::now().year()
}
