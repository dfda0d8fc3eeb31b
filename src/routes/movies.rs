use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::{
    error::AppResult,
    models::{Genre, Movie},
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_page")]
    page: u32,
}

fn default_page() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    q: String,
}

/// Handler for the popular-movies candidate feed
pub async fn popular(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PageQuery>,
) -> AppResult<Json<Vec<Movie>>> {
    let movies = state.provider.popular_movies(params.page).await?;
    Ok(Json(movies))
}

/// Handler for movie title search
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<Vec<Movie>>> {
    let movies = state.provider.search_movies(&params.q).await?;
    Ok(Json(movies))
}

/// Handler for the catalog genre list
pub async fn genres(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<Genre>>> {
    let genres = state.provider.genres().await?;
    Ok(Json(genres))
}
