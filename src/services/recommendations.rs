use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::Serialize;

use crate::{
    error::AppResult,
    models::{InteractionAction, Movie},
    services::{
        providers::CatalogProvider,
        scoring::{self, ScoreWeights},
    },
    store::PreferenceStore,
};

/// A candidate movie joined with its relevance score, in rank order
#[derive(Debug, Clone, Serialize)]
pub struct RankedMovie {
    pub movie: Movie,
    pub score: f64,
    pub reasons: Vec<String>,
}

/// Produces ranked recommendations from one page of catalog candidates.
///
/// Fetches the candidate batch, drops movies the user has already liked or
/// disliked (skipped movies stay eligible), scores the rest against the
/// current profile, and returns them ordered by descending score.
pub async fn recommend(
    provider: Arc<dyn CatalogProvider>,
    store: &PreferenceStore,
    weights: &ScoreWeights,
    page: u32,
    current_year: i32,
) -> AppResult<Vec<RankedMovie>> {
    let candidates = provider.popular_movies(page).await?;

    tracing::info!(
        candidates = candidates.len(),
        page = page,
        provider = provider.name(),
        "Candidate batch fetched"
    );

    let profile = store.load().await.profile;

    let rated: HashSet<u64> = store
        .interactions()
        .await
        .iter()
        .filter(|r| {
            matches!(
                r.action,
                InteractionAction::Like | InteractionAction::Dislike
            )
        })
        .map(|r| r.movie_id)
        .collect();

    let fresh: Vec<Movie> = candidates
        .into_iter()
        .filter(|movie| !rated.contains(&movie.id))
        .collect();

    let ranked = scoring::rank_movies(&fresh, &profile, weights, current_year);

    let mut by_id: HashMap<u64, Movie> = fresh.into_iter().map(|m| (m.id, m)).collect();
    let results: Vec<RankedMovie> = ranked
        .into_iter()
        .filter_map(|r| {
            by_id.remove(&r.movie_id).map(|movie| RankedMovie {
                movie,
                score: r.score,
                reasons: r.reasons,
            })
        })
        .collect();

    tracing::info!(
        excluded = rated.len(),
        ranked = results.len(),
        "Recommendations ranked"
    );

    Ok(results)
}
