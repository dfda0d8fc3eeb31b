use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    models::{Movie, PreferenceProfile},
};

const GENRE_BASELINE: f64 = 0.5;
const FAVORITE_GENRE_BOOST: f64 = 0.2;
const DISLIKED_GENRE_PENALTY: f64 = 0.3;
const RECENCY_HORIZON_YEARS: f64 = 20.0;
const POPULARITY_SATURATION: f64 = 100.0;
const NON_PREFERRED_LANGUAGE_VALUE: f64 = 0.3;
const BELOW_FLOOR_RATING_FACTOR: f64 = 0.5;

/// Weight of each scoring factor in the final relevance score.
///
/// The defaults sum to 1.0 but normalization is not enforced: callers passing
/// un-normalized weights get proportionally scaled output. Weights are a
/// tuning knob, not a probability distribution.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScoreWeights {
    pub genre: f64,
    pub rating: f64,
    pub recency: f64,
    pub popularity: f64,
    pub language: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            genre: 0.4,
            rating: 0.2,
            recency: 0.15,
            popularity: 0.15,
            language: 0.1,
        }
    }
}

/// Relevance score for one movie, with human-readable justifications
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoreResult {
    pub movie_id: u64,
    pub score: f64,
    pub reasons: Vec<String>,
}

/// Scores a single movie against the current profile.
///
/// Pure: identical inputs always produce identical output. The caller
/// supplies the reference `current_year` so recency has no hidden time
/// dependence.
///
/// Only the genre, rating, and language factors contribute reason strings;
/// recency and popularity stay silent. Reasons appear in factor order.
///
/// Fails only when the movie carries no parseable release year.
pub fn score_movie(
    movie: &Movie,
    profile: &PreferenceProfile,
    weights: &ScoreWeights,
    current_year: i32,
) -> AppResult<ScoreResult> {
    let mut reasons = Vec::new();

    // Genre: baseline, boosted per favorite match (capped), then penalized
    // per disliked match (floored). Boosts apply before penalties.
    let favorite_matches = movie
        .genre_ids
        .iter()
        .filter(|g| profile.favorite_genres.contains(g))
        .count();
    let disliked_matches = movie
        .genre_ids
        .iter()
        .filter(|g| profile.disliked_genres.contains(g))
        .count();

    let boosted =
        (GENRE_BASELINE + favorite_matches as f64 * FAVORITE_GENRE_BOOST).min(1.0);
    let genre_factor =
        (boosted - disliked_matches as f64 * DISLIKED_GENRE_PENALTY).max(0.0);

    if favorite_matches > 0 {
        reasons.push(format!("Matches {} favorite genre(s)", favorite_matches));
    }
    if disliked_matches > 0 {
        reasons.push(format!("Contains {} disliked genre(s)", disliked_matches));
    }

    // Rating: items below the adaptive floor keep half their value rather
    // than being filtered out entirely.
    let rating_value = (movie.vote_average / 10.0).min(1.0);
    let rating_factor = if movie.vote_average >= profile.minimum_rating {
        reasons.push(format!("Rated {:.1}/10", movie.vote_average));
        rating_value
    } else {
        rating_value * BELOW_FLOOR_RATING_FACTOR
    };

    // Recency: linear decay to zero over the horizon. A future release year
    // yields a factor above 1.0 here; only the final score is clamped.
    let release_year = movie.release_year().ok_or_else(|| {
        AppError::InvalidInput(format!(
            "Movie {} has no parseable release date: '{}'",
            movie.id, movie.release_date
        ))
    })?;
    let years_since_release = (current_year - release_year) as f64;
    let recency_factor = (1.0 - years_since_release / RECENCY_HORIZON_YEARS).max(0.0);

    let popularity_factor = (movie.popularity / POPULARITY_SATURATION).min(1.0);

    let language_factor = if profile.languages.contains(&movie.original_language) {
        reasons.push(format!("In preferred language ({})", movie.original_language));
        1.0
    } else {
        NON_PREFERRED_LANGUAGE_VALUE
    };

    let score = (weights.genre * genre_factor
        + weights.rating * rating_factor
        + weights.recency * recency_factor
        + weights.popularity * popularity_factor
        + weights.language * language_factor)
        .clamp(0.0, 1.0);

    Ok(ScoreResult {
        movie_id: movie.id,
        score,
        reasons,
    })
}

/// Scores a batch and returns results ordered by descending score.
///
/// The sort is stable: equal scores keep the input's relative order. Movies
/// that fail validation are dropped from the batch with a warning instead of
/// failing the whole ranking.
pub fn rank_movies(
    movies: &[Movie],
    profile: &PreferenceProfile,
    weights: &ScoreWeights,
    current_year: i32,
) -> Vec<ScoreResult> {
    let mut results: Vec<ScoreResult> = movies
        .iter()
        .filter_map(|movie| match score_movie(movie, profile, weights, current_year) {
            Ok(result) => Some(result),
            Err(e) => {
                tracing::warn!(movie_id = movie.id, error = %e, "Skipping unscorable movie");
                None
            }
        })
        .collect();

    results.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    results
}
