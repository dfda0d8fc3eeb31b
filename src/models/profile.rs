use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Movie;

/// Default rating floor for a fresh profile
pub const DEFAULT_MINIMUM_RATING: f64 = 6.0;

/// Lowest value the adaptive rating floor can reach
pub const MINIMUM_RATING_FLOOR: f64 = 5.0;

/// Number of recorded likes required before the rating floor adapts
pub const LIKE_HISTORY_THRESHOLD: usize = 5;

/// Maximum number of interaction records retained, newest first
pub const INTERACTION_LOG_CAPACITY: usize = 100;

/// A user action on a movie candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionAction {
    Like,
    Dislike,
    Skip,
}

/// A recorded interaction: the movie's genre and rating state is snapshotted
/// at interaction time and never updated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InteractionRecord {
    pub movie_id: u64,
    pub action: InteractionAction,
    pub timestamp: DateTime<Utc>,
    pub genres: HashSet<u32>,
    pub rating: f64,
}

impl InteractionRecord {
    /// Builds a record from a movie snapshot and the given action
    pub fn new(movie: &Movie, action: InteractionAction) -> Self {
        Self {
            movie_id: movie.id,
            action,
            timestamp: Utc::now(),
            genres: movie.genre_ids.iter().copied().collect(),
            rating: movie.vote_average,
        }
    }
}

/// The persisted preference signals for a single session
///
/// Invariant: a genre id never appears in both `favorite_genres` and
/// `disliked_genres`. All mutation goes through `apply_like` / `apply_dislike`,
/// which maintain it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PreferenceProfile {
    pub favorite_genres: HashSet<u32>,
    pub disliked_genres: HashSet<u32>,
    pub minimum_rating: f64,
    pub languages: Vec<String>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl Default for PreferenceProfile {
    fn default() -> Self {
        Self {
            favorite_genres: HashSet::new(),
            disliked_genres: HashSet::new(),
            minimum_rating: DEFAULT_MINIMUM_RATING,
            languages: vec!["en".to_string()],
            last_updated: None,
        }
    }
}

impl PreferenceProfile {
    /// Applies a like: every genre of the item becomes a favorite unless the
    /// user has already disliked it. Dislikes take precedence permanently.
    pub fn apply_like(&mut self, genres: &HashSet<u32>) {
        for genre in genres {
            if !self.disliked_genres.contains(genre) {
                self.favorite_genres.insert(*genre);
            }
        }
    }

    /// Applies a dislike: the genre is dropped from favorites before being
    /// marked disliked, keeping the two sets disjoint.
    pub fn apply_dislike(&mut self, genres: &HashSet<u32>) {
        for genre in genres {
            self.favorite_genres.remove(genre);
            self.disliked_genres.insert(*genre);
        }
    }

    /// Recomputes the rating floor from the full like history.
    ///
    /// Only adapts once more than `LIKE_HISTORY_THRESHOLD` likes exist; the
    /// floor is the mean liked rating minus one, never below
    /// `MINIMUM_RATING_FLOOR`. Recomputed fresh each time, not incrementally.
    pub fn recalculate_minimum_rating(&mut self, like_ratings: &[f64]) {
        if like_ratings.len() <= LIKE_HISTORY_THRESHOLD {
            return;
        }
        let average: f64 = like_ratings.iter().sum::<f64>() / like_ratings.len() as f64;
        self.minimum_rating = (average - 1.0).max(MINIMUM_RATING_FLOOR);
    }
}

/// Aggregate counts over the profile and interaction log
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileStatistics {
    pub total: usize,
    pub likes: usize,
    pub dislikes: usize,
    pub skips: usize,
    pub favorite_genre_count: usize,
    pub disliked_genre_count: usize,
    pub last_updated: Option<DateTime<Utc>>,
}
