use serde::{Deserialize, Serialize};

pub mod profile;

pub use profile::{
    InteractionAction, InteractionRecord, PreferenceProfile, ProfileStatistics,
    DEFAULT_MINIMUM_RATING, INTERACTION_LOG_CAPACITY,
};

/// A movie candidate as consumed by the scoring core and returned to clients.
///
/// Normalized from the TMDB wire format: `genre_ids` are TMDB's integer genre
/// identifiers, `vote_average` is on the 0-10 scale, `popularity` saturates at
/// 100 for scoring purposes, and `release_date` is an ISO date whose year is
/// extracted at scoring time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub original_language: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

impl Movie {
    /// Extracts the release year from the ISO `release_date` string.
    ///
    /// Returns `None` for empty or non-numeric dates; callers decide whether
    /// that is fatal (single score call) or skippable (batch ranking).
    pub fn release_year(&self) -> Option<i32> {
        let year_part = self.release_date.split('-').next()?;
        if year_part.len() != 4 {
            return None;
        }
        year_part.parse::<i32>().ok()
    }
}

/// A genre id / name pair from the catalog's genre list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// Raw movie record from TMDB list endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovie {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

impl From<TmdbMovie> for Movie {
    fn from(raw: TmdbMovie) -> Self {
        Movie {
            id: raw.id,
            title: raw.title,
            genre_ids: raw.genre_ids,
            vote_average: raw.vote_average,
            release_date: raw.release_date.unwrap_or_default(),
            popularity: raw.popularity,
            original_language: raw.original_language.unwrap_or_default(),
            overview: raw.overview,
            poster_path: raw.poster_path,
        }
    }
}

/// Paged response from TMDB list endpoints (`/movie/popular`, `/search/movie`)
#[derive(Debug, Deserialize)]
pub struct TmdbPagedResponse {
    #[serde(default)]
    pub page: u32,
    pub results: Vec<TmdbMovie>,
    #[serde(default)]
    pub total_pages: u32,
}

/// Response from TMDB `/genre/movie/list`
#[derive(Debug, Deserialize)]
pub struct TmdbGenreList {
    pub genres: Vec<Genre>,
}
