/// Movie catalog provider abstraction
///
/// The scoring core is catalog-agnostic; this trait is the seam between it
/// and whichever upstream movie-data API feeds it candidates. The TMDB
/// implementation is the only one wired up, but handlers and services only
/// ever see the trait object.
use crate::{
    error::AppResult,
    models::{Genre, Movie},
};

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Trait for upstream movie catalog providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Fetch one page of currently popular movies, the candidate pool for
    /// recommendations.
    async fn popular_movies(&self, page: u32) -> AppResult<Vec<Movie>>;

    /// Search movies by title
    async fn search_movies(&self, query: &str) -> AppResult<Vec<Movie>>;

    /// Fetch the catalog's genre id/name list
    async fn genres(&self) -> AppResult<Vec<Genre>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
