/// TMDB catalog provider
///
/// Fetches popular pages, title search results, and the genre list from the
/// TMDB v3 API, authenticating with an `api_key` query parameter. Responses
/// are cached in Redis: the candidate pool churns slowly and the genre list
/// is effectively static, so most requests never leave the cache.
use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{Genre, Movie, TmdbGenreList, TmdbPagedResponse},
    services::providers::CatalogProvider,
};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;

const POPULAR_CACHE_TTL: u64 = 1800; // 30 minutes
const SEARCH_CACHE_TTL: u64 = 3600; // 1 hour
const GENRE_CACHE_TTL: u64 = 86400; // 1 day

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    cache: Cache,
}

impl TmdbProvider {
    pub fn new(cache: Cache, api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
            cache,
        }
    }

    /// Issues a GET against a TMDB path and deserializes the JSON body
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> AppResult<T> {
        let url = format!("{}{}", self.api_url, path);

        let mut query: Vec<(&str, String)> = vec![("api_key", self.api_key.clone())];
        query.extend(params.iter().cloned());

        let response = self.http_client.get(&url).query(&query).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::CatalogApi(format!(
                "TMDB returned status {}: {}",
                status, body
            )));
        }

        Ok(response.json().await?)
    }
}

#[async_trait::async_trait]
impl CatalogProvider for TmdbProvider {
    async fn popular_movies(&self, page: u32) -> AppResult<Vec<Movie>> {
        if page == 0 {
            return Err(AppError::InvalidInput(
                "Page numbers start at 1".to_string(),
            ));
        }

        cached!(
            self.cache,
            CacheKey::PopularMovies(page),
            POPULAR_CACHE_TTL,
            async move {
                let response: TmdbPagedResponse = self
                    .get_json("/movie/popular", &[("page", page.to_string())])
                    .await?;

                let movies: Vec<Movie> =
                    response.results.into_iter().map(Movie::from).collect();

                tracing::info!(
                    page = page,
                    results = movies.len(),
                    provider = "tmdb",
                    "Popular movies fetched"
                );

                Ok::<_, AppError>(movies)
            }
        )
    }

    async fn search_movies(&self, query: &str) -> AppResult<Vec<Movie>> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        cached!(
            self.cache,
            CacheKey::MovieSearch(query.to_string()),
            SEARCH_CACHE_TTL,
            async move {
                let response: TmdbPagedResponse = self
                    .get_json("/search/movie", &[("query", query.to_string())])
                    .await?;

                let movies: Vec<Movie> =
                    response.results.into_iter().map(Movie::from).collect();

                tracing::info!(
                    query = %query,
                    results = movies.len(),
                    provider = "tmdb",
                    "Movie search completed"
                );

                Ok::<_, AppError>(movies)
            }
        )
    }

    async fn genres(&self) -> AppResult<Vec<Genre>> {
        cached!(self.cache, CacheKey::GenreList, GENRE_CACHE_TTL, async move {
            let response: TmdbGenreList = self.get_json("/genre/movie/list", &[]).await?;

            tracing::info!(
                genres = response.genres.len(),
                provider = "tmdb",
                "Genre list fetched"
            );

            Ok::<_, AppError>(response.genres)
        })
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
