use std::sync::Arc;

use axum_test::TestServer;
use serde_json::json;

use reelrank_api::error::AppResult;
use reelrank_api::models::{Genre, Movie};
use reelrank_api::routes::{create_router, AppState};
use reelrank_api::services::providers::CatalogProvider;
use reelrank_api::store::{MemoryStorage, PreferenceStore};

/// Catalog stub serving a fixed movie list, so tests need no network
struct StubCatalog {
    movies: Vec<Movie>,
}

#[async_trait::async_trait]
impl CatalogProvider for StubCatalog {
    async fn popular_movies(&self, _page: u32) -> AppResult<Vec<Movie>> {
        Ok(self.movies.clone())
    }

    async fn search_movies(&self, query: &str) -> AppResult<Vec<Movie>> {
        let query = query.to_lowercase();
        Ok(self
            .movies
            .iter()
            .filter(|m| m.title.to_lowercase().contains(&query))
            .cloned()
            .collect())
    }

    async fn genres(&self) -> AppResult<Vec<Genre>> {
        Ok(vec![
            Genre {
                id: 28,
                name: "Action".to_string(),
            },
            Genre {
                id: 35,
                name: "Comedy".to_string(),
            },
        ])
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

fn movie(id: u64, title: &str, genre_ids: Vec<u32>, vote_average: f64) -> Movie {
    Movie {
        id,
        title: title.to_string(),
        genre_ids,
        vote_average,
        release_date: "2020-01-01".to_string(),
        popularity: 50.0,
        original_language: "en".to_string(),
        overview: None,
        poster_path: None,
    }
}

fn create_test_server() -> TestServer {
    let catalog = StubCatalog {
        movies: vec![
            movie(1, "The Matrix", vec![28, 878], 8.2),
            movie(2, "Grown Ups", vec![35], 6.0),
            movie(3, "Heat", vec![28, 80], 7.9),
        ],
    };

    let state = Arc::new(AppState {
        store: PreferenceStore::new(Arc::new(MemoryStorage::new())),
        provider: Arc::new(catalog),
    });

    TestServer::new(create_router(state)).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_request_id_echoed_on_responses() {
    let server = create_test_server();
    let response = server.get("/health").await;

    let header = response.headers().get("x-request-id");
    assert!(header.is_some());
}

#[tokio::test]
async fn test_profile_defaults_before_any_interaction() {
    let server = create_test_server();
    let response = server.get("/api/v1/profile").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["source"], "defaults");
    assert_eq!(body["profile"]["minimum_rating"], 6.0);
    assert_eq!(body["profile"]["languages"], json!(["en"]));
    assert_eq!(body["profile"]["favorite_genres"], json!([]));
}

#[tokio::test]
async fn test_like_updates_profile() {
    let server = create_test_server();

    let response = server
        .post("/api/v1/interactions")
        .json(&json!({
            "movie": {
                "id": 1,
                "title": "The Matrix",
                "genre_ids": [28, 878],
                "vote_average": 8.2,
                "release_date": "1999-03-31",
                "popularity": 85.0,
                "original_language": "en"
            },
            "action": "like"
        }))
        .await;
    response.assert_status_ok();

    let profile: serde_json::Value = response.json();
    let favorites = profile["favorite_genres"].as_array().unwrap();
    assert!(favorites.contains(&json!(28)));
    assert!(favorites.contains(&json!(878)));

    // Stored: a subsequent load sees the persisted profile
    let response = server.get("/api/v1/profile").await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["source"], "stored");
}

#[tokio::test]
async fn test_dislike_takes_precedence_over_later_like() {
    let server = create_test_server();

    server
        .post("/api/v1/interactions")
        .json(&json!({
            "movie": {"id": 10, "title": "A", "genre_ids": [28], "vote_average": 5.0,
                       "release_date": "2018-01-01", "original_language": "en"},
            "action": "dislike"
        }))
        .await;

    let response = server
        .post("/api/v1/interactions")
        .json(&json!({
            "movie": {"id": 11, "title": "B", "genre_ids": [28, 12], "vote_average": 7.5,
                       "release_date": "2021-01-01", "original_language": "en"},
            "action": "like"
        }))
        .await;

    let profile: serde_json::Value = response.json();
    let favorites = profile["favorite_genres"].as_array().unwrap();
    let disliked = profile["disliked_genres"].as_array().unwrap();

    assert!(!favorites.contains(&json!(28)));
    assert!(favorites.contains(&json!(12)));
    assert!(disliked.contains(&json!(28)));
}

#[tokio::test]
async fn test_statistics_reflect_interactions() {
    let server = create_test_server();

    for (id, action) in [(1, "like"), (2, "dislike"), (3, "skip"), (4, "like")] {
        server
            .post("/api/v1/interactions")
            .json(&json!({
                "movie": {"id": id, "title": "M", "genre_ids": [28], "vote_average": 7.0,
                           "release_date": "2020-01-01", "original_language": "en"},
                "action": action
            }))
            .await;
    }

    let response = server.get("/api/v1/statistics").await;
    response.assert_status_ok();

    let stats: serde_json::Value = response.json();
    assert_eq!(stats["total"], 4);
    assert_eq!(stats["likes"], 2);
    assert_eq!(stats["dislikes"], 1);
    assert_eq!(stats["skips"], 1);
}

#[tokio::test]
async fn test_reset_restores_defaults() {
    let server = create_test_server();

    server
        .post("/api/v1/interactions")
        .json(&json!({
            "movie": {"id": 1, "title": "The Matrix", "genre_ids": [28], "vote_average": 8.2,
                       "release_date": "1999-03-31", "original_language": "en"},
            "action": "like"
        }))
        .await;

    let response = server.delete("/api/v1/profile").await;
    response.assert_status(axum::http::StatusCode::NO_CONTENT);

    let response = server.get("/api/v1/profile").await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["source"], "defaults");
    assert_eq!(body["profile"]["favorite_genres"], json!([]));

    let stats: serde_json::Value = server.get("/api/v1/statistics").await.json();
    assert_eq!(stats["total"], 0);
}

#[tokio::test]
async fn test_score_endpoint() {
    let server = create_test_server();

    server
        .post("/api/v1/interactions")
        .json(&json!({
            "movie": {"id": 1, "title": "The Matrix", "genre_ids": [28], "vote_average": 8.2,
                       "release_date": "1999-03-31", "original_language": "en"},
            "action": "like"
        }))
        .await;

    let response = server
        .post("/api/v1/score")
        .json(&json!({
            "movie": {"id": 3, "title": "Heat", "genre_ids": [28, 80], "vote_average": 7.9,
                       "release_date": "1995-12-15", "popularity": 60.0, "original_language": "en"}
        }))
        .await;
    response.assert_status_ok();

    let result: serde_json::Value = response.json();
    assert_eq!(result["movie_id"], 3);
    let score = result["score"].as_f64().unwrap();
    assert!((0.0..=1.0).contains(&score));

    let reasons: Vec<String> = result["reasons"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r.as_str().unwrap().to_string())
        .collect();
    assert!(reasons.contains(&"Matches 1 favorite genre(s)".to_string()));
}

#[tokio::test]
async fn test_score_endpoint_rejects_unparseable_release_date() {
    let server = create_test_server();

    let response = server
        .post("/api/v1/score")
        .json(&json!({
            "movie": {"id": 9, "title": "Mystery", "genre_ids": [28], "vote_average": 7.0,
                       "release_date": "", "original_language": "en"}
        }))
        .await;

    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_score_endpoint_with_zero_weights() {
    let server = create_test_server();

    let response = server
        .post("/api/v1/score")
        .json(&json!({
            "movie": {"id": 1, "title": "The Matrix", "genre_ids": [28], "vote_average": 8.2,
                       "release_date": "1999-03-31", "original_language": "en"},
            "weights": {"genre": 0.0, "rating": 0.0, "recency": 0.0, "popularity": 0.0, "language": 0.0}
        }))
        .await;
    response.assert_status_ok();

    let result: serde_json::Value = response.json();
    assert_eq!(result["score"].as_f64().unwrap(), 0.0);
}

#[tokio::test]
async fn test_score_endpoint_with_supplied_profile() {
    let server = create_test_server();

    // No interactions recorded; the request carries its own profile
    let response = server
        .post("/api/v1/score")
        .json(&json!({
            "movie": {"id": 3, "title": "Heat", "genre_ids": [28], "vote_average": 7.9,
                       "release_date": "1995-12-15", "popularity": 60.0, "original_language": "en"},
            "profile": {
                "favorite_genres": [28],
                "disliked_genres": [],
                "minimum_rating": 6.0,
                "languages": ["en"],
                "last_updated": null
            }
        }))
        .await;
    response.assert_status_ok();

    let result: serde_json::Value = response.json();
    let reasons: Vec<String> = result["reasons"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r.as_str().unwrap().to_string())
        .collect();
    assert!(reasons.contains(&"Matches 1 favorite genre(s)".to_string()));
}

#[tokio::test]
async fn test_score_batch_ties_keep_input_order() {
    let server = create_test_server();

    // Identical movies apart from their ids score identically; the stable
    // sort must keep the submitted order
    let movies: Vec<serde_json::Value> = [31_u64, 17, 99, 4]
        .iter()
        .map(|id| {
            json!({"id": id, "title": "Same", "genre_ids": [28], "vote_average": 7.0,
                    "release_date": "2019-05-01", "popularity": 40.0, "original_language": "en"})
        })
        .collect();

    let response = server
        .post("/api/v1/score/batch")
        .json(&json!({ "movies": movies }))
        .await;
    response.assert_status_ok();

    let results: Vec<serde_json::Value> = response.json();
    let ids: Vec<u64> = results
        .iter()
        .map(|r| r["movie_id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![31, 17, 99, 4]);
}

#[tokio::test]
async fn test_score_batch_descending_order() {
    let server = create_test_server();

    let response = server
        .post("/api/v1/score/batch")
        .json(&json!({
            "movies": [
                {"id": 1, "title": "Meh", "genre_ids": [99], "vote_average": 4.0,
                  "release_date": "2001-01-01", "popularity": 5.0, "original_language": "de"},
                {"id": 2, "title": "Hit", "genre_ids": [28], "vote_average": 8.5,
                  "release_date": "2023-01-01", "popularity": 95.0, "original_language": "en"}
            ]
        }))
        .await;
    response.assert_status_ok();

    let results: Vec<serde_json::Value> = response.json();
    assert_eq!(results[0]["movie_id"], 2);
    assert!(results[0]["score"].as_f64().unwrap() > results[1]["score"].as_f64().unwrap());
}

#[tokio::test]
async fn test_recommendations_exclude_rated_movies() {
    let server = create_test_server();

    // Like The Matrix (id 1): it must not come back as a candidate
    server
        .post("/api/v1/interactions")
        .json(&json!({
            "movie": {"id": 1, "title": "The Matrix", "genre_ids": [28, 878], "vote_average": 8.2,
                       "release_date": "1999-03-31", "original_language": "en"},
            "action": "like"
        }))
        .await;

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({}))
        .await;
    response.assert_status_ok();

    let results: Vec<serde_json::Value> = response.json();
    assert_eq!(results.len(), 2);

    let ids: Vec<u64> = results
        .iter()
        .map(|r| r["movie"]["id"].as_u64().unwrap())
        .collect();
    assert!(!ids.contains(&1));

    // Heat shares the liked Action genre and outranks the comedy
    assert_eq!(ids[0], 3);

    let scores: Vec<f64> = results
        .iter()
        .map(|r| r["score"].as_f64().unwrap())
        .collect();
    assert!(scores[0] >= scores[1]);
}

#[tokio::test]
async fn test_movies_popular_pass_through() {
    let server = create_test_server();

    let response = server.get("/api/v1/movies/popular").await;
    response.assert_status_ok();

    let movies: Vec<serde_json::Value> = response.json();
    assert_eq!(movies.len(), 3);
    assert_eq!(movies[0]["title"], "The Matrix");
}

#[tokio::test]
async fn test_movies_search_pass_through() {
    let server = create_test_server();

    let response = server.get("/api/v1/movies/search").add_query_param("q", "matrix").await;
    response.assert_status_ok();

    let movies: Vec<serde_json::Value> = response.json();
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0]["id"], 1);
}

#[tokio::test]
async fn test_genres_pass_through() {
    let server = create_test_server();

    let response = server.get("/api/v1/genres").await;
    response.assert_status_ok();

    let genres: Vec<serde_json::Value> = response.json();
    assert_eq!(genres.len(), 2);
    assert_eq!(genres[0]["name"], "Action");
}
