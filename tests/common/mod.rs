#![allow(dead_code)]

use std::sync::Arc;

use axum_test::TestServer;
use sqlx::{postgres::PgPoolOptions, PgPool};

use bettys_movies::{
    config::Config,
    error::{AppError, AppResult},
    models::{
        tmdb::{TmdbGenre, TmdbKeyword, TmdbListMovie, TmdbReview},
        SearchHit, TmdbKeywords, TmdbMovieDetails, TmdbMoviePage, TmdbReviewPage,
    },
    routes::create_router,
    services::providers::{MovieMetadataProvider, WebSearchProvider},
    state::AppState,
};

/// Canned TMDb responses: ids 1..=8, every movie complete
pub struct StubMetadata;

fn list_page() -> TmdbMoviePage {
    TmdbMoviePage {
        page: 1,
        results: (1..=8)
            .map(|id| TmdbListMovie {
                id,
                title: Some(format!("Stub Movie {}", id)),
                release_date: Some(format!("2024-0{}-01", id.min(9))),
                overview: Some("An overview".to_string()),
                vote_average: Some(6.5),
            })
            .collect(),
    }
}

#[async_trait::async_trait]
impl MovieMetadataProvider for StubMetadata {
    async fn popular(&self, _page: u32) -> AppResult<TmdbMoviePage> {
        Ok(list_page())
    }

    async fn now_playing(&self) -> AppResult<TmdbMoviePage> {
        Ok(list_page())
    }

    async fn movie_details(&self, movie_id: u64) -> AppResult<TmdbMovieDetails> {
        Ok(TmdbMovieDetails {
            id: movie_id,
            title: Some(format!("Stub Movie {}", movie_id)),
            overview: Some("A stubbed overview of the movie".to_string()),
            vote_average: Some(7.2),
            release_date: Some("2024-03-01".to_string()),
            genres: vec![TmdbGenre {
                id: 35,
                name: "Comedy".to_string(),
            }],
            tagline: Some("Laugh it off".to_string()),
        })
    }

    async fn movie_keywords(&self, movie_id: u64) -> AppResult<TmdbKeywords> {
        Ok(TmdbKeywords {
            id: movie_id,
            keywords: vec![TmdbKeyword {
                id: 1,
                name: "friendship".to_string(),
            }],
        })
    }

    async fn movie_reviews(&self, _movie_id: u64) -> AppResult<TmdbReviewPage> {
        Ok(TmdbReviewPage {
            results: vec![TmdbReview {
                author: Some("critic".to_string()),
                content: "<p>Funny and warm</p>".to_string(),
            }],
        })
    }
}

/// Web search that always fails, as when the quota is exhausted
pub struct FailingSearch;

#[async_trait::async_trait]
impl WebSearchProvider for FailingSearch {
    async fn search(&self, _query: &str, _num: u8) -> AppResult<Vec<SearchHit>> {
        Err(AppError::ExternalApi("quota exceeded".to_string()))
    }
}

/// Web search returning `num` hits with long titles and snippets
pub struct VerboseSearch;

#[async_trait::async_trait]
impl WebSearchProvider for VerboseSearch {
    async fn search(&self, query: &str, num: u8) -> AppResult<Vec<SearchHit>> {
        Ok((0..num)
            .map(|i| SearchHit {
                title: format!("{} result {} {}", query, i, "t".repeat(200)),
                snippet: "s".repeat(500),
                link: None,
            })
            .collect())
    }
}

pub fn test_state(pool: PgPool) -> Arc<AppState> {
    state_with(pool, Config::for_tests(), Arc::new(FailingSearch))
}

pub fn state_with(
    pool: PgPool,
    config: Config,
    web_search: Arc<dyn WebSearchProvider>,
) -> Arc<AppState> {
    Arc::new(AppState::new(pool, Arc::new(StubMetadata), web_search, config))
}

/// Server whose database is never reached; for routes rejected before any query
pub fn offline_server() -> TestServer {
    let config = Config::for_tests();
    let pool = PgPoolOptions::new()
        .connect_lazy(&config.database_url)
        .unwrap();
    TestServer::new(create_router(test_state(pool))).unwrap()
}

/// Server backed by a real database, keeping cookies between requests
pub fn server_with_pool(pool: PgPool) -> TestServer {
    cookie_server(test_state(pool))
}

pub fn cookie_server(state: Arc<AppState>) -> TestServer {
    let mut server = TestServer::new(create_router(state)).unwrap();
    server.do_save_cookies();
    server
}
