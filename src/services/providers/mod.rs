//! External data providers
//!
//! Two third-party APIs feed the catalog: a movie metadata API (TMDb) and a
//! web search API (Google Custom Search). Each sits behind a trait so
//! handlers and services can be exercised with stubs.

use crate::{
    error::AppResult,
    models::{SearchHit, TmdbKeywords, TmdbMovieDetails, TmdbMoviePage, TmdbReviewPage},
};

pub mod google_search;
pub mod tmdb;

pub use google_search::GoogleSearchClient;
pub use tmdb::TmdbClient;

/// Source of movie metadata
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieMetadataProvider: Send + Sync {
    /// One page of currently popular movies
    async fn popular(&self, page: u32) -> AppResult<TmdbMoviePage>;

    /// Movies currently in theaters
    async fn now_playing(&self) -> AppResult<TmdbMoviePage>;

    /// Full details (genres, tagline, rating) of a movie
    async fn movie_details(&self, movie_id: u64) -> AppResult<TmdbMovieDetails>;

    async fn movie_keywords(&self, movie_id: u64) -> AppResult<TmdbKeywords>;

    /// First page of user reviews of a movie
    async fn movie_reviews(&self, movie_id: u64) -> AppResult<TmdbReviewPage>;
}

/// Web search used to enrich recommendations
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait WebSearchProvider: Send + Sync {
    /// Returns at most `num` results for `query`
    async fn search(&self, query: &str, num: u8) -> AppResult<Vec<SearchHit>>;
}
