use serde::Serialize;

use super::{FavoriteMovie, RecommendedMovie};

/// A web search result condensed for display next to recommendations
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ApiRecommendation {
    pub query: String,
    pub response: String,
}

/// Character limits applied to web search titles and snippets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnippetLimits {
    pub title: usize,
    pub snippet: usize,
}

impl SnippetLimits {
    /// Limits of the signed-in recommendations page
    pub const PAGE: SnippetLimits = SnippetLimits {
        title: 150,
        snippet: 400,
    };

    /// Limits of the public per-user JSON API
    pub const API: SnippetLimits = SnippetLimits {
        title: 30,
        snippet: 70,
    };
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecommendationResponse {
    pub username: String,
    pub all_genres: String,
    pub favorite_genres: String,
    pub db_recommendations: Vec<RecommendedMovie>,
    pub api_recommendations: Vec<ApiRecommendation>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UserPreferencesResponse {
    pub username: String,
    pub preferences: Vec<FavoriteMovie>,
    pub favorite_count: usize,
    pub message: String,
}
