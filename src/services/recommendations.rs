use sqlx::PgPool;

use crate::{
    error::{AppError, AppResult},
    models::{
        ApiRecommendation, FavoriteMovie, RecommendationResponse, RecommendedMovie,
        SnippetLimits, UserPreferencesResponse,
    },
    services::{
        books::escape_like,
        preferences::{favorites_message, PreferenceProfile},
        providers::WebSearchProvider,
    },
    text::truncate_chars,
};

/// Catalog suggestions returned per request
pub const MAX_CATALOG_RECOMMENDATIONS: i64 = 10;

/// Web results fetched per request
pub const WEB_RESULTS: u8 = 3;

pub const NO_PREFERENCES: &str = "No preferences found for this user.";

/// Favorites of a user in the order they were added
pub async fn favorites_of(pool: &PgPool, user_id: i32) -> AppResult<Vec<FavoriteMovie>> {
    let favorites = sqlx::query_as::<_, FavoriteMovie>(
        r#"
        SELECT m.id, m.title, m.genres, m.tags, m.keywords, m.description, m.release_date
        FROM user_favorites uf
        JOIN movies m ON m.id = uf.movie_id
        WHERE uf.user_id = $1
        ORDER BY uf.id
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(favorites)
}

/// ILIKE containment patterns, one per genre
fn genre_patterns(genres: &[String]) -> Vec<String> {
    genres
        .iter()
        .map(|g| format!("%{}%", escape_like(g)))
        .collect()
}

/// Movies matching any of `genres`, skipping `exclude_ids`
pub async fn catalog_candidates(
    pool: &PgPool,
    genres: &[String],
    exclude_ids: &[i32],
) -> AppResult<Vec<RecommendedMovie>> {
    let patterns = genre_patterns(genres);

    let movies = sqlx::query_as::<_, RecommendedMovie>(
        r#"
        SELECT m.id, m.title, m.genres, m.tags, m.keywords, m.description
        FROM movies m
        WHERE m.genres ILIKE ANY($1)
          AND NOT (m.id = ANY($2))
        ORDER BY m.id
        LIMIT $3
        "#,
    )
    .bind(&patterns)
    .bind(exclude_ids)
    .bind(MAX_CATALOG_RECOMMENDATIONS)
    .fetch_all(pool)
    .await?;

    Ok(movies)
}

/// Web search query built from the top genres
pub fn web_query(top_genres: &[String]) -> String {
    format!("top {} movies", top_genres.join(", "))
}

/// Searches the web for the top genres.
///
/// A failing search is logged and yields no results; recommendations are
/// still served from the catalog.
pub async fn enrich_with_web_results(
    web_search: &dyn WebSearchProvider,
    top_genres: &[String],
    limits: SnippetLimits,
) -> Vec<ApiRecommendation> {
    let query = web_query(top_genres);

    match web_search.search(&query, WEB_RESULTS).await {
        Ok(hits) => hits
            .into_iter()
            .map(|hit| ApiRecommendation {
                query: truncate_chars(&hit.title, limits.title),
                response: truncate_chars(&hit.snippet, limits.snippet),
            })
            .collect(),
        Err(e) => {
            tracing::warn!(error = %e, query = %query, "Web recommendations unavailable");
            Vec::new()
        }
    }
}

/// Builds recommendations for a user.
///
/// Returns `NotFound` when the user has no favorites and `Ok(None)` when the
/// favorites carry no genres at all.
pub async fn recommend_for_user(
    pool: &PgPool,
    web_search: &dyn WebSearchProvider,
    user_id: i32,
    limits: SnippetLimits,
) -> AppResult<Option<RecommendationResponse>> {
    let username: Option<String> = sqlx::query_scalar("SELECT username FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    let Some(username) = username else {
        return Err(AppError::NotFound(NO_PREFERENCES.to_string()));
    };

    let favorites = favorites_of(pool, user_id).await?;
    if favorites.is_empty() {
        return Err(AppError::NotFound(NO_PREFERENCES.to_string()));
    }

    let profile = PreferenceProfile::from_favorites(&favorites);
    let top_genres = profile.top_genres();
    if top_genres.is_empty() {
        return Ok(None);
    }

    let db_recommendations = catalog_candidates(pool, &top_genres, &profile.favorite_ids).await?;
    let api_recommendations = enrich_with_web_results(web_search, &top_genres, limits).await;

    tracing::info!(
        user_id = user_id,
        favorites = favorites.len(),
        top_genres = ?top_genres,
        catalog = db_recommendations.len(),
        web = api_recommendations.len(),
        "Recommendations built"
    );

    Ok(Some(RecommendationResponse {
        username,
        all_genres: profile.all_genres(),
        favorite_genres: top_genres.join(", "),
        db_recommendations,
        api_recommendations,
    }))
}

/// Favorites of the signed-in user with the recommendation threshold message
pub async fn user_preferences(
    pool: &PgPool,
    user_id: i32,
    username: &str,
) -> AppResult<UserPreferencesResponse> {
    let preferences = favorites_of(pool, user_id).await?;
    let favorite_count = preferences.len();

    Ok(UserPreferencesResponse {
        username: username.to_string(),
        message: favorites_message(favorite_count),
        favorite_count,
        preferences,
    })
}
