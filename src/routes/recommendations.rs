use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::MaybeUser,
    models::{RecommendationResponse, SnippetLimits, UserPreferencesResponse},
    services::recommendations,
    state::AppState,
};

pub const NOT_LOGGED_IN: &str = "User not logged in.";
pub const NO_FAVORITE_MOVIES: &str = "User has no favorite movies.";
pub const NO_FAVORITE_GENRES: &str = "No favorite genres available for recommendations.";

/// Recommendations for the signed-in user
pub async fn for_session(
    State(state): State<Arc<AppState>>,
    MaybeUser(user): MaybeUser,
) -> AppResult<Json<Value>> {
    let user = user.ok_or_else(|| AppError::Unauthorized(NOT_LOGGED_IN.to_string()))?;

    let recommendations = recommendations::recommend_for_user(
        &state.db_pool,
        state.web_search.as_ref(),
        user.id,
        SnippetLimits::PAGE,
    )
    .await?;

    Ok(Json(match recommendations {
        Some(response) => json!(response),
        None => json!({ "message": NO_FAVORITE_MOVIES }),
    }))
}

/// Public per-user recommendations
pub async fn for_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i32>,
) -> AppResult<Json<RecommendationResponse>> {
    recommendations::recommend_for_user(
        &state.db_pool,
        state.web_search.as_ref(),
        user_id,
        SnippetLimits::API,
    )
    .await?
    .map(Json)
    .ok_or_else(|| AppError::NotFound(NO_FAVORITE_GENRES.to_string()))
}

pub async fn user_preferences(
    State(state): State<Arc<AppState>>,
    MaybeUser(user): MaybeUser,
) -> AppResult<Json<UserPreferencesResponse>> {
    let user = user.ok_or_else(|| AppError::Unauthorized(NOT_LOGGED_IN.to_string()))?;
    let preferences =
        recommendations::user_preferences(&state.db_pool, user.id, &user.username).await?;
    Ok(Json(preferences))
}
