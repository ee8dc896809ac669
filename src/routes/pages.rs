use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::{
    error::AppResult,
    middleware::{AdminUser, MaybeUser},
    services::users,
    state::AppState,
};

/// Home page
pub async fn home(State(state): State<Arc<AppState>>, user: MaybeUser) -> Json<Value> {
    Json(json!({
        "shop_name": state.config.shop_name,
        "user_id": user.id(),
        "user_name": user.display_name(),
    }))
}

pub async fn about(State(state): State<Arc<AppState>>, user: MaybeUser) -> Json<Value> {
    Json(json!({
        "shop_name": state.config.shop_name,
        "user_name": user.display_name(),
        "description": format!(
            "{} keeps a catalog of books and movies with reviews, favorites and recommendations.",
            state.config.shop_name
        ),
    }))
}

/// Ids of every user, for handing out per-user recommendation API links
pub async fn api_provision(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
) -> AppResult<Json<Value>> {
    let users = users::all_user_ids(&state.db_pool).await?;
    tracing::info!(admin_id = admin.id, users = users.len(), "API provisioning listed");
    Ok(Json(json!({ "users": users })))
}

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
