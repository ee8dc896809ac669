use std::sync::Arc;

use axum::{extract::State, response::Redirect, Form, Json};
use serde_json::{json, Value};
use tower_sessions::Session;

use crate::{
    error::AppResult,
    middleware::{auth, CurrentUser},
    models::{LoginForm, RegisterForm, ResetPasswordForm},
    services::users,
    state::AppState,
    validation::{validate_form, validate_password_strength},
};

pub async fn register(
    State(state): State<Arc<AppState>>,
    Form(form): Form<RegisterForm>,
) -> AppResult<Redirect> {
    validate_form(&form)?;
    users::register(&state.db_pool, form).await?;
    Ok(Redirect::to(&state.config.path("/users/login")))
}

pub async fn reset_password(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ResetPasswordForm>,
) -> AppResult<Json<Value>> {
    validate_password_strength(&form.new_password)?;
    users::reset_password(&state.db_pool, form.email.trim(), &form.new_password).await?;
    Ok(Json(json!({ "message": users::PASSWORD_RESET })))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> AppResult<Redirect> {
    let user = users::authenticate(&state.db_pool, &form).await?;
    auth::login(&session, &user).await?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(Redirect::to(&state.config.path("/")))
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    session: Session,
) -> AppResult<Redirect> {
    auth::logout(&session).await?;

    tracing::info!(user_id = user.id, "User logged out");

    Ok(Redirect::to(&state.config.path("/")))
}
