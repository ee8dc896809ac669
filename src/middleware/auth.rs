//! Session-backed identity and the extractors guarding routes.

use std::sync::Arc;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use crate::{
    error::{AppError, AppResult},
    models::SessionUser,
    state::AppState,
};

pub const SESSION_USER_KEY: &str = "bettys:user";

pub const ACCESS_RESTRICTED: &str = "Access restricted";

/// Store the signed-in user, cycling the session id first
pub async fn login(session: &Session, user: &SessionUser) -> AppResult<()> {
    session.cycle_id().await?;
    session.insert(SESSION_USER_KEY, user).await?;
    Ok(())
}

/// Get the signed-in user, if any
pub async fn session_user(session: &Session) -> AppResult<Option<SessionUser>> {
    Ok(session.get::<SessionUser>(SESSION_USER_KEY).await?)
}

pub async fn logout(session: &Session) -> AppResult<()> {
    session.flush().await?;
    Ok(())
}

async fn extract_session<S: Send + Sync>(parts: &mut Parts, state: &S) -> AppResult<Session> {
    Session::from_request_parts(parts, state)
        .await
        .map_err(|(_, msg)| AppError::Internal(msg.to_string()))
}

/// A signed-in user; anonymous requests are redirected to the login page
#[derive(Debug, Clone)]
pub struct CurrentUser(pub SessionUser);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = extract_session(parts, state).await?;
        session_user(&session)
            .await?
            .map(CurrentUser)
            .ok_or(AppError::LoginRequired)
    }
}

/// The signed-in user when there is one
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<SessionUser>);

impl MaybeUser {
    pub fn id(&self) -> Option<i32> {
        self.0.as_ref().map(|user| user.id)
    }

    /// First name of the user, or "Guest"
    pub fn display_name(&self) -> String {
        self.0
            .as_ref()
            .map(|user| user.first_name.clone())
            .unwrap_or_else(|| "Guest".to_string())
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = extract_session(parts, state).await?;
        Ok(MaybeUser(session_user(&session).await?))
    }
}

/// The configured administrator; everyone else gets 403
#[derive(Debug, Clone)]
pub struct AdminUser(pub SessionUser);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let MaybeUser(user) = MaybeUser::from_request_parts(parts, state).await?;
        match user {
            Some(user) if user.id == state.config.admin_user_id => Ok(AdminUser(user)),
            _ => Err(AppError::Forbidden(ACCESS_RESTRICTED.to_string())),
        }
    }
}
