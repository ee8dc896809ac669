//! Account registration, login and password resets.
//!
//! Passwords are stored as Argon2id PHC strings. Hashing is CPU bound, so it
//! runs on the blocking thread pool.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use sqlx::PgPool;

use crate::{
    error::{AppError, AppResult},
    models::{LoginForm, RegisterForm, SessionUser, User},
};

pub const INVALID_CREDENTIALS: &str = "Invalid username or password.";
pub const UNKNOWN_EMAIL: &str = "No user found with this email";
pub const PASSWORD_RESET: &str =
    "Your password has been reset successfully. You can now log in with your new password.";

/// Hash a plaintext password using Argon2id with a random salt
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// `Ok(false)` on a mismatch; `Err` only for unparseable hashes
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

async fn hash_blocking(password: String) -> AppResult<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(format!("Hashing task failed: {}", e)))?
        .map_err(|e| AppError::PasswordHash(e.to_string()))
}

async fn verify_blocking(password: String, hash: String) -> AppResult<bool> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| AppError::Internal(format!("Verification task failed: {}", e)))?
        .map_err(|e| AppError::PasswordHash(e.to_string()))
}

/// Stores a new account; the form must already be validated
pub async fn register(pool: &PgPool, form: RegisterForm) -> AppResult<i32> {
    let hashed_password = hash_blocking(form.password).await?;

    let user_id: i32 = sqlx::query_scalar(
        r#"
        INSERT INTO users (username, first_name, last_name, email, hashed_password)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(&form.username)
    .bind(&form.first)
    .bind(&form.last)
    .bind(&form.email)
    .bind(&hashed_password)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        AppError::from_constraint(e, "Username or email is already registered", "Unknown user")
    })?;

    tracing::info!(user_id = user_id, username = %form.username, "User registered");

    Ok(user_id)
}

/// Replaces the password of the account registered under `email`
pub async fn reset_password(pool: &PgPool, email: &str, new_password: &str) -> AppResult<()> {
    let exists: Option<i32> = sqlx::query_scalar("SELECT id FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await?;

    let Some(user_id) = exists else {
        return Err(AppError::NotFound(UNKNOWN_EMAIL.to_string()));
    };

    let hashed_password = hash_blocking(new_password.to_string()).await?;

    sqlx::query("UPDATE users SET hashed_password = $1 WHERE id = $2")
        .bind(&hashed_password)
        .bind(user_id)
        .execute(pool)
        .await?;

    tracing::info!(user_id = user_id, "Password reset");

    Ok(())
}

/// Checks credentials and returns the identity to keep in the session
pub async fn authenticate(pool: &PgPool, form: &LoginForm) -> AppResult<SessionUser> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, first_name, last_name, email, hashed_password
        FROM users
        WHERE username = $1
        "#,
    )
    .bind(&form.username)
    .fetch_optional(pool)
    .await?;

    let Some(user) = user else {
        tracing::info!(username = %form.username, "Login for unknown user");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    };

    if !verify_blocking(form.password.clone(), user.hashed_password.clone()).await? {
        tracing::info!(user_id = user.id, "Login with wrong password");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    Ok(SessionUser::from(&user))
}

/// Ids of every registered user, for the provisioning page
pub async fn all_user_ids(pool: &PgPool) -> AppResult<Vec<i32>> {
    let ids = sqlx::query_scalar("SELECT id FROM users ORDER BY id")
        .fetch_all(pool)
        .await?;
    Ok(ids)
}
