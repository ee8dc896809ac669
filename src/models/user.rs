use serde::{Deserialize, Serialize};
use validator::Validate;

/// A registered user as stored in the `users` table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub hashed_password: String,
}

/// The identity kept in the session cookie after a successful login
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: i32,
    pub username: String,
    pub first_name: String,
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            first_name: user.first_name.clone(),
        }
    }
}

/// Registration form posted to `/users/registered`
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct RegisterForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "First name is required"))]
    pub first: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last: String,

    #[serde(default)]
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[serde(default, skip_serializing)]
    #[validate(length(min = 8, message = "Password must be at least 8 characters long"))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub new_password: String,
}
