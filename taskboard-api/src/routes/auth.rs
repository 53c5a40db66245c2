//! Authentication endpoints
//!
//! # Endpoints
//!
//! - `POST /register` - Create an account; returns the user and a token
//! - `POST /login` - Exchange credentials for a token
//! - `POST /logout` - Revoke every token the caller holds
//!
//! Both register and login answer with the same `{token, user}` body, so
//! clients have one code path for acquiring a session.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use taskboard_shared::{
    auth::{middleware::AuthContext, password},
    models::{
        token::AccessToken,
        user::{CreateUser, User},
    },
};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: String,

    /// Email address
    #[validate(
        email(message = "Invalid email format"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    pub email: String,

    /// Password
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    /// Must repeat the password exactly
    #[validate(must_match(other = "password", message = "Password confirmation does not match"))]
    pub password_confirmation: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Body returned by register and login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// Opaque bearer token; shown exactly once
    pub token: String,

    /// The authenticated user
    pub user: User,
}

/// Registers a new user.
///
/// # Endpoint
///
/// ```text
/// POST /register
/// Content-Type: application/json
///
/// {
///   "name": "John Doe",
///   "email": "john@example.com",
///   "password": "secret123",
///   "password_confirmation": "secret123"
/// }
/// ```
///
/// Responds `201 {token, user}`. A duplicate email is a 422 validation
/// error and creates no row.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    req.validate()?;

    // Pre-check for a friendlier error; the unique index still backstops
    // concurrent registrations.
    if User::find_by_email(&state.db, &req.email).await?.is_some() {
        return Err(ApiError::validation(
            "email",
            "The email has already been taken",
        ));
    }

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            name: req.name,
            email: req.email,
            password_hash,
        },
    )
    .await?;

    let (_, token) = AccessToken::mint(&state.db, user.id).await?;

    Ok((StatusCode::CREATED, Json(AuthResponse { token, user })))
}

/// Logs a user in.
///
/// # Endpoint
///
/// ```text
/// POST /login
/// Content-Type: application/json
///
/// {
///   "email": "john@example.com",
///   "password": "secret123"
/// }
/// ```
///
/// Responds `200 {token, user}`. Wrong email or password is a 422 with a
/// message that does not reveal which half was wrong.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    req.validate()?;

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(invalid_credentials)?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(invalid_credentials());
    }

    let (_, token) = AccessToken::mint(&state.db, user.id).await?;

    Ok(Json(AuthResponse { token, user }))
}

/// Logs the caller out by revoking all of their tokens.
///
/// # Endpoint
///
/// ```text
/// POST /logout
/// Authorization: Bearer <token>
/// ```
///
/// Responds `200 {"message": "Logged out successfully"}`.
pub async fn logout(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Value>> {
    let revoked = AccessToken::revoke_all_for_user(&state.db, auth.user.id).await?;
    tracing::debug!(user_id = %auth.user.id, revoked, "Revoked tokens on logout");

    Ok(Json(json!({ "message": "Logged out successfully" })))
}

/// The one 422 both bad-email and bad-password logins share.
fn invalid_credentials() -> ApiError {
    ApiError::validation("email", "Invalid email or password")
}
