//! User endpoints
//!
//! # Endpoints
//!
//! - `GET /user` - Current user's profile
//! - `PUT /user` - Update the current user's name and email
//! - `GET /users` - List every user (admin only)
//! - `DELETE /users/:id` - Delete a user (admin only)
//!
//! The profile endpoints only ever touch the authenticated actor's own
//! row; there is no way to address another user's profile through them.
//! Admin gating is an in-handler policy check, not a route-level layer.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use taskboard_shared::{
    auth::{
        middleware::AuthContext,
        policy::{self, Action},
    },
    models::user::User,
};
use uuid::Uuid;
use validator::Validate;

/// Profile update request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    /// New display name
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: String,

    /// New email address
    #[validate(
        email(message = "Invalid email format"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    pub email: String,
}

/// Returns the authenticated user's profile.
///
/// ```text
/// GET /user
/// Authorization: Bearer <token>
/// ```
pub async fn show_current(Extension(auth): Extension<AuthContext>) -> ApiResult<Json<User>> {
    policy::authorize(&auth.actor(), Action::ViewProfile)?;

    Ok(Json(auth.user))
}

/// Updates the authenticated user's name and email.
///
/// ```text
/// PUT /user
/// Authorization: Bearer <token>
///
/// { "name": "New Name", "email": "new@example.com" }
/// ```
///
/// Taking an email that belongs to another account is a 422 validation
/// error (unique-index violation surfaced by the error mapping).
pub async fn update_current(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<User>> {
    req.validate()?;
    policy::authorize(&auth.actor(), Action::UpdateProfile)?;

    let user = User::update_profile(&state.db, auth.user.id, &req.name, &req.email)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}

/// Lists every user. Admin only.
///
/// ```text
/// GET /users
/// Authorization: Bearer <token>
/// ```
pub async fn index(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<User>>> {
    policy::authorize(&auth.actor(), Action::ListUsers)?;

    let users = User::list(&state.db).await?;

    Ok(Json(users))
}

/// Deletes a user by ID. Admin only; cascades to the user's tasks and
/// tokens.
///
/// ```text
/// DELETE /users/:id
/// Authorization: Bearer <token>
/// ```
///
/// The role check runs before the lookup, so non-admins get 403 even for
/// ids that do not exist.
pub async fn remove(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    policy::authorize(&auth.actor(), Action::DeleteUser)?;

    let deleted = User::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    tracing::info!(target_id = %id, admin_id = %auth.user.id, "User deleted by admin");

    Ok(Json(json!({ "message": "User deleted" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_profile_request_valid() {
        let req = UpdateProfileRequest {
            name: "New Name".to_string(),
            email: "new@example.com".to_string(),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_update_profile_rejects_bad_email() {
        let req = UpdateProfileRequest {
            name: "New Name".to_string(),
            email: "nope".to_string(),
        };
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn test_update_profile_rejects_empty_name() {
        let req = UpdateProfileRequest {
            name: String::new(),
            email: "new@example.com".to_string(),
        };
        assert!(req.validate().is_err());
    }
}
