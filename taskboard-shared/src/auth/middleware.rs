//! Bearer-token authentication plumbing
//!
//! Splits authentication into two pieces the API server's middleware glues
//! together: parsing the `Authorization: Bearer <token>` header and
//! resolving the opaque secret to a user. On success the request carries an
//! [`AuthContext`] extension with the authenticated [`User`]; handlers pull
//! it out with Axum's `Extension` extractor, so the current actor is always
//! an explicit request-scoped value.
//!
//! # Example
//!
//! ```
//! use axum::Extension;
//! use taskboard_shared::auth::middleware::AuthContext;
//!
//! async fn handler(Extension(auth): Extension<AuthContext>) -> String {
//!     format!("Hello, {}!", auth.user.name)
//! }
//! ```

use axum::http::{header, HeaderMap};
use sqlx::PgPool;

use crate::auth::policy::Actor;
use crate::models::{token::AccessToken, user::User};

/// Authentication context added to request extensions
///
/// Carries the full user row so handlers and the policy never re-read
/// ambient state to learn who is calling.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// The authenticated user
    pub user: User,
}

impl AuthContext {
    /// The policy-facing view of the authenticated user.
    pub fn actor(&self) -> Actor {
        Actor::from(&self.user)
    }
}

/// Error type for authentication failures
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No Authorization header on a protected route
    #[error("Missing authorization header")]
    MissingCredentials,

    /// Authorization header is not a Bearer token
    #[error("Expected Bearer token")]
    InvalidFormat,

    /// Token is unknown or has been revoked
    #[error("Invalid or revoked token")]
    InvalidToken,

    /// Credential lookup failed
    #[error("Authentication lookup failed: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Extracts the bearer secret from request headers.
///
/// # Errors
///
/// - `MissingCredentials` if there is no Authorization header
/// - `InvalidFormat` if the header is not `Bearer <token>`
pub fn bearer_secret(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    value.strip_prefix("Bearer ").ok_or(AuthError::InvalidFormat)
}

/// Resolves a bearer secret to an authenticated context.
///
/// # Errors
///
/// - `InvalidToken` if the secret matches no stored token
/// - `DatabaseError` if the lookup itself fails
pub async fn authenticate(pool: &PgPool, secret: &str) -> Result<AuthContext, AuthError> {
    let user = AccessToken::resolve(pool, secret)
        .await?
        .ok_or(AuthError::InvalidToken)?;

    Ok(AuthContext { user })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::Role;
    use axum::http::HeaderValue;
    use chrono::Utc;
    use uuid::Uuid;

    fn headers_with_auth(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_secret_extracts_token() {
        let headers = headers_with_auth("Bearer tb_sometoken");
        assert_eq!(bearer_secret(&headers).unwrap(), "tb_sometoken");
    }

    #[test]
    fn test_bearer_secret_missing_header() {
        let headers = HeaderMap::new();
        assert!(matches!(
            bearer_secret(&headers),
            Err(AuthError::MissingCredentials)
        ));
    }

    #[test]
    fn test_bearer_secret_wrong_scheme() {
        let headers = headers_with_auth("Basic dXNlcjpwYXNz");
        assert!(matches!(
            bearer_secret(&headers),
            Err(AuthError::InvalidFormat)
        ));
    }

    #[test]
    fn test_auth_context_actor_mirrors_user() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Test".to_string(),
            email: "test@example.com".to_string(),
            password_hash: "hash".to_string(),
            role: Role::User,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let ctx = AuthContext { user: user.clone() };
        let actor = ctx.actor();
        assert_eq!(actor.id, user.id);
        assert_eq!(actor.role, Role::User);
    }
}
