//! Opaque bearer tokens
//!
//! Authentication uses random opaque tokens rather than signed claims. Only
//! the SHA-256 hash of a token is stored; the plaintext secret is returned
//! exactly once, when it is minted on registration or login. Logout deletes
//! every token the caller holds, so revocation is immediate.
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE access_tokens (
//!     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
//!     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
//!     token_hash VARCHAR(64) NOT NULL UNIQUE,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     last_used_at TIMESTAMPTZ
//! );
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use uuid::Uuid;

use super::user::User;

/// Number of random characters after the `tb_` prefix
const SECRET_LEN: usize = 40;

/// Stored token record (hash only, never the secret)
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AccessToken {
    /// Unique token ID
    pub id: Uuid,

    /// User this token authenticates
    pub user_id: Uuid,

    /// SHA-256 hex digest of the full secret
    pub token_hash: String,

    /// When the token was minted
    pub created_at: DateTime<Utc>,

    /// When the token last authenticated a request
    pub last_used_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// Generates a fresh random secret.
    ///
    /// Format: `tb_{40 alphanumeric chars}`. The prefix makes stray secrets
    /// recognizable in logs and support tickets.
    ///
    /// # Example
    ///
    /// ```
    /// use taskboard_shared::models::token::AccessToken;
    ///
    /// let secret = AccessToken::generate_secret();
    /// assert!(secret.starts_with("tb_"));
    /// assert_eq!(secret.len(), 43);
    /// ```
    pub fn generate_secret() -> String {
        use rand::Rng;
        const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
        let mut rng = rand::thread_rng();

        let random: String = (0..SECRET_LEN)
            .map(|_| {
                let idx = rng.gen_range(0..CHARSET.len());
                CHARSET[idx] as char
            })
            .collect();

        format!("tb_{}", random)
    }

    /// Hashes a secret with SHA-256 for storage and lookup.
    ///
    /// # Example
    ///
    /// ```
    /// use taskboard_shared::models::token::AccessToken;
    ///
    /// let hash = AccessToken::hash_secret("tb_example");
    /// assert_eq!(hash.len(), 64);
    /// ```
    pub fn hash_secret(secret: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(secret.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Mints a new token for a user.
    ///
    /// Returns the stored record and the plaintext secret. The secret is
    /// not retrievable afterwards; only its hash is stored.
    pub async fn mint(pool: &PgPool, user_id: Uuid) -> Result<(Self, String), sqlx::Error> {
        let secret = Self::generate_secret();
        let token_hash = Self::hash_secret(&secret);

        let token = sqlx::query_as::<_, AccessToken>(
            r#"
            INSERT INTO access_tokens (user_id, token_hash)
            VALUES ($1, $2)
            RETURNING id, user_id, token_hash, created_at, last_used_at
            "#,
        )
        .bind(user_id)
        .bind(&token_hash)
        .fetch_one(pool)
        .await?;

        Ok((token, secret))
    }

    /// Resolves a presented secret to its user.
    ///
    /// Returns `None` for unknown (or revoked) secrets. On a hit the
    /// token's `last_used_at` is bumped.
    pub async fn resolve(pool: &PgPool, secret: &str) -> Result<Option<User>, sqlx::Error> {
        let token_hash = Self::hash_secret(secret);

        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.name, u.email, u.password_hash, u.role, u.created_at, u.updated_at
            FROM access_tokens t
            JOIN users u ON u.id = t.user_id
            WHERE t.token_hash = $1
            "#,
        )
        .bind(&token_hash)
        .fetch_optional(pool)
        .await?;

        if user.is_some() {
            sqlx::query("UPDATE access_tokens SET last_used_at = NOW() WHERE token_hash = $1")
                .bind(&token_hash)
                .execute(pool)
                .await?;
        }

        Ok(user)
    }

    /// Deletes every token belonging to a user (logout).
    ///
    /// Returns the number of tokens revoked.
    pub async fn revoke_all_for_user(pool: &PgPool, user_id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM access_tokens WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_secret_format() {
        let secret = AccessToken::generate_secret();
        assert!(secret.starts_with("tb_"));
        assert_eq!(secret.len(), 3 + SECRET_LEN);
        assert!(secret[3..].chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_generate_secret_is_random() {
        let a = AccessToken::generate_secret();
        let b = AccessToken::generate_secret();
        assert_ne!(a, b);
    }

    #[test]
    fn test_hash_secret_is_stable() {
        let secret = "tb_fixed";
        assert_eq!(
            AccessToken::hash_secret(secret),
            AccessToken::hash_secret(secret)
        );
    }

    #[test]
    fn test_hash_secret_is_hex_sha256() {
        let hash = AccessToken::hash_secret("tb_fixed");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_different_secrets_hash_differently() {
        assert_ne!(
            AccessToken::hash_secret("tb_one"),
            AccessToken::hash_secret("tb_two")
        );
    }
}
