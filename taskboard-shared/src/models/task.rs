//! Task model and database operations
//!
//! A task belongs to exactly one user. The owner is taken from the
//! authenticated actor at creation time and never changes afterwards; rows
//! are removed when their owner is deleted (`ON DELETE CASCADE`).
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE tasks (
//!     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
//!     owner_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
//!     title VARCHAR(255) NOT NULL,
//!     description TEXT NOT NULL,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

/// Task record
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// User who owns this task; immutable after creation
    pub owner_id: Uuid,

    /// Short title
    pub title: String,

    /// Free-form description
    pub description: String,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Title/description payload shared by create and update
#[derive(Debug, Clone)]
pub struct TaskData {
    /// Short title
    pub title: String,

    /// Free-form description
    pub description: String,
}

impl Task {
    /// Creates a task owned by `owner_id`.
    ///
    /// The owner comes from the authenticated actor, never from the request
    /// body, so a caller cannot attach tasks to someone else.
    pub async fn create(
        pool: &PgPool,
        owner_id: Uuid,
        data: TaskData,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (owner_id, title, description)
            VALUES ($1, $2, $3)
            RETURNING id, owner_id, title, description, created_at, updated_at
            "#,
        )
        .bind(owner_id)
        .bind(data.title)
        .bind(data.description)
        .fetch_one(pool)
        .await
    }

    /// Finds a task by ID, returning `None` if no such row exists.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            SELECT id, owner_id, title, description, created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Lists all tasks owned by a user, oldest first.
    pub async fn list_by_owner(pool: &PgPool, owner_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            SELECT id, owner_id, title, description, created_at, updated_at
            FROM tasks
            WHERE owner_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await
    }

    /// Updates a task's title and description, returning the fresh row.
    ///
    /// Ownership must already have been authorized; this function does not
    /// re-check it. Returns `None` if the task no longer exists.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: TaskData,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET title = $2, description = $3
            WHERE id = $1
            RETURNING id, owner_id, title, description, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(data.title)
        .bind(data.description)
        .fetch_optional(pool)
        .await
    }

    /// Deletes a task by ID. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
