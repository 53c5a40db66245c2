//! Task endpoints
//!
//! # Endpoints
//!
//! - `GET /tasks` - List the caller's tasks
//! - `POST /tasks` - Create a task owned by the caller
//! - `GET /tasks/:id` - Show one task
//! - `PUT /tasks/:id` - Update one task
//! - `DELETE /tasks/:id` - Delete one task
//!
//! The single-task routes resolve the row first, then authorize: a missing
//! task is 404, an existing task owned by someone else is 403.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use taskboard_shared::{
    auth::{
        middleware::AuthContext,
        policy::{self, Action},
    },
    models::task::{Task, TaskData},
};
use uuid::Uuid;
use validator::Validate;

/// Create/update payload; both fields are required.
#[derive(Debug, Deserialize, Validate)]
pub struct TaskRequest {
    /// Short title
    #[validate(length(
        min = 1,
        max = 255,
        message = "Title must be between 1 and 255 characters"
    ))]
    pub title: String,

    /// Free-form description
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
}

impl From<TaskRequest> for TaskData {
    fn from(req: TaskRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
        }
    }
}

/// Lists the caller's tasks, and only the caller's.
///
/// ```text
/// GET /tasks
/// Authorization: Bearer <token>
/// ```
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = Task::list_by_owner(&state.db, auth.user.id).await?;

    Ok(Json(tasks))
}

/// Creates a task attached to the caller.
///
/// ```text
/// POST /tasks
/// Authorization: Bearer <token>
///
/// { "title": "New Task", "description": "Details" }
/// ```
///
/// Responds `201` with the created task. The owner is always the
/// authenticated actor; the body cannot name one.
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<TaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    req.validate()?;
    policy::authorize(&auth.actor(), Action::CreateTask)?;

    let task = Task::create(&state.db, auth.user.id, req.into()).await?;

    Ok((StatusCode::CREATED, Json(task)))
}

/// Shows a single task. Owner only.
///
/// ```text
/// GET /tasks/:id
/// Authorization: Bearer <token>
/// ```
pub async fn show(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Task>> {
    let task = find_task(&state, id).await?;
    policy::authorize(&auth.actor(), Action::ViewTask { owner_id: task.owner_id })?;

    Ok(Json(task))
}

/// Updates a task's title and description. Owner only.
///
/// ```text
/// PUT /tasks/:id
/// Authorization: Bearer <token>
///
/// { "title": "Updated", "description": "Updated details" }
/// ```
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<TaskRequest>,
) -> ApiResult<Json<Task>> {
    req.validate()?;

    let task = find_task(&state, id).await?;
    policy::authorize(&auth.actor(), Action::UpdateTask { owner_id: task.owner_id })?;

    let task = Task::update(&state.db, id, req.into())
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task))
}

/// Deletes a task. Owner only.
///
/// ```text
/// DELETE /tasks/:id
/// Authorization: Bearer <token>
/// ```
///
/// Responds `200 {"message": "Task deleted"}`.
pub async fn remove(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    let task = find_task(&state, id).await?;
    policy::authorize(&auth.actor(), Action::DeleteTask { owner_id: task.owner_id })?;

    Task::delete(&state.db, id).await?;

    Ok(Json(json!({ "message": "Task deleted" })))
}

/// Shared 404-or-row lookup for the single-task routes.
async fn find_task(state: &AppState, id: Uuid) -> Result<Task, ApiError> {
    Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))
}
