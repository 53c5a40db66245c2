//! Common test utilities for integration tests
//!
//! Builds the full router against the database named by `DATABASE_URL` and
//! provides helpers for driving it through tower's `Service` interface,
//! with no network listener involved.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use sqlx::PgPool;
use taskboard_api::app::{build_router, AppState};
use taskboard_api::config::{ApiConfig, Config, DatabaseConfig};
use tower::ServiceExt;
use uuid::Uuid;

/// Test context: the live router plus direct pool access for assertions
/// that go behind the API's back.
pub struct TestContext {
    pub db: PgPool,
    pub app: Router,
}

impl TestContext {
    /// Connects to `DATABASE_URL`, runs migrations, and builds the router.
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let database_url = std::env::var("DATABASE_URL")?;

        let db = PgPool::connect(&database_url).await?;
        taskboard_shared::db::migrations::run_migrations(&db).await?;

        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec!["*".to_string()],
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections: 5,
            },
        };

        let app = build_router(AppState::new(db.clone(), config));

        Ok(Self { db, app })
    }
}

/// Sends one request through the router and returns (status, parsed body).
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, json)
}

/// Registers a fresh user (unique email per call) and returns
/// (user body, bearer token).
pub async fn register_user(app: &Router) -> (Value, String) {
    let email = format!("user-{}@example.com", Uuid::new_v4());

    let (status, body) = send(
        app,
        "POST",
        "/register",
        None,
        Some(json!({
            "name": "Test User",
            "email": email,
            "password": "secret123",
            "password_confirmation": "secret123",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "registration failed: {}", body);
    let token = body["token"].as_str().expect("token in body").to_string();

    (body["user"].clone(), token)
}

/// Promotes a user to admin directly in the database; there is
/// deliberately no API surface for this.
pub async fn make_admin(db: &PgPool, user_id: Uuid) {
    sqlx::query("UPDATE users SET role = 'admin' WHERE id = $1")
        .bind(user_id)
        .execute(db)
        .await
        .expect("promote to admin");
}

/// Creates a task through the API and returns its body.
pub async fn create_task(app: &Router, token: &str, title: &str) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/tasks",
        Some(token),
        Some(json!({
            "title": title,
            "description": "created by integration test",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "task creation failed: {}", body);
    body
}

/// Parses the `id` field of a JSON body as a Uuid.
pub fn id_of(body: &Value) -> Uuid {
    body["id"]
        .as_str()
        .and_then(|s| s.parse().ok())
        .expect("body has a uuid id")
}
