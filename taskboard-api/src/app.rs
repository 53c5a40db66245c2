//! Application state and router builder
//!
//! # Architecture
//!
//! ```text
//! /
//! ├── GET  /health               # Liveness (public)
//! ├── POST /register             # Create account + first token (public)
//! ├── POST /login                # Mint token (public)
//! ├── POST /logout               # Revoke all caller tokens
//! ├── GET  /user                 # Current profile
//! ├── PUT  /user                 # Update current profile
//! ├── GET  /tasks                # Caller's tasks
//! ├── POST /tasks                # Create task
//! ├── GET  /tasks/:id            # One task (owner only)
//! ├── PUT  /tasks/:id            # Update task (owner only)
//! ├── DELETE /tasks/:id          # Delete task (owner only)
//! ├── GET  /users                # All users (admin only)
//! └── DELETE /users/:id          # Delete a user (admin only)
//! ```
//!
//! Everything below `/login` requires a bearer token; the auth layer
//! rejects unauthenticated requests with 401 before any handler runs.
//! Admin gating happens inside handlers via the authorization policy.

use crate::{config::Config, error::ApiError, middleware::security::SecurityHeadersLayer, routes};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{delete, get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use taskboard_shared::auth::middleware::{authenticate, bearer_secret};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request via Axum's `State` extractor; cheap because the
/// pool is reference-counted and the config sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    // Public routes: no credentials needed.
    let public_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login));

    // Everything else requires a valid bearer token.
    let protected_routes = Router::new()
        .route("/logout", post(routes::auth::logout))
        .route(
            "/user",
            get(routes::users::show_current).put(routes::users::update_current),
        )
        .route(
            "/tasks",
            get(routes::tasks::list).post(routes::tasks::create),
        )
        .route(
            "/tasks/:id",
            get(routes::tasks::show)
                .put(routes::tasks::update)
                .delete(routes::tasks::remove),
        )
        .route("/users", get(routes::users::index))
        .route("/users/:id", delete(routes::users::remove))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            bearer_auth_layer,
        ));

    let cors = build_cors(&state.config);

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer)
        .with_state(state)
}

/// Configures CORS from the allowed-origins list; `*` means permissive
/// (development).
fn build_cors(config: &Config) -> CorsLayer {
    if config.api.cors_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

/// Bearer authentication middleware
///
/// Extracts and resolves the bearer token, then injects an `AuthContext`
/// into request extensions so handlers receive the actor explicitly.
async fn bearer_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let secret = bearer_secret(req.headers())?;
    let auth = authenticate(&state.db, secret).await?;

    req.extensions_mut().insert(auth);

    Ok(next.run(req).await)
}
