//! API route handlers
//!
//! Handlers are thin orchestration: validate the input shape, consult the
//! authorization policy, call the model, shape the JSON response.
//!
//! - `health`: Liveness endpoint
//! - `auth`: Registration, login, logout
//! - `users`: Current-user profile and admin user administration
//! - `tasks`: Per-user task CRUD

pub mod auth;
pub mod health;
pub mod tasks;
pub mod users;
