//! Database models
//!
//! Each model struct carries its own CRUD operations as associated
//! functions taking a `PgPool`.
//!
//! # Models
//!
//! - `user`: User accounts with a binary role
//! - `task`: Tasks, each owned by exactly one user
//! - `token`: Opaque bearer tokens backing authentication

pub mod task;
pub mod token;
pub mod user;
