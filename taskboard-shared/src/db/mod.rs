//! Database layer
//!
//! Connection pooling and migrations. Models live in the `models` module at
//! the crate root.
//!
//! # Example
//!
//! ```no_run
//! use taskboard_shared::db::pool::{create_pool, DatabaseConfig};
//!
//! # async fn example() -> Result<(), sqlx::Error> {
//! let config = DatabaseConfig {
//!     url: std::env::var("DATABASE_URL").unwrap(),
//!     ..Default::default()
//! };
//!
//! let pool = create_pool(config).await?;
//! # Ok(())
//! # }
//! ```

pub mod migrations;
pub mod pool;
