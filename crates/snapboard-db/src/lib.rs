//! # snapboard-db
//!
//! Storage for posts and their revision history.
//!
//! ## Overview
//!
//! Two implementations of every repository trait defined in
//! `snapboard-core`:
//!
//! - PostgreSQL repositories over a SQLx pool, with `FromRow` models and
//!   entity mappers. The tables they expect are in `schema/snapboard.sql`.
//! - [`MemoryStore`], an in-process arena used by tests and embedded setups.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use snapboard_db::pool::{create_pool, DatabaseConfig};
//! use snapboard_db::repositories::PgRevisionRepository;
//! use snapboard_core::traits::RevisionRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env();
//!     let pool = create_pool(&config).await?;
//!     let revisions = PgRevisionRepository::new(pool);
//!
//!     // Use the repository...
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use memory::MemoryStore;
pub use pool::{create_pool, create_pool_from_env, DatabaseConfig, PgPool};
pub use repositories::{
    PgAbuseReportRepository, PgBanRepository, PgBoardRepository, PgPostRepository,
    PgRevisionRepository, PgWatchRepository,
};
