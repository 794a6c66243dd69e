//! Entity to model mappers
//!
//! This module provides conversions between domain entities (snapboard-core) and database models.
//! - `From<Model> for Entity` / `TryFrom` where a column needs parsing
//! - `*Insert` structs: Prepare entity data for database operations

mod board;
mod moderation;
mod post;

pub use post::{PostInsert, RevisionInsert};
