//! # snapboard-core
//!
//! Domain layer for the board: posts, their immutable revision history, the
//! read-only category/forum/topic context, moderation records, and the
//! repository traits the infrastructure layer implements.
//! This crate has zero dependencies on infrastructure (database, markup libraries, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    AbuseReport, Category, Forum, IpBan, NewRevision, Post, Retraction, Revision, Topic, UserBan,
    Watch,
};
pub use error::DomainError;
pub use traits::{
    AbuseReportRepository, BanRepository, BoardRepository, HistoryQuery, PostQuery,
    PostRepository, RepoResult, RevisionRepository, WatchRepository,
};
pub use value_objects::{
    AccessLevel, Actor, DialectParseError, MarkupDialect, PostFlags, Snowflake, SnowflakeGenerator,
    SnowflakeParseError,
};
