//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in snapboard-core.
//! Each repository handles database operations for a specific domain entity.

mod abuse_report;
mod ban;
mod board;
mod error;
mod post;
mod revision;
mod watch;

pub use abuse_report::PgAbuseReportRepository;
pub use ban::PgBanRepository;
pub use board::PgBoardRepository;
pub use post::PgPostRepository;
pub use revision::PgRevisionRepository;
pub use watch::PgWatchRepository;
