//! Database models - SQLx-compatible structs for PostgreSQL tables

mod board;
mod moderation;
mod post;

pub use board::{CategoryModel, ForumModel, TopicModel, WatchModel};
pub use moderation::{AbuseReportModel, IpBanModel, UserBanModel};
pub use post::{PostLockModel, PostModel, RetractionModel, RevisionModel};
