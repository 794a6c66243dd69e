//! Business logic services
//!
//! Every service borrows a [`ServiceContext`] and is cheap to construct per
//! call site.

pub mod ban_cache;
pub mod context;
pub mod error;
pub mod moderation;
pub mod permission;
pub mod render;
pub mod revision;
pub mod watch;

pub use ban_cache::BanCache;
pub use context::{ServiceContext, ServiceContextBuilder, ServiceSettings};
pub use error::{ServiceError, ServiceResult};
pub use moderation::ModerationService;
pub use permission::PermissionService;
pub use render::RenderService;
pub use revision::RevisionService;
pub use watch::WatchService;
