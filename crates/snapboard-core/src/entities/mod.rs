//! Domain entities - core business objects

mod board;
mod moderation;
mod post;
mod revision;

pub use board::{slugify, Category, Forum, Topic, Watch};
pub use moderation::{AbuseReport, IpBan, UserBan};
pub use post::Post;
pub use revision::{NewRevision, Retraction, Revision};
