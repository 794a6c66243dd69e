//! Value objects - immutable types that represent domain concepts

mod access_level;
mod actor;
mod dialect;
mod post_flags;
mod snowflake;

pub use access_level::AccessLevel;
pub use actor::Actor;
pub use dialect::{DialectParseError, MarkupDialect, MAX_TAG_LEN};
pub use post_flags::PostFlags;
pub use snowflake::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
