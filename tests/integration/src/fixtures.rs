//! Test fixtures and data generators
//!
//! Provides reusable board structure, actors, and requests.

use std::sync::atomic::{AtomicU64, Ordering};

use snapboard_core::entities::{Forum, Topic};
use snapboard_core::{AccessLevel, Actor, Snowflake};
use snapboard_service::dto::{
    AppendRevisionRequest, CreatePostRequest, CreateTopicRequest, PreviewRequest,
};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

pub const CATEGORY_ID: Snowflake = Snowflake::new(50);
pub const FORUM_ID: Snowflake = Snowflake::new(100);
/// Forum whose posting is limited to [`STAFF_GROUP_ID`]
pub const STAFF_FORUM_ID: Snowflake = Snowflake::new(101);
pub const STAFF_GROUP_ID: Snowflake = Snowflake::new(300);
pub const TOPIC_ID: Snowflake = Snowflake::new(200);
pub const CLOSED_TOPIC_ID: Snowflake = Snowflake::new(201);

pub const AUTHOR_ID: Snowflake = Snowflake::new(1);
pub const OTHER_USER_ID: Snowflake = Snowflake::new(2);
pub const MODERATOR_ID: Snowflake = Snowflake::new(3);
pub const STAFF_ID: Snowflake = Snowflake::new(4);

pub fn author() -> Actor {
    Actor::user(AUTHOR_ID)
}

pub fn other_user() -> Actor {
    Actor::user(OTHER_USER_ID)
}

/// Moderator of [`FORUM_ID`] only
pub fn moderator() -> Actor {
    Actor::user(MODERATOR_ID)
}

pub fn staff() -> Actor {
    Actor::staff(STAFF_ID)
}

/// Forum open to every registered user
pub fn forum() -> Forum {
    Forum::new(FORUM_ID, CATEGORY_ID, "General".to_string())
}

/// Forum where only members of [`STAFF_GROUP_ID`] post or start topics
pub fn staff_forum() -> Forum {
    let mut forum = Forum::new(STAFF_FORUM_ID, CATEGORY_ID, "Staff Room".to_string());
    forum.post_access = AccessLevel::Custom;
    forum.post_group = Some(STAFF_GROUP_ID);
    forum.topic_access = AccessLevel::Custom;
    forum.topic_group = Some(STAFF_GROUP_ID);
    forum
}

/// Open topic in the test forum
pub fn open_topic() -> Topic {
    Topic::new(TOPIC_ID, FORUM_ID, format!("General {}", unique_suffix()))
}

pub fn closed_topic() -> Topic {
    let mut topic = Topic::new(CLOSED_TOPIC_ID, FORUM_ID, "Announcements".to_string());
    topic.closed = true;
    topic
}

/// New post request
pub fn new_post(text: &str, dialect: &str) -> CreatePostRequest {
    CreatePostRequest {
        text: text.to_string(),
        dialect: Some(dialect.to_string()),
    }
}

/// New topic request in the board's default dialect
pub fn new_topic(subject: &str, text: &str) -> CreateTopicRequest {
    CreateTopicRequest {
        subject: subject.to_string(),
        text: text.to_string(),
        dialect: None,
    }
}

/// Edit request
pub fn edit(text: &str, dialect: &str) -> AppendRevisionRequest {
    AppendRevisionRequest {
        text: text.to_string(),
        dialect: Some(dialect.to_string()),
    }
}

/// Edit that keeps the board's default dialect
pub fn edit_default(text: &str) -> AppendRevisionRequest {
    AppendRevisionRequest {
        text: text.to_string(),
        dialect: None,
    }
}

pub fn preview(text: &str, dialect: &str) -> PreviewRequest {
    PreviewRequest {
        text: text.to_string(),
        dialect: Some(dialect.to_string()),
    }
}
