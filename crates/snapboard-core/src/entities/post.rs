//! Post entity - a single message in a topic
//!
//! The post row never holds text itself; it points at the current
//! [`Revision`](super::Revision). Only the pointer, the revision count and
//! the flags change after creation.

use chrono::{DateTime, Utc};

use crate::value_objects::{PostFlags, Snowflake};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: Snowflake,
    pub topic_id: Snowflake,
    pub author_id: Snowflake,
    /// Most recent non-retracted revision
    pub current_revision_id: Snowflake,
    /// Number of revisions ever stored, retracted ones included
    pub revision_count: i32,
    pub flags: PostFlags,
    /// Address the post was first submitted from
    pub ip: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Time of the revision the pointer currently references
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a post whose first revision will be `first_revision_id`
    pub fn new(
        id: Snowflake,
        topic_id: Snowflake,
        author_id: Snowflake,
        first_revision_id: Snowflake,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            topic_id,
            author_id,
            current_revision_id: first_revision_id,
            revision_count: 1,
            flags: PostFlags::empty(),
            ip: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[inline]
    pub fn is_edited(&self) -> bool {
        self.revision_count > 1
    }

    #[inline]
    pub fn is_censored(&self) -> bool {
        self.flags.contains(PostFlags::CENSORED)
    }

    #[inline]
    pub fn is_protected(&self) -> bool {
        self.flags.contains(PostFlags::PROTECTED)
    }

    #[inline]
    pub fn is_deleted(&self) -> bool {
        self.flags.contains(PostFlags::DELETED)
    }

    #[inline]
    pub fn is_author(&self, user_id: Snowflake) -> bool {
        self.author_id == user_id
    }
}
