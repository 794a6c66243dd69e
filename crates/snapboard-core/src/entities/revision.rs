//! Revision entity - an immutable snapshot of a post's text

use chrono::{DateTime, Utc};

use crate::value_objects::{MarkupDialect, Snowflake};

/// Stored revision. Never updated or deleted once written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision {
    pub id: Snowflake,
    pub post_id: Snowflake,
    /// 1-based position in the post's history
    pub seq: i32,
    pub text: String,
    pub dialect: MarkupDialect,
    pub author_id: Snowflake,
    pub created_at: DateTime<Utc>,
}

impl Revision {
    #[inline]
    pub fn is_first(&self) -> bool {
        self.seq == 1
    }

    /// Truncated raw text, cut on a char boundary
    pub fn preview(&self, max_len: usize) -> &str {
        if self.text.len() <= max_len {
            return &self.text;
        }
        let mut end = max_len;
        while end > 0 && !self.text.is_char_boundary(end) {
            end -= 1;
        }
        &self.text[..end]
    }
}

/// Revision as handed to the store, before it has a sequence number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRevision {
    pub id: Snowflake,
    pub post_id: Snowflake,
    pub text: String,
    pub dialect: MarkupDialect,
    pub author_id: Snowflake,
    pub created_at: DateTime<Utc>,
}

impl NewRevision {
    pub fn new(
        id: Snowflake,
        post_id: Snowflake,
        text: String,
        dialect: MarkupDialect,
        author_id: Snowflake,
    ) -> Self {
        Self {
            id,
            post_id,
            text,
            dialect,
            author_id,
            created_at: Utc::now(),
        }
    }

    /// Finalize with the sequence number the store assigned.
    ///
    /// The timestamp is clamped to `not_before` so history stays ordered by
    /// time even when the wall clock steps backwards.
    pub fn into_revision(self, seq: i32, not_before: Option<DateTime<Utc>>) -> Revision {
        let created_at = match not_before {
            Some(floor) if floor > self.created_at => floor,
            _ => self.created_at,
        };
        Revision {
            id: self.id,
            post_id: self.post_id,
            seq,
            text: self.text,
            dialect: self.dialect,
            author_id: self.author_id,
            created_at,
        }
    }
}

/// Record hiding a revision from readers without touching the revision row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Retraction {
    pub revision_id: Snowflake,
    pub post_id: Snowflake,
    pub retracted_by: Snowflake,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Retraction {
    pub fn new(
        revision_id: Snowflake,
        post_id: Snowflake,
        retracted_by: Snowflake,
        reason: Option<String>,
    ) -> Self {
        Self {
            revision_id,
            post_id,
            retracted_by,
            reason,
            created_at: Utc::now(),
        }
    }
}
