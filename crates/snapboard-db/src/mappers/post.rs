//! Post, Revision and Retraction entity <-> model mapper

use snapboard_core::entities::{Post, Retraction, Revision};
use snapboard_core::error::DomainError;
use snapboard_core::value_objects::{MarkupDialect, PostFlags, Snowflake};

use crate::models::{PostModel, RetractionModel, RevisionModel};

impl From<PostModel> for Post {
    fn from(model: PostModel) -> Self {
        Post {
            id: Snowflake::new(model.id),
            topic_id: Snowflake::new(model.topic_id),
            author_id: Snowflake::new(model.author_id),
            current_revision_id: Snowflake::new(model.current_revision_id),
            revision_count: model.revision_count,
            flags: PostFlags::from_i16(model.flags),
            ip: model.ip,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// The dialect column is free text; a malformed tag means a corrupt row
impl TryFrom<RevisionModel> for Revision {
    type Error = DomainError;

    fn try_from(model: RevisionModel) -> Result<Self, Self::Error> {
        let dialect: MarkupDialect = model.dialect.parse().map_err(|_| {
            DomainError::DatabaseError(format!(
                "revision {} has malformed dialect {:?}",
                model.id, model.dialect
            ))
        })?;

        Ok(Revision {
            id: Snowflake::new(model.id),
            post_id: Snowflake::new(model.post_id),
            seq: model.seq,
            text: model.text,
            dialect,
            author_id: Snowflake::new(model.author_id),
            created_at: model.created_at,
        })
    }
}

impl From<RetractionModel> for Retraction {
    fn from(model: RetractionModel) -> Self {
        Retraction {
            revision_id: Snowflake::new(model.revision_id),
            post_id: Snowflake::new(model.post_id),
            retracted_by: Snowflake::new(model.retracted_by),
            reason: model.reason,
            created_at: model.created_at,
        }
    }
}

/// Convert Post entity reference to values for database insertion
pub struct PostInsert<'a> {
    pub id: i64,
    pub topic_id: i64,
    pub author_id: i64,
    pub current_revision_id: i64,
    pub flags: i16,
    pub ip: Option<&'a str>,
}

impl<'a> PostInsert<'a> {
    pub fn new(post: &'a Post) -> Self {
        Self {
            id: post.id.into_inner(),
            topic_id: post.topic_id.into_inner(),
            author_id: post.author_id.into_inner(),
            current_revision_id: post.current_revision_id.into_inner(),
            flags: post.flags.to_i16(),
            ip: post.ip.as_deref(),
        }
    }
}

/// Convert Revision entity reference to values for database insertion
pub struct RevisionInsert<'a> {
    pub id: i64,
    pub post_id: i64,
    pub seq: i32,
    pub text: &'a str,
    pub dialect: &'a str,
    pub author_id: i64,
}

impl<'a> RevisionInsert<'a> {
    pub fn new(revision: &'a Revision) -> Self {
        Self {
            id: revision.id.into_inner(),
            post_id: revision.post_id.into_inner(),
            seq: revision.seq,
            text: &revision.text,
            dialect: revision.dialect.as_str(),
            author_id: revision.author_id.into_inner(),
        }
    }
}
