//! Post and revision database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for posts table
#[derive(Debug, Clone, FromRow)]
pub struct PostModel {
    pub id: i64,
    pub topic_id: i64,
    pub author_id: i64,
    pub current_revision_id: i64,
    pub revision_count: i32,
    pub flags: i16,
    pub ip: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database model for post_revisions table
#[derive(Debug, Clone, FromRow)]
pub struct RevisionModel {
    pub id: i64,
    pub post_id: i64,
    pub seq: i32,
    pub text: String,
    pub dialect: String,
    pub author_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Database model for revision_retractions table
#[derive(Debug, Clone, FromRow)]
pub struct RetractionModel {
    pub revision_id: i64,
    pub post_id: i64,
    pub retracted_by: i64,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Row read while holding the post lock during an append
#[derive(Debug, Clone, FromRow)]
pub struct PostLockModel {
    pub revision_count: i32,
    pub last_created_at: Option<DateTime<Utc>>,
}
