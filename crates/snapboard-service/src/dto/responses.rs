//! Response DTOs
//!
//! All response DTOs implement `Serialize`. Snowflake IDs are serialized as
//! strings for JavaScript compatibility.

use chrono::{DateTime, Utc};
use serde::Serialize;
use snapboard_core::MarkupDialect;

// ============================================================================
// Common Response Types
// ============================================================================

/// One page of a cursor-paginated listing
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, after: Option<String>, has_more: bool, limit: i64) -> Self {
        Self {
            data,
            pagination: PaginationMeta {
                after,
                has_more,
                limit,
            },
        }
    }
}

/// Pagination metadata
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    /// Cursor for fetching the next page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
    /// Whether more results exist
    pub has_more: bool,
    /// Page size limit used
    pub limit: i64,
}

// ============================================================================
// Post Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct PostResponse {
    pub id: String,
    pub topic_id: String,
    pub author_id: String,
    pub current_revision_id: String,
    pub revision_count: i32,
    pub edited: bool,
    /// Set moderation flags, e.g. `["censored"]`
    pub flags: Vec<&'static str>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RevisionResponse {
    pub id: String,
    pub post_id: String,
    pub seq: i32,
    pub text: String,
    pub dialect: MarkupDialect,
    pub author_id: String,
    pub created_at: DateTime<Utc>,
}

/// Sanitized HTML ready for the page template
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedResponse {
    pub html: String,
    pub dialect: MarkupDialect,
    /// Part of the text was shown literally because it could not be parsed
    pub degraded: bool,
}

/// A post as one viewer sees it
#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    pub post: PostResponse,
    /// `None` when the post is hidden from this viewer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<RenderedResponse>,
    pub hidden: bool,
}

// ============================================================================
// Topic Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct TopicResponse {
    pub id: String,
    pub forum_id: String,
    pub subject: String,
    pub slug: String,
    pub closed: bool,
    pub created_at: DateTime<Utc>,
    pub first_post: PostResponse,
}

#[derive(Debug, Clone, Serialize)]
pub struct WatchResponse {
    pub topic_id: String,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Moderation Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct AbuseReportResponse {
    pub id: String,
    pub post_id: String,
    pub submitter_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}
