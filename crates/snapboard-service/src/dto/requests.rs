//! Request DTOs
//!
//! All request DTOs implement `Deserialize` and `Validate`. Limits that
//! depend on configuration (maximum text length) are checked by the
//! services instead.

use serde::Deserialize;
use validator::Validate;

// ============================================================================
// Post Requests
// ============================================================================

/// Start a new post in a topic
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, message = "Post text must not be empty"))]
    pub text: String,

    /// Markup dialect tag; the board default when absent
    #[validate(length(max = 32, message = "Dialect tag must be at most 32 characters"))]
    pub dialect: Option<String>,
}

/// Open a new topic in a forum with its first post
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTopicRequest {
    #[validate(length(min = 1, max = 255, message = "Subject must be 1-255 characters"))]
    pub subject: String,

    #[validate(length(min = 1, message = "Post text must not be empty"))]
    pub text: String,

    #[validate(length(max = 32, message = "Dialect tag must be at most 32 characters"))]
    pub dialect: Option<String>,
}

/// Edit an existing post
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AppendRevisionRequest {
    #[validate(length(min = 1, message = "Post text must not be empty"))]
    pub text: String,

    #[validate(length(max = 32, message = "Dialect tag must be at most 32 characters"))]
    pub dialect: Option<String>,
}

/// Render text without storing it
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PreviewRequest {
    pub text: String,

    #[validate(length(max = 32, message = "Dialect tag must be at most 32 characters"))]
    pub dialect: Option<String>,
}

/// Cursor for one page of a post's history
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct HistoryPageRequest {
    /// Return revisions after this sequence number
    #[validate(range(min = 0, message = "Cursor must not be negative"))]
    pub after: Option<i32>,

    #[validate(range(min = 1, max = 100, message = "Limit must be 1-100"))]
    pub limit: Option<i64>,
}

// ============================================================================
// Moderation Requests
// ============================================================================

/// Hide a revision from the post's history
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RetractRevisionRequest {
    #[validate(length(max = 512, message = "Reason must be at most 512 characters"))]
    pub reason: Option<String>,
}

/// Report a post to the moderators
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct AbuseReportRequest {
    #[validate(length(max = 1000, message = "Reason must be at most 1000 characters"))]
    pub reason: Option<String>,
}

/// Ban a user or an address
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BanRequest {
    #[validate(length(min = 1, max = 255, message = "Reason must be 1-255 characters"))]
    pub reason: String,
}
