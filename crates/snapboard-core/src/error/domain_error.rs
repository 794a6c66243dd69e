//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Post not found: {0}")]
    PostNotFound(Snowflake),

    #[error("Revision not found: {0}")]
    RevisionNotFound(String),

    #[error("Topic not found: {0}")]
    TopicNotFound(Snowflake),

    #[error("Forum not found: {0}")]
    ForumNotFound(Snowflake),

    #[error("Category not found: {0}")]
    CategoryNotFound(Snowflake),

    #[error("Ban not found: {0}")]
    BanNotFound(String),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Post text is empty")]
    EmptyText,

    #[error("Content too long: max {max} characters")]
    ContentTooLong { max: usize },

    #[error("Unsupported markup dialect: {0}")]
    UnsupportedDialect(String),

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Not post author")]
    NotPostAuthor,

    #[error("Missing capability: {0}")]
    MissingCapability(String),

    #[error("User is banned: {reason}")]
    UserBanned { reason: String },

    #[error("Address is banned: {reason}")]
    IpBanned { reason: String },

    #[error("Topic is closed")]
    TopicClosed,

    #[error("Post is protected from abuse reports")]
    PostProtected,

    #[error("Post is deleted")]
    PostDeleted,

    #[error("Forum does not accept {0}")]
    ForumRestricted(&'static str),

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Post already reported by this user")]
    AlreadyReported,

    #[error("Ban already exists: {0}")]
    AlreadyBanned(String),

    // =========================================================================
    // Business Rule Violations
    // =========================================================================
    #[error("Cannot retract the only visible revision of post {0}")]
    LastVisibleRevision(Snowflake),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::PostNotFound(_) => "UNKNOWN_POST",
            Self::RevisionNotFound(_) => "UNKNOWN_REVISION",
            Self::TopicNotFound(_) => "UNKNOWN_TOPIC",
            Self::ForumNotFound(_) => "UNKNOWN_FORUM",
            Self::CategoryNotFound(_) => "UNKNOWN_CATEGORY",
            Self::BanNotFound(_) => "UNKNOWN_BAN",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::EmptyText => "EMPTY_TEXT",
            Self::ContentTooLong { .. } => "CONTENT_TOO_LONG",
            Self::UnsupportedDialect(_) => "UNSUPPORTED_DIALECT",

            // Authorization
            Self::NotPostAuthor => "NOT_POST_AUTHOR",
            Self::MissingCapability(_) => "MISSING_CAPABILITY",
            Self::UserBanned { .. } => "USER_BANNED",
            Self::IpBanned { .. } => "IP_BANNED",
            Self::TopicClosed => "TOPIC_CLOSED",
            Self::PostProtected => "POST_PROTECTED",
            Self::PostDeleted => "POST_DELETED",
            Self::ForumRestricted(_) => "FORUM_RESTRICTED",

            // Conflict
            Self::AlreadyReported => "ALREADY_REPORTED",
            Self::AlreadyBanned(_) => "ALREADY_BANNED",

            // Business Rules
            Self::LastVisibleRevision(_) => "LAST_VISIBLE_REVISION",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::PostNotFound(_)
                | Self::RevisionNotFound(_)
                | Self::TopicNotFound(_)
                | Self::ForumNotFound(_)
                | Self::CategoryNotFound(_)
                | Self::BanNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::EmptyText
                | Self::ContentTooLong { .. }
                | Self::UnsupportedDialect(_)
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::NotPostAuthor
                | Self::MissingCapability(_)
                | Self::UserBanned { .. }
                | Self::IpBanned { .. }
                | Self::TopicClosed
                | Self::PostProtected
                | Self::PostDeleted
                | Self::ForumRestricted(_)
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::AlreadyReported | Self::AlreadyBanned(_) | Self::LastVisibleRevision(_)
        )
    }
}

impl From<crate::value_objects::DialectParseError> for DomainError {
    fn from(err: crate::value_objects::DialectParseError) -> Self {
        Self::UnsupportedDialect(err.0)
    }
}
