//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use snapboard_core::entities::{AbuseReport, Post, Revision, Topic, Watch};
use snapboard_core::MarkupDialect;
use snapboard_markup::Rendered;

use super::responses::{
    AbuseReportResponse, PostResponse, RenderedResponse, RevisionResponse, TopicResponse,
    WatchResponse,
};

// ============================================================================
// Post Mappers
// ============================================================================

impl From<&Post> for PostResponse {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id.to_string(),
            topic_id: post.topic_id.to_string(),
            author_id: post.author_id.to_string(),
            current_revision_id: post.current_revision_id.to_string(),
            revision_count: post.revision_count,
            edited: post.is_edited(),
            flags: post.flags.names(),
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self::from(&post)
    }
}

// ============================================================================
// Revision Mappers
// ============================================================================

impl From<Revision> for RevisionResponse {
    fn from(revision: Revision) -> Self {
        Self {
            id: revision.id.to_string(),
            post_id: revision.post_id.to_string(),
            seq: revision.seq,
            text: revision.text,
            dialect: revision.dialect,
            author_id: revision.author_id.to_string(),
            created_at: revision.created_at,
        }
    }
}

impl RenderedResponse {
    pub fn new(rendered: Rendered, dialect: MarkupDialect) -> Self {
        Self {
            html: rendered.html,
            dialect,
            degraded: rendered.degraded,
        }
    }
}

// ============================================================================
// Topic Mappers
// ============================================================================

impl TopicResponse {
    pub fn new(topic: Topic, first_post: PostResponse) -> Self {
        Self {
            id: topic.id.to_string(),
            forum_id: topic.forum_id.to_string(),
            subject: topic.subject,
            slug: topic.slug,
            closed: topic.closed,
            created_at: topic.created_at,
            first_post,
        }
    }
}

impl From<Watch> for WatchResponse {
    fn from(watch: Watch) -> Self {
        Self {
            topic_id: watch.topic_id.to_string(),
            created_at: watch.created_at,
        }
    }
}

// ============================================================================
// Moderation Mappers
// ============================================================================

impl From<AbuseReport> for AbuseReportResponse {
    fn from(report: AbuseReport) -> Self {
        Self {
            id: report.id.to_string(),
            post_id: report.post_id.to_string(),
            submitter_id: report.submitter_id.to_string(),
            reason: report.reason,
            created_at: report.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snapboard_core::{PostFlags, Snowflake};

    #[test]
    fn test_post_to_post_response() {
        let mut post = Post::new(
            Snowflake::new(123_456_789),
            Snowflake::new(2),
            Snowflake::new(3),
            Snowflake::new(4),
        );
        post.flags = PostFlags::CENSORED;
        post.revision_count = 3;

        let response = PostResponse::from(&post);
        assert_eq!(response.id, "123456789");
        assert_eq!(response.current_revision_id, "4");
        assert!(response.edited);
        assert_eq!(response.flags, ["censored"]);
    }

    #[test]
    fn test_revision_to_revision_response() {
        let revision = snapboard_core::NewRevision::new(
            Snowflake::new(9),
            Snowflake::new(1),
            "Hello".to_string(),
            MarkupDialect::Textile,
            Snowflake::new(3),
        )
        .into_revision(2, None);

        let response = RevisionResponse::from(revision);
        assert_eq!(response.id, "9");
        assert_eq!(response.seq, 2);
        assert_eq!(response.dialect, MarkupDialect::Textile);
    }
}
