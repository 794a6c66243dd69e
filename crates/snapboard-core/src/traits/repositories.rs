//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation. Operations documented as atomic must either
//! fully apply or leave no trace.

use std::net::IpAddr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{
    AbuseReport, Category, Forum, IpBan, NewRevision, Post, Retraction, Revision, Topic, UserBan,
    Watch,
};
use crate::error::DomainError;
use crate::value_objects::{PostFlags, Snowflake};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Post Repository
// ============================================================================

/// Pagination options for posts in a topic (oldest first)
#[derive(Debug, Clone, Default)]
pub struct PostQuery {
    pub after: Option<Snowflake>,
    pub limit: i64,
    pub include_hidden: bool,
}

#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Find post by ID, deleted posts included
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Post>>;

    /// List posts in a topic, oldest first
    async fn find_by_topic(&self, topic_id: Snowflake, query: PostQuery) -> RepoResult<Vec<Post>>;

    /// Create a post and its first revision atomically.
    ///
    /// `post.current_revision_id` must equal `first.id`.
    async fn create_with_revision(&self, post: &Post, first: NewRevision)
        -> RepoResult<(Post, Revision)>;

    /// Set `set` and clear `clear` in one atomic update, returning the
    /// stored flags. Concurrent updates to different bits never overwrite
    /// each other.
    async fn update_flags(
        &self,
        id: Snowflake,
        set: PostFlags,
        clear: PostFlags,
    ) -> RepoResult<PostFlags>;
}

// ============================================================================
// Revision Repository
// ============================================================================

/// Cursor for walking a post's history, oldest first
#[derive(Debug, Clone, Copy, Default)]
pub struct HistoryQuery {
    /// Only revisions with a sequence number greater than this
    pub after_seq: Option<i32>,
    pub limit: i64,
}

impl HistoryQuery {
    pub fn first(limit: i64) -> Self {
        Self {
            after_seq: None,
            limit,
        }
    }

    pub fn after(seq: i32, limit: i64) -> Self {
        Self {
            after_seq: Some(seq),
            limit,
        }
    }
}

/// Reads skip retracted revisions unless stated otherwise.
#[async_trait]
pub trait RevisionRepository: Send + Sync {
    /// Find revision by ID, retracted or not
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Revision>>;

    /// The revision the post's pointer references
    async fn find_current(&self, post_id: Snowflake) -> RepoResult<Option<Revision>>;

    /// Revision number `seq` of the post
    async fn find_by_seq(&self, post_id: Snowflake, seq: i32) -> RepoResult<Option<Revision>>;

    /// Latest revision created at or before `at`
    async fn find_as_of(&self, post_id: Snowflake, at: DateTime<Utc>)
        -> RepoResult<Option<Revision>>;

    /// One page of history, oldest first
    async fn find_by_post(&self, post_id: Snowflake, query: HistoryQuery)
        -> RepoResult<Vec<Revision>>;

    /// Number of visible revisions
    async fn count_by_post(&self, post_id: Snowflake) -> RepoResult<i64>;

    /// Store a revision and move the post's pointer to it, atomically.
    ///
    /// Assigns the next sequence number. Concurrent appends to the same post
    /// serialize; the last one to commit becomes current.
    async fn append(&self, revision: NewRevision) -> RepoResult<Revision>;

    /// Record a retraction and move the pointer to the latest remaining
    /// visible revision, atomically. Returns the new current revision.
    async fn retract(&self, retraction: &Retraction) -> RepoResult<Revision>;

    /// Retractions recorded for a post, oldest first
    async fn find_retractions(&self, post_id: Snowflake) -> RepoResult<Vec<Retraction>>;
}

// ============================================================================
// Board Repository
// ============================================================================

#[async_trait]
pub trait BoardRepository: Send + Sync {
    async fn find_topic(&self, id: Snowflake) -> RepoResult<Option<Topic>>;

    /// Fails with `ForumNotFound` if the forum does not exist
    async fn create_topic(&self, topic: &Topic) -> RepoResult<()>;

    async fn find_forum(&self, id: Snowflake) -> RepoResult<Option<Forum>>;

    async fn find_category(&self, id: Snowflake) -> RepoResult<Option<Category>>;

    /// Whether the user is a listed moderator of the forum
    async fn is_moderator(&self, forum_id: Snowflake, user_id: Snowflake) -> RepoResult<bool>;

    async fn is_group_member(&self, group_id: Snowflake, user_id: Snowflake) -> RepoResult<bool>;
}

// ============================================================================
// Watch Repository
// ============================================================================

#[async_trait]
pub trait WatchRepository: Send + Sync {
    /// Returns false if the user already watched the topic
    async fn watch(&self, watch: &Watch) -> RepoResult<bool>;

    /// Returns false if there was nothing to remove
    async fn unwatch(&self, user_id: Snowflake, topic_id: Snowflake) -> RepoResult<bool>;

    async fn is_watching(&self, user_id: Snowflake, topic_id: Snowflake) -> RepoResult<bool>;

    /// Users watching the topic, oldest watch first
    async fn watchers(&self, topic_id: Snowflake) -> RepoResult<Vec<Snowflake>>;

    /// Topics the user watches, most recent first
    async fn find_by_user(&self, user_id: Snowflake) -> RepoResult<Vec<Watch>>;
}

// ============================================================================
// Ban Repository
// ============================================================================

#[async_trait]
pub trait BanRepository: Send + Sync {
    async fn find_user_ban(&self, user_id: Snowflake) -> RepoResult<Option<UserBan>>;

    async fn find_ip_ban(&self, address: IpAddr) -> RepoResult<Option<IpBan>>;

    async fn list_user_bans(&self) -> RepoResult<Vec<UserBan>>;

    async fn list_ip_bans(&self) -> RepoResult<Vec<IpBan>>;

    /// Fails with a conflict if the user is already banned
    async fn create_user_ban(&self, ban: &UserBan) -> RepoResult<()>;

    /// Fails with a conflict if the address is already banned
    async fn create_ip_ban(&self, ban: &IpBan) -> RepoResult<()>;

    async fn delete_user_ban(&self, user_id: Snowflake) -> RepoResult<()>;

    async fn delete_ip_ban(&self, address: IpAddr) -> RepoResult<()>;
}

// ============================================================================
// Abuse Report Repository
// ============================================================================

#[async_trait]
pub trait AbuseReportRepository: Send + Sync {
    /// Fails with `AlreadyReported` on a second report by the same submitter
    async fn create(&self, report: &AbuseReport) -> RepoResult<()>;

    async fn find_by_post(&self, post_id: Snowflake) -> RepoResult<Vec<AbuseReport>>;

    /// All reports, oldest first
    async fn list_open(&self, limit: i64) -> RepoResult<Vec<AbuseReport>>;

    /// Remove every report filed against a post, returns how many
    async fn delete_by_post(&self, post_id: Snowflake) -> RepoResult<u64>;
}
