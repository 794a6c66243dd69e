//! Revision service
//!
//! The write and read side of a post's history. Every edit stores a new
//! immutable revision and moves the post's pointer to it in one atomic
//! repository call; earlier revisions stay readable.

use chrono::{DateTime, Utc};
use futures::stream::{self, Stream, TryStreamExt};
use tracing::{info, instrument, warn};
use validator::Validate;

use snapboard_core::entities::{NewRevision, Post, Revision, Topic, Watch};
use snapboard_core::traits::HistoryQuery;
use snapboard_core::{Actor, DomainError, MarkupDialect, Snowflake};

use crate::dto::{
    AppendRevisionRequest, CreatePostRequest, CreateTopicRequest, HistoryPageRequest,
    PaginatedResponse, PostResponse, RevisionResponse, TopicResponse,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::permission::PermissionService;

/// Largest page the repositories return
const MAX_HISTORY_PAGE: i64 = 500;

/// Revision service
pub struct RevisionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> RevisionService<'a> {
    /// Create a new RevisionService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Start a post in a topic with its first revision
    #[instrument(skip(self, request, actor), fields(user_id = %actor.user_id))]
    pub async fn create_post(
        &self,
        topic_id: Snowflake,
        request: CreatePostRequest,
        actor: &Actor,
    ) -> ServiceResult<PostResponse> {
        request.validate()?;
        check_text(self.ctx, &request.text)?;
        let dialect = resolve_dialect(self.ctx, request.dialect.as_deref())?;

        let topic = self.ctx.find_topic(topic_id).await?;
        PermissionService::new(self.ctx)
            .require_can_post(actor, &topic)
            .await?;

        let post = self.insert_post(&topic, request.text, dialect, actor).await?;
        Ok(PostResponse::from(post))
    }

    /// Open a topic in a forum and store its first post
    #[instrument(skip(self, request, actor), fields(user_id = %actor.user_id))]
    pub async fn create_topic(
        &self,
        forum_id: Snowflake,
        request: CreateTopicRequest,
        actor: &Actor,
    ) -> ServiceResult<TopicResponse> {
        request.validate()?;
        let subject = request.subject.trim();
        if subject.is_empty() {
            return Err(ServiceError::validation("Subject must not be blank"));
        }
        check_text(self.ctx, &request.text)?;
        let dialect = resolve_dialect(self.ctx, request.dialect.as_deref())?;

        let forum = self.ctx.find_forum(forum_id).await?;
        PermissionService::new(self.ctx)
            .require_can_start_topic(actor, &forum)
            .await?;

        let topic = Topic::new(self.ctx.generate_id(), forum.id, subject.to_string());
        self.ctx.board_repo().create_topic(&topic).await?;
        info!(topic_id = %topic.id, forum_id = %forum.id, "Topic created");

        let post = self.insert_post(&topic, request.text, dialect, actor).await?;
        Ok(TopicResponse::new(topic, PostResponse::from(post)))
    }

    /// Store a post with its first revision, then watch the topic for the
    /// author. A failed watch is logged and does not undo the post.
    async fn insert_post(
        &self,
        topic: &Topic,
        text: String,
        dialect: MarkupDialect,
        actor: &Actor,
    ) -> ServiceResult<Post> {
        let post_id = self.ctx.generate_id();
        let revision_id = self.ctx.generate_id();

        let mut post = Post::new(post_id, topic.id, actor.user_id, revision_id);
        post.ip = actor.ip.map(|ip| ip.to_string());
        let first = NewRevision::new(revision_id, post_id, text, dialect.clone(), actor.user_id);

        let (post, _) = self
            .ctx
            .post_repo()
            .create_with_revision(&post, first)
            .await?;
        info!(post_id = %post.id, topic_id = %topic.id, %dialect, "Post created");

        let watch = Watch::new(actor.user_id, topic.id);
        if let Err(e) = self.ctx.watch_repo().watch(&watch).await {
            warn!(post_id = %post.id, error = %e, "Author watch not stored");
        }
        Ok(post)
    }

    /// Store an edit as the post's new current revision.
    ///
    /// Input is validated before permissions are checked, so a refused
    /// retry fails the same way every time and stores nothing.
    #[instrument(skip(self, request, actor), fields(user_id = %actor.user_id))]
    pub async fn append_revision(
        &self,
        post_id: Snowflake,
        request: AppendRevisionRequest,
        actor: &Actor,
    ) -> ServiceResult<RevisionResponse> {
        request.validate()?;
        check_text(self.ctx, &request.text)?;
        let dialect = resolve_dialect(self.ctx, request.dialect.as_deref())?;

        let post = self.ctx.find_post(post_id).await?;
        let topic = self.ctx.find_topic(post.topic_id).await?;
        PermissionService::new(self.ctx)
            .require_can_edit(actor, &post, &topic)
            .await?;

        let draft = NewRevision::new(
            self.ctx.generate_id(),
            post.id,
            request.text,
            dialect,
            actor.user_id,
        );
        let revision = self.ctx.revision_repo().append(draft).await?;

        info!(post_id = %post.id, seq = revision.seq, "Post edited");
        Ok(RevisionResponse::from(revision))
    }

    /// The post's current revision
    #[instrument(skip(self))]
    pub async fn get_current(&self, post_id: Snowflake) -> ServiceResult<RevisionResponse> {
        self.current_revision(post_id)
            .await
            .map(RevisionResponse::from)
    }

    /// Revision number `seq` of the post
    #[instrument(skip(self))]
    pub async fn get_revision(
        &self,
        post_id: Snowflake,
        seq: i32,
    ) -> ServiceResult<RevisionResponse> {
        self.revision_by_seq(post_id, seq)
            .await
            .map(RevisionResponse::from)
    }

    /// What the post said at `at`
    #[instrument(skip(self))]
    pub async fn revision_at(
        &self,
        post_id: Snowflake,
        at: DateTime<Utc>,
    ) -> ServiceResult<RevisionResponse> {
        self.ctx
            .revision_repo()
            .find_as_of(post_id, at)
            .await?
            .map(RevisionResponse::from)
            .ok_or_else(|| ServiceError::not_found("Revision", format!("{post_id}@{at}")))
    }

    /// Every visible revision of the post, oldest first.
    ///
    /// Pages are fetched as the stream is polled. Each call starts again from
    /// the first revision. A missing post yields one not-found error.
    pub fn list_history(
        &self,
        post_id: Snowflake,
    ) -> impl Stream<Item = ServiceResult<RevisionResponse>> + 'a {
        let ctx = self.ctx;
        let page_size = ctx.settings().history_page_size.clamp(1, MAX_HISTORY_PAGE);

        stream::try_unfold(HistoryCursor::Start, move |cursor| {
            next_history_page(ctx, post_id, cursor, page_size)
        })
        .map_ok(|page| {
            stream::iter(
                page.into_iter()
                    .map(|revision| Ok::<_, ServiceError>(RevisionResponse::from(revision))),
            )
        })
        .try_flatten()
    }

    /// One page of history for the pagination collaborator
    #[instrument(skip(self, request))]
    pub async fn history_page(
        &self,
        post_id: Snowflake,
        request: HistoryPageRequest,
    ) -> ServiceResult<PaginatedResponse<RevisionResponse>> {
        request.validate()?;
        self.ctx.find_post(post_id).await?;

        let limit = request
            .limit
            .unwrap_or(self.ctx.settings().history_page_size)
            .clamp(1, 100);
        let query = HistoryQuery {
            after_seq: request.after,
            limit: limit + 1,
        };
        let mut page = self
            .ctx
            .revision_repo()
            .find_by_post(post_id, query)
            .await?;

        let has_more = page.len() as i64 > limit;
        page.truncate(limit as usize);
        let after = has_more
            .then(|| page.last().map(|revision| revision.seq.to_string()))
            .flatten();

        Ok(PaginatedResponse::new(
            page.into_iter().map(RevisionResponse::from).collect(),
            after,
            has_more,
            limit,
        ))
    }

    pub(crate) async fn current_revision(&self, post_id: Snowflake) -> ServiceResult<Revision> {
        self.ctx
            .revision_repo()
            .find_current(post_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Post", post_id))
    }

    pub(crate) async fn revision_by_seq(
        &self,
        post_id: Snowflake,
        seq: i32,
    ) -> ServiceResult<Revision> {
        self.ctx
            .revision_repo()
            .find_by_seq(post_id, seq)
            .await?
            .ok_or_else(|| ServiceError::not_found("Revision", format!("{post_id}#{seq}")))
    }
}

/// Position of a history stream
#[derive(Debug, Clone, Copy)]
enum HistoryCursor {
    Start,
    After(i32),
    Done,
}

async fn next_history_page(
    ctx: &ServiceContext,
    post_id: Snowflake,
    cursor: HistoryCursor,
    page_size: i64,
) -> ServiceResult<Option<(Vec<Revision>, HistoryCursor)>> {
    let after_seq = match cursor {
        HistoryCursor::Done => return Ok(None),
        HistoryCursor::Start => {
            ctx.find_post(post_id).await?;
            None
        }
        HistoryCursor::After(seq) => Some(seq),
    };

    let page = ctx
        .revision_repo()
        .find_by_post(
            post_id,
            HistoryQuery {
                after_seq,
                limit: page_size,
            },
        )
        .await?;

    let next = match page.last() {
        Some(last) if page.len() as i64 == page_size => HistoryCursor::After(last.seq),
        _ => HistoryCursor::Done,
    };
    if page.is_empty() {
        return Ok(None);
    }
    Ok(Some((page, next)))
}

/// Reject blank and oversized text
pub(crate) fn check_text(ctx: &ServiceContext, text: &str) -> ServiceResult<()> {
    if text.trim().is_empty() {
        return Err(DomainError::EmptyText.into());
    }
    let max = ctx.settings().max_text_length;
    if text.chars().count() > max {
        return Err(DomainError::ContentTooLong { max }.into());
    }
    Ok(())
}

/// Parse a dialect tag, falling back to the board default
pub(crate) fn resolve_dialect(
    ctx: &ServiceContext,
    tag: Option<&str>,
) -> ServiceResult<MarkupDialect> {
    let dialect = match tag.map(str::trim).filter(|tag| !tag.is_empty()) {
        Some(tag) => tag.parse::<MarkupDialect>().map_err(DomainError::from)?,
        None => ctx.settings().default_dialect.clone(),
    };
    if !ctx.markup().supports(&dialect) {
        return Err(DomainError::UnsupportedDialect(dialect.to_string()).into());
    }
    Ok(dialect)
}
