//! Render service
//!
//! Turns stored revisions into sanitized HTML through the context's markup
//! registry. Rendering never fails on the text itself.

use snapboard_core::{Actor, MarkupDialect, Snowflake};
use tracing::{debug, instrument};
use validator::Validate;

use crate::dto::{PostResponse, PostView, PreviewRequest, RenderedResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::permission::PermissionService;
use super::revision::{check_text, resolve_dialect, RevisionService};

/// Render service
pub struct RenderService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> RenderService<'a> {
    /// Create a new RenderService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Render raw text in the given dialect
    pub fn render(&self, text: &str, dialect: MarkupDialect) -> ServiceResult<RenderedResponse> {
        let rendered = self.ctx.markup().render(text, &dialect)?;
        Ok(RenderedResponse::new(rendered, dialect))
    }

    /// Render text as it would look once posted, without storing anything
    pub fn preview(&self, request: PreviewRequest) -> ServiceResult<RenderedResponse> {
        request.validate()?;
        let dialect = resolve_dialect(self.ctx, request.dialect.as_deref())?;
        if request.text.trim().is_empty() {
            return Ok(RenderedResponse {
                html: String::new(),
                dialect,
                degraded: false,
            });
        }
        check_text(self.ctx, &request.text)?;
        self.render(&request.text, dialect)
    }

    /// Render the post's current revision
    #[instrument(skip(self))]
    pub async fn render_current(&self, post_id: Snowflake) -> ServiceResult<RenderedResponse> {
        let revision = RevisionService::new(self.ctx)
            .current_revision(post_id)
            .await?;
        self.render(&revision.text, revision.dialect)
    }

    /// Render one historical revision
    #[instrument(skip(self))]
    pub async fn render_revision(
        &self,
        post_id: Snowflake,
        seq: i32,
    ) -> ServiceResult<RenderedResponse> {
        let revision = RevisionService::new(self.ctx)
            .revision_by_seq(post_id, seq)
            .await?;
        self.render(&revision.text, revision.dialect)
    }

    /// The post as `viewer` may see it.
    ///
    /// Censored and deleted posts keep their metadata but lose their body
    /// for everyone except moderators of the forum.
    #[instrument(skip(self, viewer))]
    pub async fn display_post(
        &self,
        post_id: Snowflake,
        viewer: Option<&Actor>,
    ) -> ServiceResult<PostView> {
        let post = self.ctx.find_post(post_id).await?;

        let visible = if post.flags.is_visible() {
            true
        } else if let Some(viewer) = viewer {
            let topic = self.ctx.find_topic(post.topic_id).await?;
            PermissionService::new(self.ctx)
                .can_moderate(viewer, topic.forum_id)
                .await?
        } else {
            false
        };

        if !visible {
            debug!(flags = ?post.flags.names(), "Post body hidden from viewer");
            return Ok(PostView {
                post: PostResponse::from(post),
                body: None,
                hidden: true,
            });
        }

        let body = self.render_current(post.id).await?;
        Ok(PostView {
            hidden: !post.flags.is_visible(),
            post: PostResponse::from(post),
            body: Some(body),
        })
    }
}
