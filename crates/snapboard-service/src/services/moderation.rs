//! Moderation service
//!
//! Post flags, revision retraction, abuse reports, and bans.

use std::net::IpAddr;

use chrono::Utc;
use snapboard_core::entities::{AbuseReport, IpBan, Post, Retraction, Topic, UserBan};
use snapboard_core::{Actor, DomainError, PostFlags, Snowflake};
use tracing::{info, instrument};
use validator::Validate;

use crate::dto::{
    AbuseReportRequest, AbuseReportResponse, BanRequest, PostResponse, RetractRevisionRequest,
    RevisionResponse,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::permission::PermissionService;

/// Moderation service
pub struct ModerationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ModerationService<'a> {
    /// Create a new ModerationService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    // ========================================================================
    // Post flags
    // ========================================================================

    /// Hide the post from readers. Open reports against it are resolved.
    #[instrument(skip(self, actor), fields(user_id = %actor.user_id))]
    pub async fn censor_post(
        &self,
        post_id: Snowflake,
        actor: &Actor,
    ) -> ServiceResult<PostResponse> {
        let (post, topic) = self.load(post_id).await?;
        self.permissions().require_moderator(actor, topic.forum_id).await?;

        let response = self
            .update_flags(post, PostFlags::CENSORED, PostFlags::empty())
            .await?;
        let cleared = self.ctx.report_repo().delete_by_post(post_id).await?;

        info!(post_id = %post_id, cleared, "Post censored");
        Ok(response)
    }

    #[instrument(skip(self, actor), fields(user_id = %actor.user_id))]
    pub async fn uncensor_post(
        &self,
        post_id: Snowflake,
        actor: &Actor,
    ) -> ServiceResult<PostResponse> {
        let (post, topic) = self.load(post_id).await?;
        self.permissions().require_moderator(actor, topic.forum_id).await?;

        let response = self
            .update_flags(post, PostFlags::empty(), PostFlags::CENSORED)
            .await?;
        info!(post_id = %post_id, "Post uncensored");
        Ok(response)
    }

    /// Stop accepting abuse reports for the post
    #[instrument(skip(self, actor), fields(user_id = %actor.user_id))]
    pub async fn protect_post(
        &self,
        post_id: Snowflake,
        actor: &Actor,
    ) -> ServiceResult<PostResponse> {
        self.permissions().require_superuser(actor)?;
        let post = self.ctx.find_post(post_id).await?;

        let response = self
            .update_flags(post, PostFlags::PROTECTED, PostFlags::empty())
            .await?;
        info!(post_id = %post_id, "Post protected");
        Ok(response)
    }

    /// Soft delete. The author may delete their own post.
    #[instrument(skip(self, actor), fields(user_id = %actor.user_id))]
    pub async fn delete_post(
        &self,
        post_id: Snowflake,
        actor: &Actor,
    ) -> ServiceResult<PostResponse> {
        let (post, topic) = self.load(post_id).await?;
        let permissions = self.permissions();
        if post.is_author(actor.user_id) {
            permissions.require_not_banned(actor)?;
        } else {
            permissions.require_moderator(actor, topic.forum_id).await?;
        }

        let response = self
            .update_flags(post, PostFlags::DELETED, PostFlags::empty())
            .await?;
        info!(post_id = %post_id, "Post deleted");
        Ok(response)
    }

    /// Hide one revision from the history and move the post back to the
    /// latest remaining revision. Returns the new current revision.
    #[instrument(skip(self, request, actor), fields(user_id = %actor.user_id))]
    pub async fn retract_revision(
        &self,
        post_id: Snowflake,
        revision_id: Snowflake,
        request: RetractRevisionRequest,
        actor: &Actor,
    ) -> ServiceResult<RevisionResponse> {
        request.validate()?;
        let (_, topic) = self.load(post_id).await?;
        self.permissions().require_moderator(actor, topic.forum_id).await?;

        let retraction = Retraction::new(revision_id, post_id, actor.user_id, request.reason);
        let current = self.ctx.revision_repo().retract(&retraction).await?;

        info!(post_id = %post_id, revision_id = %revision_id, "Revision retracted");
        Ok(RevisionResponse::from(current))
    }

    // ========================================================================
    // Abuse reports
    // ========================================================================

    /// File a report. Each user may report a post once.
    #[instrument(skip(self, request, actor), fields(user_id = %actor.user_id))]
    pub async fn report_abuse(
        &self,
        post_id: Snowflake,
        request: AbuseReportRequest,
        actor: &Actor,
    ) -> ServiceResult<AbuseReportResponse> {
        request.validate()?;
        self.permissions().require_not_banned(actor)?;

        let post = self.ctx.find_post(post_id).await?;
        if !post.flags.is_visible() {
            return Err(ServiceError::not_found("Post", post_id));
        }
        if post.is_protected() {
            return Err(DomainError::PostProtected.into());
        }

        let report = AbuseReport::new(
            self.ctx.generate_id(),
            post_id,
            actor.user_id,
            request.reason,
        );
        self.ctx.report_repo().create(&report).await?;

        info!(post_id = %post_id, report_id = %report.id, "Abuse reported");
        Ok(AbuseReportResponse::from(report))
    }

    /// Oldest reports first
    #[instrument(skip(self, actor), fields(user_id = %actor.user_id))]
    pub async fn list_open_reports(
        &self,
        actor: &Actor,
        limit: i64,
    ) -> ServiceResult<Vec<AbuseReportResponse>> {
        self.permissions().require_staff(actor)?;

        let reports = self.ctx.report_repo().list_open(limit).await?;
        Ok(reports.into_iter().map(AbuseReportResponse::from).collect())
    }

    /// Drop every report against the post, optionally protecting it from
    /// further reports. Protecting takes a superuser.
    #[instrument(skip(self, actor), fields(user_id = %actor.user_id))]
    pub async fn dismiss_reports(
        &self,
        post_id: Snowflake,
        protect: bool,
        actor: &Actor,
    ) -> ServiceResult<u64> {
        let permissions = self.permissions();
        permissions.require_staff(actor)?;
        if protect {
            permissions.require_superuser(actor)?;
        }

        let post = self.ctx.find_post(post_id).await?;
        let dismissed = self.ctx.report_repo().delete_by_post(post_id).await?;
        if protect {
            self.update_flags(post, PostFlags::PROTECTED, PostFlags::empty())
                .await?;
        }

        info!(post_id = %post_id, dismissed, protect, "Reports dismissed");
        Ok(dismissed)
    }

    // ========================================================================
    // Bans
    // ========================================================================

    #[instrument(skip(self, request, actor), fields(user_id = %actor.user_id))]
    pub async fn ban_user(
        &self,
        user_id: Snowflake,
        request: BanRequest,
        actor: &Actor,
    ) -> ServiceResult<()> {
        request.validate()?;
        self.permissions().require_staff(actor)?;
        if user_id == actor.user_id {
            return Err(ServiceError::validation("Cannot ban yourself"));
        }

        let ban = UserBan {
            user_id,
            reason: request.reason,
            created_at: Utc::now(),
        };
        self.ctx.ban_repo().create_user_ban(&ban).await?;
        self.refresh_bans().await?;

        info!(banned = %user_id, "User banned");
        Ok(())
    }

    #[instrument(skip(self, actor), fields(user_id = %actor.user_id))]
    pub async fn unban_user(&self, user_id: Snowflake, actor: &Actor) -> ServiceResult<()> {
        self.permissions().require_staff(actor)?;

        self.ctx.ban_repo().delete_user_ban(user_id).await?;
        self.refresh_bans().await?;

        info!(unbanned = %user_id, "User unbanned");
        Ok(())
    }

    #[instrument(skip(self, request, actor), fields(user_id = %actor.user_id))]
    pub async fn ban_ip(
        &self,
        address: IpAddr,
        request: BanRequest,
        actor: &Actor,
    ) -> ServiceResult<()> {
        request.validate()?;
        self.permissions().require_staff(actor)?;

        let ban = IpBan {
            address,
            reason: request.reason,
            created_at: Utc::now(),
        };
        self.ctx.ban_repo().create_ip_ban(&ban).await?;
        self.refresh_bans().await?;

        info!(%address, "Address banned");
        Ok(())
    }

    #[instrument(skip(self, actor), fields(user_id = %actor.user_id))]
    pub async fn unban_ip(&self, address: IpAddr, actor: &Actor) -> ServiceResult<()> {
        self.permissions().require_staff(actor)?;

        self.ctx.ban_repo().delete_ip_ban(address).await?;
        self.refresh_bans().await?;

        info!(%address, "Address unbanned");
        Ok(())
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn permissions(&self) -> PermissionService<'a> {
        PermissionService::new(self.ctx)
    }

    async fn load(&self, post_id: Snowflake) -> ServiceResult<(Post, Topic)> {
        let post = self.ctx.find_post(post_id).await?;
        let topic = self.ctx.find_topic(post.topic_id).await?;
        Ok((post, topic))
    }

    async fn update_flags(
        &self,
        mut post: Post,
        set: PostFlags,
        clear: PostFlags,
    ) -> ServiceResult<PostResponse> {
        post.flags = self.ctx.post_repo().update_flags(post.id, set, clear).await?;
        Ok(PostResponse::from(post))
    }

    async fn refresh_bans(&self) -> ServiceResult<()> {
        self.ctx.ban_cache().refresh(self.ctx.ban_repo()).await?;
        Ok(())
    }
}
