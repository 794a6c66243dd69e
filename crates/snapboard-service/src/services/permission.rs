//! Permission service
//!
//! Decides who may post, edit, and moderate. Staff and superusers moderate
//! every forum; other users only the forums that list them as moderators.
//! Each forum sets who may reply and who may start topics.

use snapboard_core::entities::{Forum, Post, Topic};
use snapboard_core::{AccessLevel, Actor, DomainError, Snowflake};
use tracing::{debug, instrument, warn};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Permission service for access control
pub struct PermissionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PermissionService<'a> {
    /// Create a new PermissionService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Check if the actor moderates the forum
    #[instrument(skip(self, actor), fields(user_id = %actor.user_id))]
    pub async fn can_moderate(&self, actor: &Actor, forum_id: Snowflake) -> ServiceResult<bool> {
        if actor.is_site_moderator() {
            debug!("Site staff, granting moderation");
            return Ok(true);
        }

        let listed = self
            .ctx
            .board_repo()
            .is_moderator(forum_id, actor.user_id)
            .await?;
        debug!(listed, "Resolved forum moderator");
        Ok(listed)
    }

    /// Check moderation rights and return error if denied
    pub async fn require_moderator(&self, actor: &Actor, forum_id: Snowflake) -> ServiceResult<()> {
        if !self.can_moderate(actor, forum_id).await? {
            warn!(user_id = %actor.user_id, forum_id = %forum_id, "Moderation refused");
            return Err(ServiceError::missing_capability("moderate"));
        }
        Ok(())
    }

    /// Refuse banned users and addresses
    pub fn require_not_banned(&self, actor: &Actor) -> ServiceResult<()> {
        let cache = self.ctx.ban_cache();
        if let Some(reason) = cache.user_ban(actor.user_id) {
            warn!(user_id = %actor.user_id, "Banned user refused");
            return Err(DomainError::UserBanned { reason }.into());
        }
        if let Some(reason) = actor.ip.and_then(|ip| cache.ip_ban(ip)) {
            warn!(user_id = %actor.user_id, "Banned address refused");
            return Err(DomainError::IpBanned { reason }.into());
        }
        Ok(())
    }

    /// Whether `level` lets the actor in. `Custom` admits superusers and
    /// members of `group`.
    pub async fn has_access(
        &self,
        actor: &Actor,
        level: AccessLevel,
        group: Option<Snowflake>,
    ) -> ServiceResult<bool> {
        match level {
            AccessLevel::Nobody => Ok(false),
            AccessLevel::All | AccessLevel::Users => Ok(true),
            AccessLevel::Custom if actor.is_superuser => Ok(true),
            AccessLevel::Custom => match group {
                Some(group_id) => Ok(self
                    .ctx
                    .board_repo()
                    .is_group_member(group_id, actor.user_id)
                    .await?),
                None => Ok(false),
            },
        }
    }

    /// Check that the actor may start a post in the topic
    #[instrument(skip(self, actor, topic), fields(user_id = %actor.user_id, topic_id = %topic.id))]
    pub async fn require_can_post(&self, actor: &Actor, topic: &Topic) -> ServiceResult<()> {
        self.require_not_banned(actor)?;

        let forum = self.ctx.find_forum(topic.forum_id).await?;
        if !self.has_access(actor, forum.post_access, forum.post_group).await? {
            warn!(forum_id = %forum.id, "Post refused by forum access");
            return Err(DomainError::ForumRestricted("posts").into());
        }

        if topic.closed && !self.can_moderate(actor, topic.forum_id).await? {
            return Err(DomainError::TopicClosed.into());
        }
        Ok(())
    }

    /// Check that the actor may open a new topic in the forum
    #[instrument(skip(self, actor, forum), fields(user_id = %actor.user_id, forum_id = %forum.id))]
    pub async fn require_can_start_topic(&self, actor: &Actor, forum: &Forum) -> ServiceResult<()> {
        self.require_not_banned(actor)?;

        if !self.has_access(actor, forum.topic_access, forum.topic_group).await? {
            warn!("New topic refused by forum access");
            return Err(DomainError::ForumRestricted("new topics").into());
        }
        Ok(())
    }

    /// Check that the actor may add a revision to the post.
    ///
    /// Authors may edit their own posts while the topic is open and the post
    /// is not deleted; moderators may edit any post.
    #[instrument(skip(self, actor, post, topic), fields(user_id = %actor.user_id, post_id = %post.id))]
    pub async fn require_can_edit(
        &self,
        actor: &Actor,
        post: &Post,
        topic: &Topic,
    ) -> ServiceResult<()> {
        self.require_not_banned(actor)?;

        if self.can_moderate(actor, topic.forum_id).await? {
            return Ok(());
        }
        if !post.is_author(actor.user_id) {
            warn!("Edit by non-author refused");
            return Err(DomainError::NotPostAuthor.into());
        }
        if post.is_deleted() {
            warn!("Edit of deleted post refused");
            return Err(DomainError::PostDeleted.into());
        }
        if topic.closed {
            return Err(DomainError::TopicClosed.into());
        }
        Ok(())
    }

    /// Staff or superuser
    pub fn require_staff(&self, actor: &Actor) -> ServiceResult<()> {
        if actor.is_site_moderator() {
            Ok(())
        } else {
            Err(ServiceError::missing_capability("staff"))
        }
    }

    pub fn require_superuser(&self, actor: &Actor) -> ServiceResult<()> {
        if actor.is_superuser {
            Ok(())
        } else {
            Err(ServiceError::missing_capability("superuser"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use snapboard_core::entities::UserBan;
    use snapboard_core::PostFlags;
    use snapboard_db::MemoryStore;

    use crate::services::ServiceSettings;

    const FORUM: Snowflake = Snowflake::new(10);
    const AUTHOR: Snowflake = Snowflake::new(1);
    const MODERATOR: Snowflake = Snowflake::new(2);
    const STRANGER: Snowflake = Snowflake::new(3);
    const ROOT: Snowflake = Snowflake::new(4);
    const GROUP: Snowflake = Snowflake::new(40);

    fn setup() -> (ServiceContext, Topic, Post) {
        setup_with_forum(|_| {})
    }

    fn setup_with_forum(configure: impl FnOnce(&mut Forum)) -> (ServiceContext, Topic, Post) {
        let store = MemoryStore::new();
        let mut forum = Forum::new(FORUM, Snowflake::new(1), "General".into());
        configure(&mut forum);
        store.insert_forum(forum);
        store.add_moderator(FORUM, MODERATOR);
        store.add_group_member(GROUP, AUTHOR);
        let ctx = ServiceContext::from_memory_store(store, ServiceSettings::default());
        let topic = Topic::new(Snowflake::new(20), FORUM, "Rules".into());
        let post = Post::new(Snowflake::new(30), topic.id, AUTHOR, Snowflake::new(31));
        (ctx, topic, post)
    }

    fn is_domain(err: &ServiceError, code: &str) -> bool {
        matches!(err, ServiceError::Domain(e) if e.code() == code)
    }

    #[tokio::test]
    async fn test_can_moderate() {
        let (ctx, _, _) = setup();
        let permissions = PermissionService::new(&ctx);

        assert!(permissions.can_moderate(&Actor::user(MODERATOR), FORUM).await.unwrap());
        assert!(permissions.can_moderate(&Actor::staff(STRANGER), FORUM).await.unwrap());
        assert!(!permissions.can_moderate(&Actor::user(STRANGER), FORUM).await.unwrap());
        assert!(!permissions
            .can_moderate(&Actor::user(MODERATOR), Snowflake::new(99))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_edit_rules() {
        let (ctx, topic, post) = setup();
        let permissions = PermissionService::new(&ctx);

        permissions
            .require_can_edit(&Actor::user(AUTHOR), &post, &topic)
            .await
            .unwrap();
        permissions
            .require_can_edit(&Actor::user(MODERATOR), &post, &topic)
            .await
            .unwrap();

        let err = permissions
            .require_can_edit(&Actor::user(STRANGER), &post, &topic)
            .await
            .unwrap_err();
        assert!(is_domain(&err, "NOT_POST_AUTHOR"));
        assert_eq!(err.status_code(), 403);
    }

    #[tokio::test]
    async fn test_closed_topic() {
        let (ctx, mut topic, post) = setup();
        topic.closed = true;
        let permissions = PermissionService::new(&ctx);

        let err = permissions
            .require_can_post(&Actor::user(AUTHOR), &topic)
            .await
            .unwrap_err();
        assert!(is_domain(&err, "TOPIC_CLOSED"));

        let err = permissions
            .require_can_edit(&Actor::user(AUTHOR), &post, &topic)
            .await
            .unwrap_err();
        assert!(is_domain(&err, "TOPIC_CLOSED"));

        permissions
            .require_can_post(&Actor::user(MODERATOR), &topic)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_banned_user_refused() {
        let (ctx, topic, _) = setup();
        ctx.ban_repo()
            .create_user_ban(&UserBan {
                user_id: AUTHOR,
                reason: "spam".into(),
                created_at: Utc::now(),
            })
            .await
            .unwrap();
        ctx.warm_ban_cache().await.unwrap();

        let err = PermissionService::new(&ctx)
            .require_can_post(&Actor::user(AUTHOR), &topic)
            .await
            .unwrap_err();
        assert!(is_domain(&err, "USER_BANNED"));
    }

    #[test]
    fn test_site_roles() {
        let ctx = ServiceContext::in_memory();
        let permissions = PermissionService::new(&ctx);

        assert!(permissions.require_staff(&Actor::staff(STRANGER)).is_ok());
        assert!(permissions.require_staff(&Actor::user(STRANGER)).is_err());
        assert!(permissions.require_superuser(&Actor::staff(STRANGER)).is_err());
        assert!(permissions.require_superuser(&Actor::superuser(STRANGER)).is_ok());
    }

    #[tokio::test]
    async fn test_deleted_post_refuses_author_edits() {
        let (ctx, topic, mut post) = setup();
        post.flags = PostFlags::DELETED;
        let permissions = PermissionService::new(&ctx);

        let err = permissions
            .require_can_edit(&Actor::user(AUTHOR), &post, &topic)
            .await
            .unwrap_err();
        assert!(is_domain(&err, "POST_DELETED"));
        assert_eq!(err.status_code(), 403);

        permissions
            .require_can_edit(&Actor::user(MODERATOR), &post, &topic)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_forum_post_access() {
        let (ctx, topic, _) = setup_with_forum(|forum| forum.post_access = AccessLevel::Nobody);
        let permissions = PermissionService::new(&ctx);
        for actor in [Actor::user(AUTHOR), Actor::superuser(ROOT)] {
            let err = permissions.require_can_post(&actor, &topic).await.unwrap_err();
            assert!(is_domain(&err, "FORUM_RESTRICTED"));
        }

        let (ctx, topic, _) = setup_with_forum(|forum| {
            forum.post_access = AccessLevel::Custom;
            forum.post_group = Some(GROUP);
        });
        let permissions = PermissionService::new(&ctx);
        permissions.require_can_post(&Actor::user(AUTHOR), &topic).await.unwrap();
        permissions.require_can_post(&Actor::superuser(ROOT), &topic).await.unwrap();
        let err = permissions
            .require_can_post(&Actor::user(STRANGER), &topic)
            .await
            .unwrap_err();
        assert!(is_domain(&err, "FORUM_RESTRICTED"));
        assert_eq!(err.status_code(), 403);
    }

    #[tokio::test]
    async fn test_post_in_missing_forum_is_not_found() {
        let ctx = ServiceContext::in_memory();
        let topic = Topic::new(Snowflake::new(20), Snowflake::new(99), "Orphan".into());

        let err = PermissionService::new(&ctx)
            .require_can_post(&Actor::user(AUTHOR), &topic)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn test_start_topic_access() {
        let (ctx, _, _) = setup_with_forum(|forum| forum.topic_access = AccessLevel::Custom);
        let forum = ctx.find_forum(FORUM).await.unwrap();
        let permissions = PermissionService::new(&ctx);

        // Custom without a group admits only superusers
        let err = permissions
            .require_can_start_topic(&Actor::user(AUTHOR), &forum)
            .await
            .unwrap_err();
        assert!(is_domain(&err, "FORUM_RESTRICTED"));
        permissions
            .require_can_start_topic(&Actor::superuser(ROOT), &forum)
            .await
            .unwrap();

        let (ctx, _, _) = setup();
        let forum = ctx.find_forum(FORUM).await.unwrap();
        PermissionService::new(&ctx)
            .require_can_start_topic(&Actor::user(STRANGER), &forum)
            .await
            .unwrap();
    }
}
