//! PostgreSQL implementation of BoardRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use snapboard_core::entities::{Category, Forum, Topic};
use snapboard_core::error::DomainError;
use snapboard_core::traits::{BoardRepository, RepoResult};
use snapboard_core::value_objects::Snowflake;

use crate::models::{CategoryModel, ForumModel, TopicModel};

use super::error::{map_db_error, map_foreign_key_violation};

/// PostgreSQL implementation of BoardRepository
#[derive(Clone)]
pub struct PgBoardRepository {
    pool: PgPool,
}

impl PgBoardRepository {
    /// Create a new PgBoardRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BoardRepository for PgBoardRepository {
    #[instrument(skip(self))]
    async fn find_topic(&self, id: Snowflake) -> RepoResult<Option<Topic>> {
        let result = sqlx::query_as::<_, TopicModel>(
            r"
            SELECT id, forum_id, subject, slug, closed, private, sticky, created_at
            FROM topics
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Topic::from))
    }

    #[instrument(skip(self, topic), fields(topic_id = %topic.id))]
    async fn create_topic(&self, topic: &Topic) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO topics (id, forum_id, subject, slug, closed, private, sticky, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(topic.id.into_inner())
        .bind(topic.forum_id.into_inner())
        .bind(&topic.subject)
        .bind(&topic.slug)
        .bind(topic.closed)
        .bind(topic.private)
        .bind(topic.sticky)
        .bind(topic.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_foreign_key_violation(e, || DomainError::ForumNotFound(topic.forum_id)))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_forum(&self, id: Snowflake) -> RepoResult<Option<Forum>> {
        let result = sqlx::query_as::<_, ForumModel>(
            r"
            SELECT id, category_id, name, slug, position,
                   post_access, post_group, topic_access, topic_group
            FROM forums
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Forum::from))
    }

    #[instrument(skip(self))]
    async fn find_category(&self, id: Snowflake) -> RepoResult<Option<Category>> {
        let result = sqlx::query_as::<_, CategoryModel>(
            r"
            SELECT id, label, slug, position
            FROM categories
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Category::from))
    }

    #[instrument(skip(self))]
    async fn is_moderator(&self, forum_id: Snowflake, user_id: Snowflake) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS(SELECT 1 FROM forum_moderators WHERE forum_id = $1 AND user_id = $2)
            ",
        )
        .bind(forum_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn is_group_member(&self, group_id: Snowflake, user_id: Snowflake) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS(SELECT 1 FROM user_group_members WHERE group_id = $1 AND user_id = $2)
            ",
        )
        .bind(group_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }
}
