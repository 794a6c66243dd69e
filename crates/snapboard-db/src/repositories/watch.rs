//! PostgreSQL implementation of WatchRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use snapboard_core::entities::Watch;
use snapboard_core::traits::{RepoResult, WatchRepository};
use snapboard_core::value_objects::Snowflake;

use crate::models::WatchModel;

use super::error::map_db_error;

/// PostgreSQL implementation of WatchRepository
#[derive(Clone)]
pub struct PgWatchRepository {
    pool: PgPool,
}

impl PgWatchRepository {
    /// Create a new PgWatchRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WatchRepository for PgWatchRepository {
    #[instrument(skip(self, watch), fields(user_id = %watch.user_id, topic_id = %watch.topic_id))]
    async fn watch(&self, watch: &Watch) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            INSERT INTO topic_watches (user_id, topic_id, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, topic_id) DO NOTHING
            ",
        )
        .bind(watch.user_id.into_inner())
        .bind(watch.topic_id.into_inner())
        .bind(watch.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self))]
    async fn unwatch(&self, user_id: Snowflake, topic_id: Snowflake) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM topic_watches WHERE user_id = $1 AND topic_id = $2")
            .bind(user_id.into_inner())
            .bind(topic_id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self))]
    async fn is_watching(&self, user_id: Snowflake, topic_id: Snowflake) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS(SELECT 1 FROM topic_watches WHERE user_id = $1 AND topic_id = $2)
            ",
        )
        .bind(user_id.into_inner())
        .bind(topic_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn watchers(&self, topic_id: Snowflake) -> RepoResult<Vec<Snowflake>> {
        let users = sqlx::query_scalar::<_, i64>(
            r"
            SELECT user_id
            FROM topic_watches
            WHERE topic_id = $1
            ORDER BY created_at ASC, user_id ASC
            ",
        )
        .bind(topic_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(users.into_iter().map(Snowflake::new).collect())
    }

    #[instrument(skip(self))]
    async fn find_by_user(&self, user_id: Snowflake) -> RepoResult<Vec<Watch>> {
        let results = sqlx::query_as::<_, WatchModel>(
            r"
            SELECT user_id, topic_id, created_at
            FROM topic_watches
            WHERE user_id = $1
            ORDER BY created_at DESC, topic_id DESC
            ",
        )
        .bind(user_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Watch::from).collect())
    }
}
