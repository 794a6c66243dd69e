//! PostgreSQL implementation of PostRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use snapboard_core::entities::{NewRevision, Post, Revision};
use snapboard_core::error::DomainError;
use snapboard_core::traits::{PostQuery, PostRepository, RepoResult};
use snapboard_core::value_objects::{PostFlags, Snowflake};

use crate::mappers::PostInsert;
use crate::models::PostModel;

use super::error::{map_db_error, map_unique_violation, post_not_found};
use super::revision::insert_revision;

/// PostgreSQL implementation of PostRepository
#[derive(Clone)]
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    /// Create a new PgPostRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Post>> {
        let result = sqlx::query_as::<_, PostModel>(
            r"
            SELECT id, topic_id, author_id, current_revision_id, revision_count, flags, ip,
                   created_at, updated_at
            FROM posts
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Post::from))
    }

    #[instrument(skip(self))]
    async fn find_by_topic(&self, topic_id: Snowflake, query: PostQuery) -> RepoResult<Vec<Post>> {
        let limit = query.limit.clamp(1, 100);
        let hidden = (PostFlags::CENSORED | PostFlags::DELETED).to_i16();

        let results = sqlx::query_as::<_, PostModel>(
            r"
            SELECT id, topic_id, author_id, current_revision_id, revision_count, flags, ip,
                   created_at, updated_at
            FROM posts
            WHERE topic_id = $1
              AND ($2::BIGINT IS NULL OR id > $2)
              AND ($3 OR flags & $4 = 0)
            ORDER BY id ASC
            LIMIT $5
            ",
        )
        .bind(topic_id.into_inner())
        .bind(query.after.map(Snowflake::into_inner))
        .bind(query.include_hidden)
        .bind(hidden)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Post::from).collect())
    }

    #[instrument(skip(self, first), fields(revision_id = %first.id))]
    async fn create_with_revision(
        &self,
        post: &Post,
        first: NewRevision,
    ) -> RepoResult<(Post, Revision)> {
        if first.id != post.current_revision_id || first.post_id != post.id {
            return Err(DomainError::InternalError(
                "first revision does not belong to the new post".to_string(),
            ));
        }

        let revision = first.into_revision(1, None);
        let insert = PostInsert::new(post);

        // The pointer FK is deferred, so the post row can go in first
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r"
            INSERT INTO posts (id, topic_id, author_id, current_revision_id, revision_count,
                               flags, ip, created_at, updated_at)
            VALUES ($1, $2, $3, $4, 1, $5, $6, $7, $7)
            ",
        )
        .bind(insert.id)
        .bind(insert.topic_id)
        .bind(insert.author_id)
        .bind(insert.current_revision_id)
        .bind(insert.flags)
        .bind(insert.ip)
        .bind(revision.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            map_unique_violation(e, || {
                DomainError::ValidationError(format!("post {} already exists", post.id))
            })
        })?;

        insert_revision(&mut tx, &revision)
            .await
            .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        let mut stored = post.clone();
        stored.revision_count = 1;
        stored.created_at = revision.created_at;
        stored.updated_at = revision.created_at;
        Ok((stored, revision))
    }

    #[instrument(skip(self))]
    async fn update_flags(
        &self,
        id: Snowflake,
        set: PostFlags,
        clear: PostFlags,
    ) -> RepoResult<PostFlags> {
        let stored: Option<i16> = sqlx::query_scalar(
            r"
            UPDATE posts
            SET flags = (flags | $2) & ~$3
            WHERE id = $1
            RETURNING flags
            ",
        )
        .bind(id.into_inner())
        .bind(set.to_i16())
        .bind(clear.to_i16())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        stored
            .map(PostFlags::from_i16)
            .ok_or_else(|| post_not_found(id))
    }
}
