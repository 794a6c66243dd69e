//! PostgreSQL implementation of RevisionRepository
//!
//! Revision rows are insert-only. Retractions live in their own table and
//! every visible-history query filters on it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use tracing::{info, instrument};

use snapboard_core::entities::{NewRevision, Retraction, Revision};
use snapboard_core::error::DomainError;
use snapboard_core::traits::{HistoryQuery, RepoResult, RevisionRepository};
use snapboard_core::value_objects::Snowflake;

use crate::mappers::RevisionInsert;
use crate::models::{PostLockModel, RetractionModel, RevisionModel};

use super::error::{map_db_error, post_not_found, revision_not_found};

/// PostgreSQL implementation of RevisionRepository
#[derive(Clone)]
pub struct PgRevisionRepository {
    pool: PgPool,
}

impl PgRevisionRepository {
    /// Create a new PgRevisionRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Insert one revision row on an open connection or transaction
pub(super) async fn insert_revision(
    conn: &mut PgConnection,
    revision: &Revision,
) -> Result<(), sqlx::Error> {
    let insert = RevisionInsert::new(revision);
    sqlx::query(
        r"
        INSERT INTO post_revisions (id, post_id, seq, text, dialect, author_id, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ",
    )
    .bind(insert.id)
    .bind(insert.post_id)
    .bind(insert.seq)
    .bind(insert.text)
    .bind(insert.dialect)
    .bind(insert.author_id)
    .bind(revision.created_at)
    .execute(conn)
    .await?;
    Ok(())
}

fn into_revisions(models: Vec<RevisionModel>) -> RepoResult<Vec<Revision>> {
    models.into_iter().map(Revision::try_from).collect()
}

#[async_trait]
impl RevisionRepository for PgRevisionRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Revision>> {
        let result = sqlx::query_as::<_, RevisionModel>(
            r"
            SELECT id, post_id, seq, text, dialect, author_id, created_at
            FROM post_revisions
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Revision::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_current(&self, post_id: Snowflake) -> RepoResult<Option<Revision>> {
        let result = sqlx::query_as::<_, RevisionModel>(
            r"
            SELECT r.id, r.post_id, r.seq, r.text, r.dialect, r.author_id, r.created_at
            FROM posts p
            JOIN post_revisions r ON r.id = p.current_revision_id
            WHERE p.id = $1
            ",
        )
        .bind(post_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Revision::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_seq(&self, post_id: Snowflake, seq: i32) -> RepoResult<Option<Revision>> {
        let result = sqlx::query_as::<_, RevisionModel>(
            r"
            SELECT id, post_id, seq, text, dialect, author_id, created_at
            FROM post_revisions r
            WHERE post_id = $1 AND seq = $2
              AND NOT EXISTS (SELECT 1 FROM revision_retractions x WHERE x.revision_id = r.id)
            ",
        )
        .bind(post_id.into_inner())
        .bind(seq)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Revision::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_as_of(
        &self,
        post_id: Snowflake,
        at: DateTime<Utc>,
    ) -> RepoResult<Option<Revision>> {
        let result = sqlx::query_as::<_, RevisionModel>(
            r"
            SELECT id, post_id, seq, text, dialect, author_id, created_at
            FROM post_revisions r
            WHERE post_id = $1 AND created_at <= $2
              AND NOT EXISTS (SELECT 1 FROM revision_retractions x WHERE x.revision_id = r.id)
            ORDER BY seq DESC
            LIMIT 1
            ",
        )
        .bind(post_id.into_inner())
        .bind(at)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Revision::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_post(
        &self,
        post_id: Snowflake,
        query: HistoryQuery,
    ) -> RepoResult<Vec<Revision>> {
        let limit = query.limit.clamp(1, 500);

        let results = sqlx::query_as::<_, RevisionModel>(
            r"
            SELECT id, post_id, seq, text, dialect, author_id, created_at
            FROM post_revisions r
            WHERE post_id = $1 AND seq > $2
              AND NOT EXISTS (SELECT 1 FROM revision_retractions x WHERE x.revision_id = r.id)
            ORDER BY seq ASC
            LIMIT $3
            ",
        )
        .bind(post_id.into_inner())
        .bind(query.after_seq.unwrap_or(0))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        into_revisions(results)
    }

    #[instrument(skip(self))]
    async fn count_by_post(&self, post_id: Snowflake) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*)
            FROM post_revisions r
            WHERE post_id = $1
              AND NOT EXISTS (SELECT 1 FROM revision_retractions x WHERE x.revision_id = r.id)
            ",
        )
        .bind(post_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self, revision), fields(post_id = %revision.post_id, revision_id = %revision.id))]
    async fn append(&self, revision: NewRevision) -> RepoResult<Revision> {
        let post_id = revision.post_id;
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // Row lock serializes concurrent appends to the same post
        let lock = sqlx::query_as::<_, PostLockModel>(
            r"
            SELECT p.revision_count,
                   (SELECT MAX(created_at) FROM post_revisions WHERE post_id = p.id) AS last_created_at
            FROM posts p
            WHERE p.id = $1
            FOR UPDATE OF p
            ",
        )
        .bind(post_id.into_inner())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?
        .ok_or_else(|| post_not_found(post_id))?;

        let stored = revision.into_revision(lock.revision_count + 1, lock.last_created_at);
        insert_revision(&mut tx, &stored)
            .await
            .map_err(map_db_error)?;

        sqlx::query(
            r"
            UPDATE posts
            SET current_revision_id = $2, revision_count = $3, updated_at = $4
            WHERE id = $1
            ",
        )
        .bind(post_id.into_inner())
        .bind(stored.id.into_inner())
        .bind(stored.seq)
        .bind(stored.created_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        info!(seq = stored.seq, "Revision appended");
        Ok(stored)
    }

    #[instrument(skip(self, retraction), fields(revision_id = %retraction.revision_id))]
    async fn retract(&self, retraction: &Retraction) -> RepoResult<Revision> {
        let post_id = retraction.post_id;
        let revision_id = retraction.revision_id;
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let locked = sqlx::query_scalar::<_, i64>("SELECT id FROM posts WHERE id = $1 FOR UPDATE")
            .bind(post_id.into_inner())
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_db_error)?;
        if locked.is_none() {
            return Err(post_not_found(post_id));
        }

        let visible = sqlx::query_scalar::<_, bool>(
            r"
            SELECT NOT EXISTS (SELECT 1 FROM revision_retractions x WHERE x.revision_id = r.id)
            FROM post_revisions r
            WHERE r.id = $1 AND r.post_id = $2
            ",
        )
        .bind(revision_id.into_inner())
        .bind(post_id.into_inner())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?;
        if visible != Some(true) {
            return Err(revision_not_found(revision_id));
        }

        let next_current = sqlx::query_as::<_, RevisionModel>(
            r"
            SELECT id, post_id, seq, text, dialect, author_id, created_at
            FROM post_revisions r
            WHERE post_id = $1 AND id <> $2
              AND NOT EXISTS (SELECT 1 FROM revision_retractions x WHERE x.revision_id = r.id)
            ORDER BY seq DESC
            LIMIT 1
            ",
        )
        .bind(post_id.into_inner())
        .bind(revision_id.into_inner())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?
        .ok_or(DomainError::LastVisibleRevision(post_id))?;
        let next_current = Revision::try_from(next_current)?;

        sqlx::query(
            r"
            INSERT INTO revision_retractions (revision_id, post_id, retracted_by, reason, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(revision_id.into_inner())
        .bind(post_id.into_inner())
        .bind(retraction.retracted_by.into_inner())
        .bind(retraction.reason.as_deref())
        .bind(retraction.created_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        sqlx::query(
            r"
            UPDATE posts
            SET current_revision_id = $2, updated_at = $3
            WHERE id = $1
            ",
        )
        .bind(post_id.into_inner())
        .bind(next_current.id.into_inner())
        .bind(next_current.created_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        info!(current = %next_current.id, "Revision retracted");
        Ok(next_current)
    }

    #[instrument(skip(self))]
    async fn find_retractions(&self, post_id: Snowflake) -> RepoResult<Vec<Retraction>> {
        let results = sqlx::query_as::<_, RetractionModel>(
            r"
            SELECT revision_id, post_id, retracted_by, reason, created_at
            FROM revision_retractions
            WHERE post_id = $1
            ORDER BY created_at ASC
            ",
        )
        .bind(post_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Retraction::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgRevisionRepository>();
    }
}
