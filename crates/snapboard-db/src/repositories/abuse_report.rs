//! PostgreSQL implementation of AbuseReportRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use snapboard_core::entities::AbuseReport;
use snapboard_core::error::DomainError;
use snapboard_core::traits::{AbuseReportRepository, RepoResult};
use snapboard_core::value_objects::Snowflake;

use crate::models::AbuseReportModel;

use super::error::{map_db_error, map_unique_violation};

/// PostgreSQL implementation of AbuseReportRepository
#[derive(Clone)]
pub struct PgAbuseReportRepository {
    pool: PgPool,
}

impl PgAbuseReportRepository {
    /// Create a new PgAbuseReportRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AbuseReportRepository for PgAbuseReportRepository {
    #[instrument(skip(self))]
    async fn create(&self, report: &AbuseReport) -> RepoResult<()> {
        // UNIQUE (post_id, submitter_id)
        sqlx::query(
            r"
            INSERT INTO abuse_reports (id, post_id, submitter_id, reason, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(report.id.into_inner())
        .bind(report.post_id.into_inner())
        .bind(report.submitter_id.into_inner())
        .bind(report.reason.as_deref())
        .bind(report.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::AlreadyReported))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_post(&self, post_id: Snowflake) -> RepoResult<Vec<AbuseReport>> {
        let results = sqlx::query_as::<_, AbuseReportModel>(
            r"
            SELECT id, post_id, submitter_id, reason, created_at
            FROM abuse_reports
            WHERE post_id = $1
            ORDER BY id ASC
            ",
        )
        .bind(post_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(AbuseReport::from).collect())
    }

    #[instrument(skip(self))]
    async fn list_open(&self, limit: i64) -> RepoResult<Vec<AbuseReport>> {
        let results = sqlx::query_as::<_, AbuseReportModel>(
            r"
            SELECT id, post_id, submitter_id, reason, created_at
            FROM abuse_reports
            ORDER BY id ASC
            LIMIT $1
            ",
        )
        .bind(limit.clamp(1, 500))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(AbuseReport::from).collect())
    }

    #[instrument(skip(self))]
    async fn delete_by_post(&self, post_id: Snowflake) -> RepoResult<u64> {
        let result = sqlx::query("DELETE FROM abuse_reports WHERE post_id = $1")
            .bind(post_id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgAbuseReportRepository>();
    }
}
