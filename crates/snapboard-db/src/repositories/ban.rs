//! PostgreSQL implementation of BanRepository

use std::net::IpAddr;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use snapboard_core::entities::{IpBan, UserBan};
use snapboard_core::error::DomainError;
use snapboard_core::traits::{BanRepository, RepoResult};
use snapboard_core::value_objects::Snowflake;

use crate::models::{IpBanModel, UserBanModel};

use super::error::{ban_not_found, map_db_error, map_unique_violation};

/// PostgreSQL implementation of BanRepository
#[derive(Clone)]
pub struct PgBanRepository {
    pool: PgPool,
}

impl PgBanRepository {
    /// Create a new PgBanRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BanRepository for PgBanRepository {
    #[instrument(skip(self))]
    async fn find_user_ban(&self, user_id: Snowflake) -> RepoResult<Option<UserBan>> {
        let result = sqlx::query_as::<_, UserBanModel>(
            r"
            SELECT user_id, reason, created_at
            FROM user_bans
            WHERE user_id = $1
            ",
        )
        .bind(user_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(UserBan::from))
    }

    #[instrument(skip(self))]
    async fn find_ip_ban(&self, address: IpAddr) -> RepoResult<Option<IpBan>> {
        let result = sqlx::query_as::<_, IpBanModel>(
            r"
            SELECT address, reason, created_at
            FROM ip_bans
            WHERE address = $1
            ",
        )
        .bind(address.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(IpBan::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn list_user_bans(&self) -> RepoResult<Vec<UserBan>> {
        let results = sqlx::query_as::<_, UserBanModel>(
            r"
            SELECT user_id, reason, created_at
            FROM user_bans
            ORDER BY created_at DESC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(UserBan::from).collect())
    }

    #[instrument(skip(self))]
    async fn list_ip_bans(&self) -> RepoResult<Vec<IpBan>> {
        let results = sqlx::query_as::<_, IpBanModel>(
            r"
            SELECT address, reason, created_at
            FROM ip_bans
            ORDER BY created_at DESC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(IpBan::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn create_user_ban(&self, ban: &UserBan) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO user_bans (user_id, reason, created_at)
            VALUES ($1, $2, $3)
            ",
        )
        .bind(ban.user_id.into_inner())
        .bind(&ban.reason)
        .bind(ban.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(e, || DomainError::AlreadyBanned(ban.user_id.to_string()))
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn create_ip_ban(&self, ban: &IpBan) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO ip_bans (address, reason, created_at)
            VALUES ($1, $2, $3)
            ",
        )
        .bind(ban.address.to_string())
        .bind(&ban.reason)
        .bind(ban.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(e, || DomainError::AlreadyBanned(ban.address.to_string()))
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_user_ban(&self, user_id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM user_bans WHERE user_id = $1")
            .bind(user_id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(ban_not_found(user_id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_ip_ban(&self, address: IpAddr) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM ip_bans WHERE address = $1")
            .bind(address.to_string())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(ban_not_found(address));
        }

        Ok(())
    }
}
