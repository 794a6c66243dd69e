//! Abuse report and ban database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct AbuseReportModel {
    pub id: i64,
    pub post_id: i64,
    pub submitter_id: i64,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct UserBanModel {
    pub user_id: i64,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

/// Addresses are stored in their canonical text form
#[derive(Debug, Clone, FromRow)]
pub struct IpBanModel {
    pub address: String,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}
