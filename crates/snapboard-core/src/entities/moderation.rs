//! Moderation records: abuse reports and bans

use std::net::IpAddr;

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// A registered user flagging a post. One per (post, submitter).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbuseReport {
    pub id: Snowflake,
    pub post_id: Snowflake,
    pub submitter_id: Snowflake,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AbuseReport {
    pub fn new(
        id: Snowflake,
        post_id: Snowflake,
        submitter_id: Snowflake,
        reason: Option<String>,
    ) -> Self {
        Self {
            id,
            post_id,
            submitter_id,
            reason,
            created_at: Utc::now(),
        }
    }
}

/// Banned users may still read, but not post or edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserBan {
    pub user_id: Snowflake,
    /// May be shown to the banned user
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

/// Requests from a banned address may not post or edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpBan {
    pub address: IpAddr,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}
