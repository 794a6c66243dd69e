//! The authenticated user behind a request
//!
//! Authentication itself lives outside this workspace; callers build an
//! `Actor` from whatever session they resolved.

use std::net::IpAddr;

use serde::{Deserialize, Serialize};

use super::Snowflake;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: Snowflake,
    pub ip: Option<IpAddr>,
    /// Site staff moderate every forum
    pub is_staff: bool,
    /// Superusers may also protect posts
    pub is_superuser: bool,
}

impl Actor {
    /// A regular signed-in user
    pub fn user(user_id: Snowflake) -> Self {
        Self {
            user_id,
            ip: None,
            is_staff: false,
            is_superuser: false,
        }
    }

    pub fn staff(user_id: Snowflake) -> Self {
        Self {
            is_staff: true,
            ..Self::user(user_id)
        }
    }

    pub fn superuser(user_id: Snowflake) -> Self {
        Self {
            is_staff: true,
            is_superuser: true,
            ..Self::user(user_id)
        }
    }

    #[must_use]
    pub fn with_ip(mut self, ip: IpAddr) -> Self {
        self.ip = Some(ip);
        self
    }

    /// Staff or superuser; per-forum moderators are resolved by the service layer
    #[inline]
    pub fn is_site_moderator(&self) -> bool {
        self.is_staff || self.is_superuser
    }
}
