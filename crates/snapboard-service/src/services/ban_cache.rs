//! Process-wide ban cache
//!
//! Every write path consults the cache instead of the ban tables. The cache
//! is reloaded from the [`BanRepository`] after each ban change and once at
//! startup.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use snapboard_core::traits::{BanRepository, RepoResult};
use snapboard_core::Snowflake;

/// Banned user ids and addresses, mapped to the ban reason.
///
/// Clones share the same maps.
#[derive(Clone, Default)]
pub struct BanCache {
    users: Arc<DashMap<Snowflake, String>>,
    addresses: Arc<DashMap<IpAddr, String>>,
}

impl BanCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reason the user was banned, if they are
    pub fn user_ban(&self, user_id: Snowflake) -> Option<String> {
        self.users.get(&user_id).map(|entry| entry.value().clone())
    }

    /// Reason the address was banned, if it is
    pub fn ip_ban(&self, address: IpAddr) -> Option<String> {
        self.addresses.get(&address).map(|entry| entry.value().clone())
    }

    pub fn is_user_banned(&self, user_id: Snowflake) -> bool {
        self.users.contains_key(&user_id)
    }

    pub fn is_ip_banned(&self, address: IpAddr) -> bool {
        self.addresses.contains_key(&address)
    }

    /// Replace the cached bans with what the repository holds.
    ///
    /// New entries are inserted before stale ones are dropped, so an address
    /// banned before and after the refresh is never briefly unbanned.
    pub async fn refresh(&self, repo: &dyn BanRepository) -> RepoResult<()> {
        let users: HashMap<Snowflake, String> = repo
            .list_user_bans()
            .await?
            .into_iter()
            .map(|ban| (ban.user_id, ban.reason))
            .collect();
        let addresses: HashMap<IpAddr, String> = repo
            .list_ip_bans()
            .await?
            .into_iter()
            .map(|ban| (ban.address, ban.reason))
            .collect();

        for (user_id, reason) in &users {
            self.users.insert(*user_id, reason.clone());
        }
        self.users.retain(|user_id, _| users.contains_key(user_id));

        for (address, reason) in &addresses {
            self.addresses.insert(*address, reason.clone());
        }
        self.addresses.retain(|address, _| addresses.contains_key(address));

        debug!(
            users = self.users.len(),
            addresses = self.addresses.len(),
            "Ban cache refreshed"
        );
        Ok(())
    }
}

impl std::fmt::Debug for BanCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BanCache")
            .field("users", &self.users.len())
            .field("addresses", &self.addresses.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use snapboard_core::entities::{IpBan, UserBan};
    use snapboard_db::MemoryStore;

    fn user_ban(id: i64, reason: &str) -> UserBan {
        UserBan {
            user_id: Snowflake::new(id),
            reason: reason.to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_refresh_loads_bans() {
        let store = MemoryStore::new();
        store.create_user_ban(&user_ban(1, "spam")).await.unwrap();
        let address: IpAddr = "192.0.2.1".parse().unwrap();
        store
            .create_ip_ban(&IpBan {
                address,
                reason: "flood".to_string(),
                created_at: Utc::now(),
            })
            .await
            .unwrap();

        let cache = BanCache::new();
        assert!(!cache.is_user_banned(Snowflake::new(1)));

        cache.refresh(&store).await.unwrap();
        assert_eq!(cache.user_ban(Snowflake::new(1)).as_deref(), Some("spam"));
        assert!(cache.is_ip_banned(address));
        assert!(!cache.is_user_banned(Snowflake::new(2)));
    }

    #[tokio::test]
    async fn test_refresh_drops_lifted_bans() {
        let store = MemoryStore::new();
        store.create_user_ban(&user_ban(1, "spam")).await.unwrap();

        let cache = BanCache::new();
        cache.refresh(&store).await.unwrap();
        assert!(cache.is_user_banned(Snowflake::new(1)));

        store.delete_user_ban(Snowflake::new(1)).await.unwrap();
        cache.refresh(&store).await.unwrap();
        assert!(!cache.is_user_banned(Snowflake::new(1)));
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = MemoryStore::new();
        store.create_user_ban(&user_ban(3, "abuse")).await.unwrap();

        let cache = BanCache::new();
        let shared = cache.clone();
        cache.refresh(&store).await.unwrap();
        assert!(shared.is_user_banned(Snowflake::new(3)));
    }
}
