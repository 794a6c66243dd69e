//! Watch service
//!
//! Users follow topics to hear about new posts. Posting in a topic watches
//! it automatically; these calls cover doing it by hand.

use tracing::{debug, instrument};

use snapboard_core::entities::Watch;
use snapboard_core::{Actor, Snowflake};

use crate::dto::WatchResponse;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Watch service
pub struct WatchService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> WatchService<'a> {
    /// Create a new WatchService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Start watching a topic. Returns false if already watched.
    #[instrument(skip(self, actor), fields(user_id = %actor.user_id))]
    pub async fn watch_topic(&self, topic_id: Snowflake, actor: &Actor) -> ServiceResult<bool> {
        let topic = self.ctx.find_topic(topic_id).await?;
        let added = self
            .ctx
            .watch_repo()
            .watch(&Watch::new(actor.user_id, topic.id))
            .await?;
        debug!(added, "Topic watched");
        Ok(added)
    }

    /// Stop watching a topic. Returns false if it was not watched.
    #[instrument(skip(self, actor), fields(user_id = %actor.user_id))]
    pub async fn unwatch_topic(&self, topic_id: Snowflake, actor: &Actor) -> ServiceResult<bool> {
        Ok(self.ctx.watch_repo().unwatch(actor.user_id, topic_id).await?)
    }

    /// Topics the actor watches, most recent first
    pub async fn list_watched(&self, actor: &Actor) -> ServiceResult<Vec<WatchResponse>> {
        let watches = self.ctx.watch_repo().find_by_user(actor.user_id).await?;
        Ok(watches.into_iter().map(WatchResponse::from).collect())
    }

    /// Users to notify about a new post in the topic, the poster excluded
    pub async fn recipients(
        &self,
        topic_id: Snowflake,
        poster: Snowflake,
    ) -> ServiceResult<Vec<Snowflake>> {
        let mut watchers = self.ctx.watch_repo().watchers(topic_id).await?;
        watchers.retain(|user_id| *user_id != poster);
        Ok(watchers)
    }
}
