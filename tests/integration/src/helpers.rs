//! Test helpers for integration tests
//!
//! [`TestBoard`] wires a service context to a seeded in-memory store and
//! exposes the services the scenarios drive.

use anyhow::Result;
use futures::TryStreamExt;
use snapboard_core::Snowflake;
use snapboard_db::MemoryStore;
use snapboard_service::dto::RevisionResponse;
use snapboard_service::{
    ModerationService, RenderService, RevisionService, ServiceContext, ServiceError,
    ServiceSettings, WatchService,
};

use crate::fixtures::{
    author, closed_topic, forum, new_post, open_topic, staff_forum, FORUM_ID, MODERATOR_ID,
    OTHER_USER_ID, STAFF_GROUP_ID, TOPIC_ID,
};

/// Service context over an in-memory board with an open forum holding an
/// open and a closed topic, a group-only staff forum whose group has
/// [`OTHER_USER_ID`] as its member, and one forum moderator
pub struct TestBoard {
    pub ctx: ServiceContext,
    pub store: MemoryStore,
}

impl TestBoard {
    /// Start a board with default settings
    pub fn start() -> Self {
        Self::start_with_settings(ServiceSettings::default())
    }

    /// Start a board with custom settings
    pub fn start_with_settings(settings: ServiceSettings) -> Self {
        let store = MemoryStore::new();
        store.insert_forum(forum());
        store.insert_forum(staff_forum());
        store.add_group_member(STAFF_GROUP_ID, OTHER_USER_ID);
        store.insert_topic(open_topic());
        store.insert_topic(closed_topic());
        store.add_moderator(FORUM_ID, MODERATOR_ID);

        // Clones share state, so the board can inspect what the services wrote
        let ctx = ServiceContext::from_memory_store(store.clone(), settings);
        Self { ctx, store }
    }

    pub fn revisions(&self) -> RevisionService<'_> {
        RevisionService::new(&self.ctx)
    }

    pub fn renders(&self) -> RenderService<'_> {
        RenderService::new(&self.ctx)
    }

    pub fn moderation(&self) -> ModerationService<'_> {
        ModerationService::new(&self.ctx)
    }

    pub fn watches(&self) -> WatchService<'_> {
        WatchService::new(&self.ctx)
    }

    /// Create a post by [`author`] in the open topic and return its id
    pub async fn post_as_author(&self, text: &str, dialect: &str) -> Result<Snowflake> {
        let post = self
            .revisions()
            .create_post(TOPIC_ID, new_post(text, dialect), &author())
            .await?;
        Ok(post.id.parse()?)
    }

    /// Every visible revision of the post, oldest first
    pub async fn history(&self, post_id: Snowflake) -> Result<Vec<RevisionResponse>> {
        let history = self
            .revisions()
            .list_history(post_id)
            .try_collect::<Vec<_>>()
            .await?;
        Ok(history)
    }

    /// Revisions physically stored for the post, retracted ones included
    pub fn stored_revisions(&self, post_id: Snowflake) -> usize {
        self.store.stored_revisions(post_id)
    }
}

/// Assert that a service call failed with the expected status code
pub fn assert_status<T: std::fmt::Debug>(
    result: Result<T, ServiceError>,
    expected_status: u16,
) -> Result<ServiceError> {
    match result {
        Ok(value) => anyhow::bail!("Expected status {expected_status}, got Ok({value:?})"),
        Err(err) if err.status_code() == expected_status => Ok(err),
        Err(err) => anyhow::bail!(
            "Expected status {}, got {} ({}): {}",
            expected_status,
            err.status_code(),
            err.error_code(),
            err
        ),
    }
}

/// Enable log output for a test run when `RUST_LOG` is set
pub fn init_test_tracing() {
    dotenvy::dotenv().ok();
    if std::env::var("RUST_LOG").is_ok() {
        snapboard_common::try_init_tracing().ok();
    }
}
