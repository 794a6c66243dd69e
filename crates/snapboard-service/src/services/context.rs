//! Service context - dependency container for services
//!
//! Holds all repositories, the markup registry, and the other dependencies
//! needed by services.

use std::sync::Arc;

use snapboard_common::BoardConfig;
use snapboard_core::entities::{Forum, Post, Topic};
use snapboard_core::traits::{
    AbuseReportRepository, BanRepository, BoardRepository, PostRepository, RevisionRepository,
    WatchRepository,
};
use snapboard_core::{MarkupDialect, Snowflake, SnowflakeGenerator};
use snapboard_db::{
    MemoryStore, PgAbuseReportRepository, PgBanRepository, PgBoardRepository, PgPool,
    PgPostRepository, PgRevisionRepository, PgWatchRepository,
};
use snapboard_markup::MarkupRegistry;

use super::ban_cache::BanCache;
use super::error::{ServiceError, ServiceResult};

/// Tunables the services read on every call
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    /// Dialect used when a request does not name one
    pub default_dialect: MarkupDialect,
    /// Maximum raw text length, in characters
    pub max_text_length: usize,
    /// Revisions fetched per page when streaming history
    pub history_page_size: i64,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self::from(&BoardConfig::default())
    }
}

impl From<&BoardConfig> for ServiceSettings {
    fn from(config: &BoardConfig) -> Self {
        Self {
            default_dialect: config.post_filter.clone(),
            max_text_length: config.max_post_length,
            history_page_size: config.history_page_size,
        }
    }
}

/// Service context containing all dependencies
///
/// This is the main dependency container that gets passed to all services.
/// It provides access to:
/// - Post, revision, board, watch, ban, and abuse report repositories
/// - The markup registry used for rendering
/// - The ban cache consulted on every write
/// - Snowflake generator for ID generation
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    post_repo: Arc<dyn PostRepository>,
    revision_repo: Arc<dyn RevisionRepository>,
    board_repo: Arc<dyn BoardRepository>,
    watch_repo: Arc<dyn WatchRepository>,
    ban_repo: Arc<dyn BanRepository>,
    report_repo: Arc<dyn AbuseReportRepository>,

    // Rendering
    markup: Arc<MarkupRegistry>,

    // Caches
    ban_cache: BanCache,

    snowflake_generator: Arc<SnowflakeGenerator>,
    settings: ServiceSettings,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        post_repo: Arc<dyn PostRepository>,
        revision_repo: Arc<dyn RevisionRepository>,
        board_repo: Arc<dyn BoardRepository>,
        watch_repo: Arc<dyn WatchRepository>,
        ban_repo: Arc<dyn BanRepository>,
        report_repo: Arc<dyn AbuseReportRepository>,
        markup: Arc<MarkupRegistry>,
        snowflake_generator: Arc<SnowflakeGenerator>,
        settings: ServiceSettings,
    ) -> Self {
        Self {
            post_repo,
            revision_repo,
            board_repo,
            watch_repo,
            ban_repo,
            report_repo,
            markup,
            ban_cache: BanCache::new(),
            snowflake_generator,
            settings,
        }
    }

    /// Context backed by PostgreSQL repositories sharing one pool
    pub fn postgres(
        pool: PgPool,
        snowflake_generator: Arc<SnowflakeGenerator>,
        settings: ServiceSettings,
    ) -> Self {
        Self::new(
            Arc::new(PgPostRepository::new(pool.clone())),
            Arc::new(PgRevisionRepository::new(pool.clone())),
            Arc::new(PgBoardRepository::new(pool.clone())),
            Arc::new(PgWatchRepository::new(pool.clone())),
            Arc::new(PgBanRepository::new(pool.clone())),
            Arc::new(PgAbuseReportRepository::new(pool)),
            Arc::new(MarkupRegistry::standard()),
            snowflake_generator,
            settings,
        )
    }

    /// Context whose repositories all share `store`
    pub fn from_memory_store(store: MemoryStore, settings: ServiceSettings) -> Self {
        let store = Arc::new(store);
        Self::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store,
            Arc::new(MarkupRegistry::standard()),
            Arc::new(SnowflakeGenerator::default()),
            settings,
        )
    }

    /// Fresh in-memory context with default settings
    pub fn in_memory() -> Self {
        Self::from_memory_store(MemoryStore::new(), ServiceSettings::default())
    }

    /// Load current bans into the cache. Call once at startup.
    pub async fn warm_ban_cache(&self) -> ServiceResult<()> {
        self.ban_cache.refresh(self.ban_repo()).await?;
        Ok(())
    }

    // === Repositories ===

    /// Get the post repository
    pub fn post_repo(&self) -> &dyn PostRepository {
        self.post_repo.as_ref()
    }

    /// Get the revision repository
    pub fn revision_repo(&self) -> &dyn RevisionRepository {
        self.revision_repo.as_ref()
    }

    /// Get the board repository
    pub fn board_repo(&self) -> &dyn BoardRepository {
        self.board_repo.as_ref()
    }

    /// Get the watch repository
    pub fn watch_repo(&self) -> &dyn WatchRepository {
        self.watch_repo.as_ref()
    }

    /// Get the ban repository
    pub fn ban_repo(&self) -> &dyn BanRepository {
        self.ban_repo.as_ref()
    }

    /// Get the abuse report repository
    pub fn report_repo(&self) -> &dyn AbuseReportRepository {
        self.report_repo.as_ref()
    }

    /// Load a post or fail with not found
    pub async fn find_post(&self, post_id: Snowflake) -> ServiceResult<Post> {
        self.post_repo
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Post", post_id))
    }

    /// Load a topic or fail with not found
    pub async fn find_topic(&self, topic_id: Snowflake) -> ServiceResult<Topic> {
        self.board_repo
            .find_topic(topic_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Topic", topic_id))
    }

    /// Load a forum or fail with not found
    pub async fn find_forum(&self, forum_id: Snowflake) -> ServiceResult<Forum> {
        self.board_repo
            .find_forum(forum_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Forum", forum_id))
    }

    // === Rendering ===

    /// Get the markup registry
    pub fn markup(&self) -> &MarkupRegistry {
        self.markup.as_ref()
    }

    // === Caches ===

    /// Get the ban cache
    pub fn ban_cache(&self) -> &BanCache {
        &self.ban_cache
    }

    // === Settings ===

    pub fn settings(&self) -> &ServiceSettings {
        &self.settings
    }

    /// Get the snowflake ID generator
    pub fn snowflake_generator(&self) -> &SnowflakeGenerator {
        self.snowflake_generator.as_ref()
    }

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> Snowflake {
        self.snowflake_generator.generate()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("markup", &self.markup)
            .field("ban_cache", &self.ban_cache)
            .field("settings", &self.settings)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
///
/// The markup registry, snowflake generator, and settings fall back to
/// defaults; every repository is required.
#[derive(Default)]
pub struct ServiceContextBuilder {
    post_repo: Option<Arc<dyn PostRepository>>,
    revision_repo: Option<Arc<dyn RevisionRepository>>,
    board_repo: Option<Arc<dyn BoardRepository>>,
    watch_repo: Option<Arc<dyn WatchRepository>>,
    ban_repo: Option<Arc<dyn BanRepository>>,
    report_repo: Option<Arc<dyn AbuseReportRepository>>,
    markup: Option<Arc<MarkupRegistry>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
    settings: Option<ServiceSettings>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post_repo(mut self, repo: Arc<dyn PostRepository>) -> Self {
        self.post_repo = Some(repo);
        self
    }

    pub fn revision_repo(mut self, repo: Arc<dyn RevisionRepository>) -> Self {
        self.revision_repo = Some(repo);
        self
    }

    pub fn board_repo(mut self, repo: Arc<dyn BoardRepository>) -> Self {
        self.board_repo = Some(repo);
        self
    }

    pub fn watch_repo(mut self, repo: Arc<dyn WatchRepository>) -> Self {
        self.watch_repo = Some(repo);
        self
    }

    pub fn ban_repo(mut self, repo: Arc<dyn BanRepository>) -> Self {
        self.ban_repo = Some(repo);
        self
    }

    pub fn report_repo(mut self, repo: Arc<dyn AbuseReportRepository>) -> Self {
        self.report_repo = Some(repo);
        self
    }

    pub fn markup(mut self, registry: Arc<MarkupRegistry>) -> Self {
        self.markup = Some(registry);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    pub fn settings(mut self, settings: ServiceSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any repository is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.post_repo
                .ok_or_else(|| ServiceError::validation("post_repo is required"))?,
            self.revision_repo
                .ok_or_else(|| ServiceError::validation("revision_repo is required"))?,
            self.board_repo
                .ok_or_else(|| ServiceError::validation("board_repo is required"))?,
            self.watch_repo
                .ok_or_else(|| ServiceError::validation("watch_repo is required"))?,
            self.ban_repo
                .ok_or_else(|| ServiceError::validation("ban_repo is required"))?,
            self.report_repo
                .ok_or_else(|| ServiceError::validation("report_repo is required"))?,
            self.markup
                .unwrap_or_else(|| Arc::new(MarkupRegistry::standard())),
            self.snowflake_generator.unwrap_or_default(),
            self.settings.unwrap_or_default(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_follow_board_config() {
        let config = BoardConfig {
            post_filter: MarkupDialect::BbCode,
            max_post_length: 10,
            history_page_size: 3,
        };
        let settings = ServiceSettings::from(&config);
        assert_eq!(settings.default_dialect, MarkupDialect::BbCode);
        assert_eq!(settings.max_text_length, 10);
        assert_eq!(settings.history_page_size, 3);
    }

    #[test]
    fn test_builder_requires_repositories() {
        let err = ServiceContextBuilder::new().build().unwrap_err();
        assert!(err.to_string().contains("post_repo is required"));
    }

    #[test]
    fn test_builder_with_memory_store() {
        let store = Arc::new(MemoryStore::new());
        let ctx = ServiceContextBuilder::new()
            .post_repo(store.clone())
            .revision_repo(store.clone())
            .board_repo(store.clone())
            .watch_repo(store.clone())
            .ban_repo(store.clone())
            .report_repo(store)
            .settings(ServiceSettings {
                max_text_length: 5,
                ..ServiceSettings::default()
            })
            .build()
            .unwrap();
        assert_eq!(ctx.settings().max_text_length, 5);
        assert!(ctx.markup().supports(&MarkupDialect::Textile));
    }

    #[test]
    fn test_generate_id_is_unique() {
        let ctx = ServiceContext::in_memory();
        assert_ne!(ctx.generate_id(), ctx.generate_id());
    }
}
