//! Repository trait implementations for [`MemoryStore`]

use std::net::IpAddr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{info, instrument};

use snapboard_core::entities::{
    AbuseReport, Category, Forum, IpBan, NewRevision, Post, Retraction, Revision, Topic, UserBan,
    Watch,
};
use snapboard_core::error::DomainError;
use snapboard_core::traits::{
    AbuseReportRepository, BanRepository, BoardRepository, HistoryQuery, PostQuery,
    PostRepository, RepoResult, RevisionRepository, WatchRepository,
};
use snapboard_core::value_objects::{PostFlags, Snowflake};

use super::MemoryStore;

// ============================================================================
// Posts
// ============================================================================

#[async_trait]
impl PostRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Post>> {
        Ok(self.state.read().posts.get(&id).cloned())
    }

    async fn find_by_topic(&self, topic_id: Snowflake, query: PostQuery) -> RepoResult<Vec<Post>> {
        let limit = query.limit.clamp(1, 100) as usize;
        let state = self.state.read();

        let mut posts: Vec<Post> = state
            .posts
            .values()
            .filter(|post| post.topic_id == topic_id)
            .filter(|post| query.after.map_or(true, |after| post.id > after))
            .filter(|post| query.include_hidden || post.flags.is_visible())
            .cloned()
            .collect();
        posts.sort_by_key(|post| post.id);
        posts.truncate(limit);
        Ok(posts)
    }

    #[instrument(skip(self, post, first), fields(post_id = %post.id))]
    async fn create_with_revision(
        &self,
        post: &Post,
        first: NewRevision,
    ) -> RepoResult<(Post, Revision)> {
        if first.id != post.current_revision_id || first.post_id != post.id {
            return Err(DomainError::InternalError(
                "first revision does not belong to the new post".to_string(),
            ));
        }

        let mut guard = self.state.write();
        let state = &mut *guard;

        if !state.topics.contains_key(&post.topic_id) {
            return Err(DomainError::TopicNotFound(post.topic_id));
        }
        if state.posts.contains_key(&post.id) || state.revision_slots.contains_key(&first.id) {
            return Err(DomainError::ValidationError(format!(
                "post {} already exists",
                post.id
            )));
        }

        let revision = first.into_revision(1, None);
        let mut stored = post.clone();
        stored.revision_count = 1;
        stored.created_at = revision.created_at;
        stored.updated_at = revision.created_at;

        state.revision_slots.insert(revision.id, (post.id, 0));
        state.history.insert(post.id, vec![revision.clone()]);
        state.posts.insert(post.id, stored.clone());

        Ok((stored, revision))
    }

    async fn update_flags(
        &self,
        id: Snowflake,
        set: PostFlags,
        clear: PostFlags,
    ) -> RepoResult<PostFlags> {
        let mut state = self.state.write();
        let post = state
            .posts
            .get_mut(&id)
            .ok_or(DomainError::PostNotFound(id))?;
        post.flags = (post.flags | set) - clear;
        Ok(post.flags)
    }
}

// ============================================================================
// Revisions
// ============================================================================

#[async_trait]
impl RevisionRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Revision>> {
        Ok(self.state.read().revision(id).cloned())
    }

    async fn find_current(&self, post_id: Snowflake) -> RepoResult<Option<Revision>> {
        let state = self.state.read();
        Ok(state
            .posts
            .get(&post_id)
            .and_then(|post| state.revision(post.current_revision_id))
            .cloned())
    }

    async fn find_by_seq(&self, post_id: Snowflake, seq: i32) -> RepoResult<Option<Revision>> {
        let state = self.state.read();
        let slot = seq.checked_sub(1).and_then(|slot| usize::try_from(slot).ok());
        Ok(slot
            .and_then(|slot| state.history.get(&post_id)?.get(slot))
            .filter(|revision| !state.is_retracted(revision.id))
            .cloned())
    }

    async fn find_as_of(
        &self,
        post_id: Snowflake,
        at: DateTime<Utc>,
    ) -> RepoResult<Option<Revision>> {
        let state = self.state.read();
        let found = state
            .visible(post_id)
            .rev()
            .find(|revision| revision.created_at <= at)
            .cloned();
        Ok(found)
    }

    async fn find_by_post(
        &self,
        post_id: Snowflake,
        query: HistoryQuery,
    ) -> RepoResult<Vec<Revision>> {
        let limit = query.limit.clamp(1, 500) as usize;
        let after = query.after_seq.unwrap_or(0);
        let state = self.state.read();

        Ok(state
            .visible(post_id)
            .filter(|revision| revision.seq > after)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn count_by_post(&self, post_id: Snowflake) -> RepoResult<i64> {
        Ok(self.state.read().visible(post_id).count() as i64)
    }

    #[instrument(skip(self, revision), fields(post_id = %revision.post_id, revision_id = %revision.id))]
    async fn append(&self, revision: NewRevision) -> RepoResult<Revision> {
        let post_id = revision.post_id;
        let mut guard = self.state.write();
        let state = &mut *guard;

        if state.revision_slots.contains_key(&revision.id) {
            return Err(DomainError::ValidationError(format!(
                "revision {} already exists",
                revision.id
            )));
        }
        let post = state
            .posts
            .get_mut(&post_id)
            .ok_or(DomainError::PostNotFound(post_id))?;
        let history = state.history.entry(post_id).or_default();

        let last_created_at = history.last().map(|previous| previous.created_at);
        let stored = revision.into_revision(history.len() as i32 + 1, last_created_at);

        state
            .revision_slots
            .insert(stored.id, (post_id, history.len()));
        history.push(stored.clone());
        post.current_revision_id = stored.id;
        post.revision_count = stored.seq;
        post.updated_at = stored.created_at;

        info!(seq = stored.seq, "Revision appended");
        Ok(stored)
    }

    #[instrument(skip(self, retraction), fields(revision_id = %retraction.revision_id))]
    async fn retract(&self, retraction: &Retraction) -> RepoResult<Revision> {
        let post_id = retraction.post_id;
        let revision_id = retraction.revision_id;
        let mut guard = self.state.write();
        let state = &mut *guard;

        if !state.posts.contains_key(&post_id) {
            return Err(DomainError::PostNotFound(post_id));
        }
        let belongs = state
            .revision_slots
            .get(&revision_id)
            .is_some_and(|(owner, _)| *owner == post_id);
        if !belongs || state.is_retracted(revision_id) {
            return Err(DomainError::RevisionNotFound(revision_id.to_string()));
        }

        let next_current = state
            .visible(post_id)
            .rev()
            .find(|revision| revision.id != revision_id)
            .cloned()
            .ok_or(DomainError::LastVisibleRevision(post_id))?;

        state.retractions.insert(revision_id, retraction.clone());
        if let Some(post) = state.posts.get_mut(&post_id) {
            post.current_revision_id = next_current.id;
            post.updated_at = next_current.created_at;
        }

        info!(current = %next_current.id, "Revision retracted");
        Ok(next_current)
    }

    async fn find_retractions(&self, post_id: Snowflake) -> RepoResult<Vec<Retraction>> {
        let state = self.state.read();
        let mut retractions: Vec<Retraction> = state
            .retractions
            .values()
            .filter(|retraction| retraction.post_id == post_id)
            .cloned()
            .collect();
        retractions.sort_by_key(|retraction| retraction.created_at);
        Ok(retractions)
    }
}

// ============================================================================
// Board context
// ============================================================================

#[async_trait]
impl BoardRepository for MemoryStore {
    async fn find_topic(&self, id: Snowflake) -> RepoResult<Option<Topic>> {
        Ok(self.state.read().topics.get(&id).cloned())
    }

    async fn create_topic(&self, topic: &Topic) -> RepoResult<()> {
        let mut state = self.state.write();
        if !state.forums.contains_key(&topic.forum_id) {
            return Err(DomainError::ForumNotFound(topic.forum_id));
        }
        state.topics.insert(topic.id, topic.clone());
        Ok(())
    }

    async fn find_forum(&self, id: Snowflake) -> RepoResult<Option<Forum>> {
        Ok(self.state.read().forums.get(&id).cloned())
    }

    async fn find_category(&self, id: Snowflake) -> RepoResult<Option<Category>> {
        Ok(self.state.read().categories.get(&id).cloned())
    }

    async fn is_moderator(&self, forum_id: Snowflake, user_id: Snowflake) -> RepoResult<bool> {
        Ok(self.state.read().moderators.contains(&(forum_id, user_id)))
    }

    async fn is_group_member(&self, group_id: Snowflake, user_id: Snowflake) -> RepoResult<bool> {
        Ok(self.state.read().group_members.contains(&(group_id, user_id)))
    }
}

// ============================================================================
// Watches
// ============================================================================

#[async_trait]
impl WatchRepository for MemoryStore {
    async fn watch(&self, watch: &Watch) -> RepoResult<bool> {
        let mut state = self.state.write();
        let key = (watch.user_id, watch.topic_id);
        if state.watches.contains_key(&key) {
            return Ok(false);
        }
        state.watches.insert(key, watch.clone());
        Ok(true)
    }

    async fn unwatch(&self, user_id: Snowflake, topic_id: Snowflake) -> RepoResult<bool> {
        Ok(self.state.write().watches.remove(&(user_id, topic_id)).is_some())
    }

    async fn is_watching(&self, user_id: Snowflake, topic_id: Snowflake) -> RepoResult<bool> {
        Ok(self.state.read().watches.contains_key(&(user_id, topic_id)))
    }

    async fn watchers(&self, topic_id: Snowflake) -> RepoResult<Vec<Snowflake>> {
        let mut watches: Vec<Watch> = self
            .state
            .read()
            .watches
            .values()
            .filter(|watch| watch.topic_id == topic_id)
            .cloned()
            .collect();
        watches.sort_by_key(|watch| (watch.created_at, watch.user_id));
        Ok(watches.into_iter().map(|watch| watch.user_id).collect())
    }

    async fn find_by_user(&self, user_id: Snowflake) -> RepoResult<Vec<Watch>> {
        let mut watches: Vec<Watch> = self
            .state
            .read()
            .watches
            .values()
            .filter(|watch| watch.user_id == user_id)
            .cloned()
            .collect();
        watches.sort_by(|a, b| (b.created_at, b.topic_id).cmp(&(a.created_at, a.topic_id)));
        Ok(watches)
    }
}

// ============================================================================
// Bans
// ============================================================================

#[async_trait]
impl BanRepository for MemoryStore {
    async fn find_user_ban(&self, user_id: Snowflake) -> RepoResult<Option<UserBan>> {
        Ok(self.state.read().user_bans.get(&user_id).cloned())
    }

    async fn find_ip_ban(&self, address: IpAddr) -> RepoResult<Option<IpBan>> {
        Ok(self.state.read().ip_bans.get(&address).cloned())
    }

    async fn list_user_bans(&self) -> RepoResult<Vec<UserBan>> {
        let mut bans: Vec<UserBan> = self.state.read().user_bans.values().cloned().collect();
        bans.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(bans)
    }

    async fn list_ip_bans(&self) -> RepoResult<Vec<IpBan>> {
        let mut bans: Vec<IpBan> = self.state.read().ip_bans.values().cloned().collect();
        bans.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(bans)
    }

    async fn create_user_ban(&self, ban: &UserBan) -> RepoResult<()> {
        let mut state = self.state.write();
        if state.user_bans.contains_key(&ban.user_id) {
            return Err(DomainError::AlreadyBanned(ban.user_id.to_string()));
        }
        state.user_bans.insert(ban.user_id, ban.clone());
        Ok(())
    }

    async fn create_ip_ban(&self, ban: &IpBan) -> RepoResult<()> {
        let mut state = self.state.write();
        if state.ip_bans.contains_key(&ban.address) {
            return Err(DomainError::AlreadyBanned(ban.address.to_string()));
        }
        state.ip_bans.insert(ban.address, ban.clone());
        Ok(())
    }

    async fn delete_user_ban(&self, user_id: Snowflake) -> RepoResult<()> {
        self.state
            .write()
            .user_bans
            .remove(&user_id)
            .map(|_| ())
            .ok_or_else(|| DomainError::BanNotFound(user_id.to_string()))
    }

    async fn delete_ip_ban(&self, address: IpAddr) -> RepoResult<()> {
        self.state
            .write()
            .ip_bans
            .remove(&address)
            .map(|_| ())
            .ok_or_else(|| DomainError::BanNotFound(address.to_string()))
    }
}

// ============================================================================
// Abuse reports
// ============================================================================

#[async_trait]
impl AbuseReportRepository for MemoryStore {
    async fn create(&self, report: &AbuseReport) -> RepoResult<()> {
        let mut state = self.state.write();
        let duplicate = state.reports.values().any(|existing| {
            existing.post_id == report.post_id && existing.submitter_id == report.submitter_id
        });
        if duplicate {
            return Err(DomainError::AlreadyReported);
        }
        state.reports.insert(report.id, report.clone());
        Ok(())
    }

    async fn find_by_post(&self, post_id: Snowflake) -> RepoResult<Vec<AbuseReport>> {
        Ok(self
            .state
            .read()
            .reports
            .values()
            .filter(|report| report.post_id == post_id)
            .cloned()
            .collect())
    }

    async fn list_open(&self, limit: i64) -> RepoResult<Vec<AbuseReport>> {
        let limit = limit.clamp(1, 500) as usize;
        Ok(self
            .state
            .read()
            .reports
            .values()
            .take(limit)
            .cloned()
            .collect())
    }

    async fn delete_by_post(&self, post_id: Snowflake) -> RepoResult<u64> {
        let mut state = self.state.write();
        let before = state.reports.len();
        state.reports.retain(|_, report| report.post_id != post_id);
        Ok((before - state.reports.len()) as u64)
    }
}
