//! In-memory store
//!
//! Revisions live in a per-post arena indexed by sequence number
//! (`seq - 1`), with a side index from revision id to its slot. All state
//! sits behind one `RwLock`, so storing a revision and moving the post's
//! pointer happen in the same critical section and readers never see one
//! without the other.

mod repositories;

use std::collections::{BTreeMap, HashMap, HashSet};
use std::net::IpAddr;
use std::sync::Arc;

use parking_lot::RwLock;

use snapboard_core::entities::{
    AbuseReport, Category, Forum, IpBan, Post, Retraction, Revision, Topic, UserBan, Watch,
};
use snapboard_core::value_objects::Snowflake;

/// Cloning shares the underlying state
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<State>>,
}

#[derive(Default)]
struct State {
    posts: HashMap<Snowflake, Post>,
    /// post id -> revisions in sequence order
    history: HashMap<Snowflake, Vec<Revision>>,
    /// revision id -> (post id, slot in `history`)
    revision_slots: HashMap<Snowflake, (Snowflake, usize)>,
    /// revision id -> retraction
    retractions: HashMap<Snowflake, Retraction>,

    categories: HashMap<Snowflake, Category>,
    forums: HashMap<Snowflake, Forum>,
    topics: HashMap<Snowflake, Topic>,
    /// (forum id, user id)
    moderators: HashSet<(Snowflake, Snowflake)>,
    /// (group id, user id)
    group_members: HashSet<(Snowflake, Snowflake)>,
    /// (user id, topic id) -> watch
    watches: HashMap<(Snowflake, Snowflake), Watch>,

    user_bans: HashMap<Snowflake, UserBan>,
    ip_bans: HashMap<IpAddr, IpBan>,
    /// Ordered by id, which is creation order
    reports: BTreeMap<Snowflake, AbuseReport>,
}

impl State {
    fn revision(&self, id: Snowflake) -> Option<&Revision> {
        let (post_id, slot) = self.revision_slots.get(&id)?;
        self.history.get(post_id)?.get(*slot)
    }

    fn is_retracted(&self, revision_id: Snowflake) -> bool {
        self.retractions.contains_key(&revision_id)
    }

    /// Visible revisions of a post, oldest first
    fn visible(&self, post_id: Snowflake) -> impl DoubleEndedIterator<Item = &Revision> + '_ {
        self.history
            .get(&post_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .filter(move |revision| !self.is_retracted(revision.id))
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_category(&self, category: Category) {
        self.state.write().categories.insert(category.id, category);
    }

    pub fn insert_forum(&self, forum: Forum) {
        self.state.write().forums.insert(forum.id, forum);
    }

    pub fn insert_topic(&self, topic: Topic) {
        self.state.write().topics.insert(topic.id, topic);
    }

    pub fn add_moderator(&self, forum_id: Snowflake, user_id: Snowflake) {
        self.state.write().moderators.insert((forum_id, user_id));
    }

    pub fn add_group_member(&self, group_id: Snowflake, user_id: Snowflake) {
        self.state.write().group_members.insert((group_id, user_id));
    }

    /// Every stored revision of a post, retracted ones included
    pub fn stored_revisions(&self, post_id: Snowflake) -> usize {
        self.state.read().history.get(&post_id).map_or(0, Vec::len)
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("MemoryStore")
            .field("posts", &state.posts.len())
            .field("revisions", &state.revision_slots.len())
            .field("topics", &state.topics.len())
            .finish()
    }
}
