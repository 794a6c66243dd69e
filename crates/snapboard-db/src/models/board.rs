//! Category, forum, topic and watch database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct CategoryModel {
    pub id: i64,
    pub label: String,
    pub slug: String,
    pub position: i32,
}

#[derive(Debug, Clone, FromRow)]
pub struct ForumModel {
    pub id: i64,
    pub category_id: i64,
    pub name: String,
    pub slug: String,
    pub position: i32,
    pub post_access: i16,
    pub post_group: Option<i64>,
    pub topic_access: i16,
    pub topic_group: Option<i64>,
}

#[derive(Debug, Clone, FromRow)]
pub struct TopicModel {
    pub id: i64,
    pub forum_id: i64,
    pub subject: String,
    pub slug: String,
    pub closed: bool,
    pub private: bool,
    pub sticky: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct WatchModel {
    pub user_id: i64,
    pub topic_id: i64,
    pub created_at: DateTime<Utc>,
}
