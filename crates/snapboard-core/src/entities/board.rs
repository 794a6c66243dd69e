//! Board structure: Category > Forum > Topic
//!
//! Categories and forums are managed elsewhere; the revision core reads them
//! to resolve moderators and who may post, and creates topics.

use chrono::{DateTime, Utc};

use crate::value_objects::{AccessLevel, Snowflake};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: Snowflake,
    pub label: String,
    pub slug: String,
    pub position: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Forum {
    pub id: Snowflake,
    pub category_id: Snowflake,
    pub name: String,
    pub slug: String,
    pub position: i32,
    /// Who may reply in existing topics
    pub post_access: AccessLevel,
    /// User group consulted when `post_access` is `Custom`
    pub post_group: Option<Snowflake>,
    /// Who may start new topics
    pub topic_access: AccessLevel,
    pub topic_group: Option<Snowflake>,
}

impl Forum {
    pub fn new(id: Snowflake, category_id: Snowflake, name: String) -> Self {
        let slug = slugify(&name);
        Self {
            id,
            category_id,
            name,
            slug,
            position: 0,
            post_access: AccessLevel::default(),
            post_group: None,
            topic_access: AccessLevel::default(),
            topic_group: None,
        }
    }
}

/// A user following a topic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Watch {
    pub user_id: Snowflake,
    pub topic_id: Snowflake,
    pub created_at: DateTime<Utc>,
}

impl Watch {
    pub fn new(user_id: Snowflake, topic_id: Snowflake) -> Self {
        Self {
            user_id,
            topic_id,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    pub id: Snowflake,
    pub forum_id: Snowflake,
    pub subject: String,
    pub slug: String,
    pub closed: bool,
    pub private: bool,
    pub sticky: bool,
    pub created_at: DateTime<Utc>,
}

impl Topic {
    pub fn new(id: Snowflake, forum_id: Snowflake, subject: String) -> Self {
        let slug = slugify(&subject);
        Self {
            id,
            forum_id,
            subject,
            slug,
            closed: false,
            private: false,
            sticky: false,
            created_at: Utc::now(),
        }
    }
}

/// Lowercase ASCII slug, runs of other characters collapse to one dash
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}
