//! Category, Forum, Topic and Watch entity <-> model mapper

use snapboard_core::entities::{Category, Forum, Topic, Watch};
use snapboard_core::value_objects::{AccessLevel, Snowflake};

use crate::models::{CategoryModel, ForumModel, TopicModel, WatchModel};

impl From<CategoryModel> for Category {
    fn from(model: CategoryModel) -> Self {
        Category {
            id: Snowflake::new(model.id),
            label: model.label,
            slug: model.slug,
            position: model.position,
        }
    }
}

impl From<ForumModel> for Forum {
    fn from(model: ForumModel) -> Self {
        Forum {
            id: Snowflake::new(model.id),
            category_id: Snowflake::new(model.category_id),
            name: model.name,
            slug: model.slug,
            position: model.position,
            post_access: AccessLevel::from_i16(model.post_access),
            post_group: model.post_group.map(Snowflake::new),
            topic_access: AccessLevel::from_i16(model.topic_access),
            topic_group: model.topic_group.map(Snowflake::new),
        }
    }
}

impl From<TopicModel> for Topic {
    fn from(model: TopicModel) -> Self {
        Topic {
            id: Snowflake::new(model.id),
            forum_id: Snowflake::new(model.forum_id),
            subject: model.subject,
            slug: model.slug,
            closed: model.closed,
            private: model.private,
            sticky: model.sticky,
            created_at: model.created_at,
        }
    }
}

impl From<WatchModel> for Watch {
    fn from(model: WatchModel) -> Self {
        Watch {
            user_id: Snowflake::new(model.user_id),
            topic_id: Snowflake::new(model.topic_id),
            created_at: model.created_at,
        }
    }
}
