//! Forum access, topic creation, and topic watch scenarios
//!
//! Run with: cargo test -p snapboard-integration-tests --test forum_tests

use snapboard_core::Snowflake;
use snapboard_integration_tests::{
    assert_status, author, edit_default, new_post, new_topic, other_user, staff, TestBoard,
    AUTHOR_ID, FORUM_ID, OTHER_USER_ID, STAFF_FORUM_ID,
};

// ============================================================================
// Topics
// ============================================================================

#[tokio::test]
async fn test_new_topic_opens_with_first_post() {
    let board = TestBoard::start();

    let topic = board
        .revisions()
        .create_topic(FORUM_ID, new_topic("Introductions", "Hello *all*"), &author())
        .await
        .unwrap();
    let topic_id: Snowflake = topic.id.parse().unwrap();
    let post_id: Snowflake = topic.first_post.id.parse().unwrap();

    let reply = board
        .revisions()
        .create_post(topic_id, new_post("welcome", "plain"), &other_user())
        .await
        .unwrap();
    assert_eq!(reply.topic_id, topic.id);

    let history = board.history(post_id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].text, "Hello *all*");
}

#[tokio::test]
async fn test_group_forum_admits_members_only() {
    let board = TestBoard::start();

    let result = board
        .revisions()
        .create_topic(STAFF_FORUM_ID, new_topic("Roadmap", "draft"), &author())
        .await;
    let err = assert_status(result, 403).unwrap();
    assert_eq!(err.error_code(), "FORUM_RESTRICTED");

    let topic = board
        .revisions()
        .create_topic(STAFF_FORUM_ID, new_topic("Roadmap", "draft"), &other_user())
        .await
        .unwrap();
    let topic_id: Snowflake = topic.id.parse().unwrap();

    // Site staff outside the group are refused too; only superusers bypass
    let result = board
        .revisions()
        .create_post(topic_id, new_post("me too", "plain"), &staff())
        .await;
    assert_status(result, 403).unwrap();

    let result = board
        .revisions()
        .create_post(topic_id, new_post("me too", "plain"), &author())
        .await;
    assert_status(result, 403).unwrap();
}

// ============================================================================
// Watches
// ============================================================================

#[tokio::test]
async fn test_posting_watches_the_topic() {
    let board = TestBoard::start();
    let topic = board
        .revisions()
        .create_topic(FORUM_ID, new_topic("Bugs", "found one"), &author())
        .await
        .unwrap();
    let topic_id: Snowflake = topic.id.parse().unwrap();

    board
        .revisions()
        .create_post(topic_id, new_post("same here", "plain"), &other_user())
        .await
        .unwrap();

    let recipients = board.watches().recipients(topic_id, OTHER_USER_ID).await.unwrap();
    assert_eq!(recipients, vec![AUTHOR_ID]);

    assert!(board.watches().unwatch_topic(topic_id, &author()).await.unwrap());
    assert!(board
        .watches()
        .recipients(topic_id, OTHER_USER_ID)
        .await
        .unwrap()
        .is_empty());
}

// ============================================================================
// Deleted posts
// ============================================================================

#[tokio::test]
async fn test_deleted_post_stays_deleted() {
    let board = TestBoard::start();
    let post_id = board.post_as_author("oops", "plain").await.unwrap();

    board
        .moderation()
        .delete_post(post_id, &author())
        .await
        .unwrap();

    let result = board
        .revisions()
        .append_revision(post_id, edit_default("back again"), &author())
        .await;
    let err = assert_status(result, 403).unwrap();
    assert_eq!(err.error_code(), "POST_DELETED");
    assert_eq!(board.stored_revisions(post_id), 1);
}
