//! Moderation scenarios: hidden posts, retraction, reports, and bans
//!
//! Run with: cargo test -p snapboard-integration-tests --test moderation_tests

use snapboard_integration_tests::{
    assert_status, author, edit_default, moderator, other_user, staff, TestBoard, AUTHOR_ID,
};
use snapboard_service::dto::{AbuseReportRequest, BanRequest, RetractRevisionRequest};

#[tokio::test]
async fn test_censored_post_keeps_history() {
    let board = TestBoard::start();
    let post_id = board.post_as_author("[b]rude[/b]", "bbcode").await.unwrap();

    board
        .moderation()
        .censor_post(post_id, &moderator())
        .await
        .unwrap();

    let view = board.renders().display_post(post_id, None).await.unwrap();
    assert!(view.hidden);
    assert!(view.body.is_none());
    assert_eq!(view.post.flags, vec!["censored"]);

    let moderator_view = board
        .renders()
        .display_post(post_id, Some(&moderator()))
        .await
        .unwrap();
    assert_eq!(moderator_view.body.unwrap().html, "<strong>rude</strong>");

    assert_eq!(board.history(post_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_stranger_cannot_censor() {
    let board = TestBoard::start();
    let post_id = board.post_as_author("fine", "plain").await.unwrap();

    let result = board.moderation().censor_post(post_id, &other_user()).await;
    assert_status(result, 403).unwrap();
}

#[tokio::test]
async fn test_retracted_revision_leaves_history() {
    let board = TestBoard::start();
    let post_id = board.post_as_author("original", "plain").await.unwrap();
    let bad = board
        .revisions()
        .append_revision(post_id, edit_default("leaked password"), &author())
        .await
        .unwrap();

    let current = board
        .moderation()
        .retract_revision(
            post_id,
            bad.id.parse().unwrap(),
            RetractRevisionRequest {
                reason: Some("credentials".to_string()),
            },
            &moderator(),
        )
        .await
        .unwrap();
    assert_eq!(current.text, "original");

    let history = board.history(post_id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(board.stored_revisions(post_id), 2);

    // Numbering continues past the retracted slot
    let next = board
        .revisions()
        .append_revision(post_id, edit_default("fixed"), &author())
        .await
        .unwrap();
    assert_eq!(next.seq, 3);
}

#[tokio::test]
async fn test_report_flow() {
    let board = TestBoard::start();
    let post_id = board.post_as_author("spam spam", "plain").await.unwrap();

    board
        .moderation()
        .report_abuse(post_id, AbuseReportRequest::default(), &other_user())
        .await
        .unwrap();
    let duplicate = board
        .moderation()
        .report_abuse(post_id, AbuseReportRequest::default(), &other_user())
        .await;
    assert_status(duplicate, 409).unwrap();

    let open = board
        .moderation()
        .list_open_reports(&staff(), 50)
        .await
        .unwrap();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].post_id, post_id.to_string());

    let dismissed = board
        .moderation()
        .dismiss_reports(post_id, false, &staff())
        .await
        .unwrap();
    assert_eq!(dismissed, 1);
    assert!(board
        .moderation()
        .list_open_reports(&staff(), 50)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_banned_author_cannot_edit() {
    let board = TestBoard::start();
    let post_id = board.post_as_author("before", "plain").await.unwrap();

    board
        .moderation()
        .ban_user(
            AUTHOR_ID,
            BanRequest {
                reason: "flooding".to_string(),
            },
            &staff(),
        )
        .await
        .unwrap();

    let result = board
        .revisions()
        .append_revision(post_id, edit_default("after"), &author())
        .await;
    let err = assert_status(result, 403).unwrap();
    assert!(err.to_string().contains("flooding"));
    assert_eq!(board.stored_revisions(post_id), 1);

    board
        .moderation()
        .unban_user(AUTHOR_ID, &staff())
        .await
        .unwrap();
    board
        .revisions()
        .append_revision(post_id, edit_default("after"), &author())
        .await
        .unwrap();
}
