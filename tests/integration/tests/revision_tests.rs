//! Revision history and rendering scenarios
//!
//! These run against the in-memory store and need no external services.
//!
//! Run with: cargo test -p snapboard-integration-tests --test revision_tests

use snapboard_core::MarkupDialect;
use snapboard_integration_tests::{
    assert_status, author, edit, edit_default, init_test_tracing, moderator, new_post,
    other_user, preview, TestBoard, CLOSED_TOPIC_ID,
};
use snapboard_service::ServiceSettings;

// ============================================================================
// Edit history
// ============================================================================

#[tokio::test]
async fn test_edit_keeps_old_revision() {
    init_test_tracing();
    let board = TestBoard::start();

    let post_id = board.post_as_author("Hello", "markdown").await.unwrap();
    let history = board.history(post_id).await.unwrap();
    assert_eq!(history.len(), 1);
    let current = board.revisions().get_current(post_id).await.unwrap();
    assert_eq!(current.text, "Hello");

    board
        .revisions()
        .append_revision(post_id, edit("Hello **world**", "markdown"), &author())
        .await
        .unwrap();

    let history = board.history(post_id).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].text, "Hello");
    assert_eq!(history[1].text, "Hello **world**");

    let rendered = board.renders().render_current(post_id).await.unwrap();
    assert!(rendered.html.contains("Hello <strong>world</strong>"));
    assert!(!rendered.degraded);
}

#[tokio::test]
async fn test_history_grows_by_one_per_edit() {
    let board = TestBoard::start();
    let post_id = board.post_as_author("v1", "plain").await.unwrap();

    let mut before = board.history(post_id).await.unwrap();
    for n in 2..=6 {
        board
            .revisions()
            .append_revision(post_id, edit_default(&format!("v{n}")), &author())
            .await
            .unwrap();

        let after = board.history(post_id).await.unwrap();
        assert_eq!(after.len(), before.len() + 1);
        for (old, kept) in before.iter().zip(&after) {
            assert_eq!(old.id, kept.id);
            assert_eq!(old.text, kept.text);
            assert_eq!(old.created_at, kept.created_at);
        }
        before = after;
    }

    let seqs: Vec<i32> = before.iter().map(|r| r.seq).collect();
    assert_eq!(seqs, vec![1, 2, 3, 4, 5, 6]);
}

#[tokio::test]
async fn test_current_is_latest_in_history() {
    let board = TestBoard::start();
    let post_id = board.post_as_author("first", "markdown").await.unwrap();
    for text in ["second", "third"] {
        board
            .revisions()
            .append_revision(post_id, edit(text, "markdown"), &author())
            .await
            .unwrap();
    }

    let current = board.revisions().get_current(post_id).await.unwrap();
    let history = board.history(post_id).await.unwrap();
    let latest = history.iter().map(|r| r.created_at).max().unwrap();

    assert_eq!(current.created_at, latest);
    assert_eq!(current.id, history.last().unwrap().id);
    assert_eq!(current.text, "third");
}

#[tokio::test]
async fn test_edit_may_change_dialect() {
    let board = TestBoard::start();
    let post_id = board.post_as_author("*hi*", "markdown").await.unwrap();

    board
        .revisions()
        .append_revision(post_id, edit("[i]hi[/i]", "bbcode"), &author())
        .await
        .unwrap();

    let current = board.revisions().get_current(post_id).await.unwrap();
    assert_eq!(current.dialect, MarkupDialect::BbCode);

    let first = board.renders().render_revision(post_id, 1).await.unwrap();
    let second = board.renders().render_current(post_id).await.unwrap();
    assert_eq!(first.dialect, MarkupDialect::Markdown);
    assert_eq!(first.html, "<p><em>hi</em></p>\n");
    assert_eq!(second.html, "<em>hi</em>");
}

#[tokio::test]
async fn test_concurrent_edits_all_land() {
    let board = std::sync::Arc::new(TestBoard::start());
    let post_id = board.post_as_author("base", "plain").await.unwrap();

    let mut handles = Vec::new();
    for n in 0..8 {
        let board = board.clone();
        handles.push(tokio::spawn(async move {
            board
                .revisions()
                .append_revision(post_id, edit_default(&format!("edit {n}")), &author())
                .await
                .map(|r| r.seq)
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let history = board.history(post_id).await.unwrap();
    assert_eq!(history.len(), 9);
    let current = board.revisions().get_current(post_id).await.unwrap();
    assert_eq!(current.seq, 9);
    assert_eq!(current.id, history[8].id);
}

// ============================================================================
// Permissions
// ============================================================================

#[tokio::test]
async fn test_stranger_cannot_edit() {
    let board = TestBoard::start();
    let post_id = board.post_as_author("Hello", "markdown").await.unwrap();

    let result = board
        .revisions()
        .append_revision(post_id, edit("Hijacked", "markdown"), &other_user())
        .await;
    assert_status(result, 403).unwrap();

    assert_eq!(board.stored_revisions(post_id), 1);
    let current = board.revisions().get_current(post_id).await.unwrap();
    assert_eq!(current.text, "Hello");
}

#[tokio::test]
async fn test_moderator_can_edit() {
    let board = TestBoard::start();
    let post_id = board.post_as_author("Hello", "markdown").await.unwrap();

    let revision = board
        .revisions()
        .append_revision(post_id, edit("Cleaned up", "markdown"), &moderator())
        .await
        .unwrap();
    assert_eq!(revision.seq, 2);
    assert_eq!(revision.author_id, moderator().user_id.to_string());
}

#[tokio::test]
async fn test_closed_topic_refuses_new_posts() {
    let board = TestBoard::start();

    let result = board
        .revisions()
        .create_post(CLOSED_TOPIC_ID, new_post("late", "plain"), &author())
        .await;
    assert_status(result, 403).unwrap();

    board
        .revisions()
        .create_post(CLOSED_TOPIC_ID, new_post("notice", "plain"), &moderator())
        .await
        .unwrap();
}

// ============================================================================
// Validation
// ============================================================================

#[tokio::test]
async fn test_blank_edit_rejected() {
    let board = TestBoard::start();
    let post_id = board.post_as_author("Hello", "markdown").await.unwrap();

    let result = board
        .revisions()
        .append_revision(post_id, edit("   \n", "markdown"), &author())
        .await;
    let err = assert_status(result, 400).unwrap();
    assert_eq!(err.error_code(), "EMPTY_TEXT");
    assert_eq!(board.stored_revisions(post_id), 1);
}

#[tokio::test]
async fn test_unknown_dialect_rejected() {
    let board = TestBoard::start();
    let post_id = board.post_as_author("Hello", "markdown").await.unwrap();

    let result = board
        .revisions()
        .append_revision(post_id, edit("Hello", "wikitext"), &author())
        .await;
    let err = assert_status(result, 400).unwrap();
    assert_eq!(err.error_code(), "UNSUPPORTED_DIALECT");
}

#[tokio::test]
async fn test_text_length_limit() {
    let board = TestBoard::start_with_settings(ServiceSettings {
        max_text_length: 10,
        ..ServiceSettings::default()
    });
    let post_id = board.post_as_author("short", "plain").await.unwrap();

    let result = board
        .revisions()
        .append_revision(post_id, edit_default("far too long for this board"), &author())
        .await;
    assert_status(result, 400).unwrap();
}

#[tokio::test]
async fn test_missing_post_is_not_found() {
    let board = TestBoard::start();
    let missing = board.ctx.generate_id();

    assert_status(board.revisions().get_current(missing).await, 404).unwrap();
    assert_status(
        board
            .revisions()
            .append_revision(missing, edit_default("x"), &author())
            .await,
        404,
    )
    .unwrap();
    assert!(board.history(missing).await.is_err());
}

// ============================================================================
// Rendering
// ============================================================================

#[test]
fn test_bbcode_rendering() {
    let board = TestBoard::start();
    let renders = board.renders();

    let bold = renders.render("[b]hi[/b]", MarkupDialect::BbCode).unwrap();
    assert_eq!(bold.html, "<strong>hi</strong>");
    assert!(!bold.degraded);

    let unclosed = renders.render("[b]hi", MarkupDialect::BbCode).unwrap();
    assert!(unclosed.html.contains("hi"));
    assert!(!unclosed.html.contains("<strong>"));
    assert!(unclosed.degraded);
}

#[test]
fn test_render_is_deterministic() {
    let board = TestBoard::start();
    let renders = board.renders();
    let text = "[b]bold[/b] **strong** *em* \"link\":http://example.com <u>x</u>";

    for dialect in MarkupDialect::ALL {
        let first = renders.render(text, dialect.clone()).unwrap();
        let second = renders.render(text, dialect).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn test_hostile_text_never_errors() {
    let board = TestBoard::start();
    let renders = board.renders();
    let inputs = [
        "",
        "[",
        "[/b]",
        "[[[[b]]]]",
        "[url=]x[/url]",
        "[list][*][*][/list",
        "**unterminated",
        "<script>alert(1)</script>",
        "\"\":",
        "\u{0}\u{202e}\u{fffd}",
    ];

    for dialect in MarkupDialect::ALL {
        for input in inputs {
            let out = renders.render(input, dialect.clone()).unwrap();
            assert!(!out.html.contains("<script"), "{dialect}: {}", out.html);
        }
    }
}

#[test]
fn test_preview_matches_stored_render() {
    let board = TestBoard::start();
    let renders = board.renders();

    let previewed = renders.preview(preview("h1. Title", "textile")).unwrap();
    let direct = renders.render("h1. Title", MarkupDialect::Textile).unwrap();
    assert_eq!(previewed, direct);
}
