use std::{cell::Cell, rc::Rc};

use mtu_client::{
    api::{Comment, ContentKind, ContentRef, EditComment, Error as ApiError, NewComment},
    Api, CommentSection, Error,
};
use mtu_mock_server::MockClient;
use tests::{new_item, Fixture};

#[tokio::test]
async fn submitted_comment_survives_reload() {
    let fx = Fixture::new();
    let target = new_item(ContentKind::Outfit);
    let api = fx.client(0);
    let count = Rc::new(Cell::new(usize::MAX));
    let reported = count.clone();
    let mut section = CommentSection::new(target, Some(fx.user(0)), fx.notifier())
        .on_count_change(move |c| reported.set(c));

    for text in ["Ki kati?", "Beautiful gomesi"] {
        post_as(&fx.client(1), target, text).await;
    }
    section.load(&api).await;
    assert_eq!(count.get(), 2);

    let posted = section
        .submit(&api, "  The Rwenzori look is stunning \n")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(posted.content, "The Rwenzori look is stunning");
    assert_eq!(section.count(), 3);
    assert_eq!(count.get(), 3);
    assert_eq!(section.comments()[0].id, posted.id);
    assert!(!section.is_pending());

    // A fresh mount shows exactly what the server has
    let mut fresh = CommentSection::new(target, None, fx.notifier());
    fresh.load(&fx.anonymous()).await;
    assert_eq!(fresh.comments(), section.comments());
    assert_eq!(fresh.comments()[0].author_display_name, "Nakato");
    assert!(fx.alerts.is_empty());
}

#[tokio::test]
async fn blank_comment_is_never_sent() {
    let fx = Fixture::new();
    let mut section =
        CommentSection::new(new_item(ContentKind::Update), Some(fx.user(0)), fx.notifier());
    let before = fx.server.lock().await.test_num_requests();
    for blank in ["", "   ", "\n\t "] {
        assert!(section.submit(&fx.client(0), blank).await.unwrap().is_none());
    }
    assert_eq!(fx.server.lock().await.test_num_requests(), before);
    assert_eq!(section.count(), 0);
    assert!(fx.alerts.is_empty());
}

#[tokio::test]
async fn anonymous_viewer_cannot_comment() {
    let fx = Fixture::new();
    let mut section = CommentSection::new(new_item(ContentKind::Message), None, fx.notifier());
    assert!(!section.can_comment());
    assert!(section.submit(&fx.anonymous(), "Hello").await.unwrap().is_none());
    assert_eq!(fx.server.lock().await.test_num_requests(), 0);
}

#[tokio::test]
async fn failed_submit_keeps_the_list() {
    let fx = Fixture::new();
    let target = new_item(ContentKind::Photo);
    let api = fx.client(0);
    let mut section = CommentSection::new(target, Some(fx.user(0)), fx.notifier());
    section.submit(&api, "First!").await.unwrap();

    fx.server.lock().await.fail_next(ApiError::PermissionDenied);
    let err = section.submit(&api, "Second").await.unwrap_err();
    assert!(matches!(err, Error::Api(ApiError::PermissionDenied)));
    assert_eq!(section.count(), 1);
    assert!(!section.is_pending());
    assert_eq!(fx.alerts.take(), vec![ApiError::PermissionDenied.message()]);

    // Network failures get the generic message
    fx.server.lock().await.set_offline(true);
    let err = section.submit(&api, "Third").await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
    assert_eq!(
        fx.alerts.take(),
        vec![String::from(mtu_client::api::GENERIC_ERROR_MESSAGE)]
    );
    assert_eq!(
        section.last_error(),
        Some(mtu_client::api::GENERIC_ERROR_MESSAGE)
    );

    // Loading while offline leaves what is displayed alone, silently
    section.load(&api).await;
    assert_eq!(section.count(), 1);
    assert!(fx.alerts.is_empty());

    fx.server.lock().await.set_offline(false);
    section.submit(&api, "Third").await.unwrap().unwrap();
    assert_eq!(section.count(), 2);
    assert_eq!(section.last_error(), None);
}

#[tokio::test]
async fn only_the_author_edits_and_deletes() {
    let fx = Fixture::new();
    let target = new_item(ContentKind::Outfit);
    let mut mine = CommentSection::new(target, Some(fx.user(0)), fx.notifier());
    let mut theirs = CommentSection::new(target, Some(fx.user(1)), fx.notifier());

    let c = mine
        .submit(&fx.client(0), "Lovely barkcloth")
        .await
        .unwrap()
        .unwrap();
    theirs.load(&fx.client(1)).await;
    assert!(mine.can_modify(&mine.comments()[0]));
    assert!(!theirs.can_modify(&theirs.comments()[0]));

    // The controls are hidden, so nothing is sent
    assert!(theirs.edit(&fx.client(1), c.id, "Mine now").await.unwrap().is_none());
    assert!(!theirs.delete(&fx.client(1), c.id).await.unwrap());
    assert_eq!(theirs.comments()[0].content, "Lovely barkcloth");

    // Even a forged request is refused by the server
    let forged = EditComment {
        content: String::from("Mine now"),
    };
    let err = fx.client(1).edit_comment(c.id, &forged).await.unwrap_err();
    assert!(matches!(err, Error::Api(ApiError::PermissionDenied)));
    let err = fx.client(1).delete_comment(c.id).await.unwrap_err();
    assert!(matches!(err, Error::Api(ApiError::PermissionDenied)));

    let edited = mine
        .edit(&fx.client(0), c.id, " Lovely barkcloth dress ")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(edited.content, "Lovely barkcloth dress");
    assert_eq!(mine.comments()[0].content, "Lovely barkcloth dress");
    assert!(mine.comments()[0].updated_at > mine.comments()[0].created_at);

    assert!(mine.delete(&fx.client(0), c.id).await.unwrap());
    assert_eq!(mine.count(), 0);
    theirs.load(&fx.client(1)).await;
    assert_eq!(theirs.count(), 0);
    assert!(fx.alerts.is_empty());
}

#[tokio::test]
async fn comments_stay_with_their_item() {
    let fx = Fixture::new();
    let gallery = new_item(ContentKind::Photo);
    let fan_wall = new_item(ContentKind::Message);
    let mut a = CommentSection::new(gallery, Some(fx.user(0)), fx.notifier());
    let mut b = CommentSection::new(fan_wall, Some(fx.user(2)), fx.notifier());
    a.submit(&fx.client(0), "Murchison Falls!").await.unwrap();
    b.submit(&fx.client(2), "Go Uganda").await.unwrap();
    b.submit(&fx.client(2), "Webale").await.unwrap();
    a.load(&fx.client(0)).await;
    b.load(&fx.client(2)).await;
    assert_eq!(a.count(), 1);
    assert_eq!(b.count(), 2);
    assert!(b.comments().iter().all(|c| c.target == fan_wall));
}

async fn post_as(api: &MockClient, target: ContentRef, text: &str) -> Comment {
    api.post_comment(&NewComment {
        content: String::from(text),
        target,
    })
    .await
    .unwrap()
}
