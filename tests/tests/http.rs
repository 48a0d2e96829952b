use std::rc::Rc;

use mtu_client::{
    api::{ContentKind, Error as ApiError, PhotoId, Uuid},
    AlertLog, Api, ClientConfig, CommentSection, Error, HttpApi, VoteTracker,
};
use tests::{new_item, Fixture};

fn http_client(fx: &Fixture, user: Option<usize>) -> HttpApi {
    let addr = mtu_mock_server::serve(fx.server.clone()).unwrap();
    let token = user.map(|i| fx.users[i].1);
    HttpApi::new(ClientConfig::new(format!("http://{addr}/"), token))
}

#[tokio::test]
async fn comments_over_http() {
    let fx = Fixture::new();
    let api = http_client(&fx, Some(0));
    let target = new_item(ContentKind::Outfit);
    let alerts = AlertLog::new();
    let mut section = CommentSection::new(target, Some(fx.user(0)), Rc::new(alerts.clone()));

    section.load(&api).await;
    assert_eq!(section.count(), 0);

    let c = section
        .submit(&api, "Karamojong beadwork, wow")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(c.target, target);
    assert_eq!(c.author_id, fx.user(0));

    let edited = section
        .edit(&api, c.id, "Karamojong beadwork, wow!")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(edited.content, "Karamojong beadwork, wow!");

    section.load(&api).await;
    assert_eq!(section.comments(), &[edited]);

    assert!(section.delete(&api, c.id).await.unwrap());
    section.load(&api).await;
    assert_eq!(section.count(), 0);
    assert!(alerts.is_empty());
}

#[tokio::test]
async fn api_errors_cross_the_wire() {
    let fx = Fixture::new();
    let anonymous = http_client(&fx, None);
    let target = new_item(ContentKind::Update);
    let c = fx
        .client(1)
        .post_comment(&mtu_client::api::NewComment {
            content: String::from("Pearl of Africa"),
            target,
        })
        .await
        .unwrap();

    let err = anonymous.delete_comment(c.id).await.unwrap_err();
    assert!(matches!(err, Error::Api(ApiError::Unauthorized)));

    let other = http_client(&fx, Some(2));
    let err = other.delete_comment(c.id).await.unwrap_err();
    assert!(matches!(err, Error::Api(ApiError::PermissionDenied)));
    assert_eq!(err.user_message(), ApiError::PermissionDenied.message());

    fx.server
        .lock()
        .await
        .fail_next(ApiError::Unknown(String::from("Comments are closed")));
    let err = other.fetch_comments(&target).await.unwrap_err();
    assert_eq!(err.user_message(), "Comments are closed");
}

#[tokio::test]
async fn votes_over_http() {
    let fx = Fixture::new();
    let api = http_client(&fx, Some(1));
    let photo = PhotoId(Uuid::new_v4());
    let mut votes = VoteTracker::new(Some(fx.user(1)), Rc::new(AlertLog::new()));
    assert_eq!(votes.toggle_vote(&api, photo).await.unwrap(), Some(true));
    assert_eq!(votes.toggle_vote(&api, photo).await.unwrap(), Some(false));
    assert!(fx.server.lock().await.votes_for(photo).is_empty());
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let fx = Fixture::new();
    // Nothing listens on port 9 of the loopback
    let api = HttpApi::new(ClientConfig::new("http://127.0.0.1:9", Some(fx.users[0].1)));
    let alerts = AlertLog::new();
    let mut votes = VoteTracker::new(Some(fx.user(0)), Rc::new(alerts.clone()));
    let photo = PhotoId(Uuid::new_v4());
    assert!(matches!(
        votes.toggle_vote(&api, photo).await,
        Err(Error::Transport(_))
    ));
    assert_eq!(
        alerts.take(),
        vec![String::from(mtu_client::api::GENERIC_ERROR_MESSAGE)]
    );
    assert!(!votes.has_voted(photo));
}
