use mtu_client::{
    api::{ContentKind, PhotoId},
    ContentFeed, FeedItem, VoteTracker,
};
use tests::{new_item, Fixture};

#[tokio::test]
async fn browsing_the_gallery() {
    let fx = Fixture::new();
    let sipi = new_item(ContentKind::Photo);
    let kidepo = new_item(ContentKind::Photo);
    let mut feed = ContentFeed::new(vec![
        FeedItem::new(sipi, "Sipi Falls at dawn"),
        FeedItem::new(kidepo, "Kidepo Valley"),
    ]);
    let api = fx.client(0);

    let mut section = feed.open(sipi, Some(fx.user(0)), fx.notifier()).unwrap();
    section.load(&api).await;
    section.submit(&api, "Breathtaking").await.unwrap();
    section.submit(&api, "Booking my trip").await.unwrap();
    assert_eq!(feed.item(&sipi).unwrap().comment_count, 2);

    // Moving to the next photo starts from that photo's comments only
    let mut section = feed.open(kidepo, Some(fx.user(0)), fx.notifier()).unwrap();
    section.load(&api).await;
    assert_eq!(section.count(), 0);
    assert_eq!(feed.item(&kidepo).unwrap().comment_count, 0);
    assert_eq!(feed.item(&sipi).unwrap().comment_count, 2);

    let mut votes =
        VoteTracker::new(Some(fx.user(0)), fx.notifier()).on_count_change(feed.vote_counter());
    let photo = PhotoId(kidepo.id.0);
    votes.toggle_vote(&api, photo).await.unwrap();
    assert_eq!(feed.item(&kidepo).unwrap().vote_count, 1);
    assert_eq!(feed.item(&sipi).unwrap().vote_count, 0);

    feed.close();
    assert_eq!(feed.selected(), None);
    assert!(fx.alerts.is_empty());
}
