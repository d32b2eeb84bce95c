use super::support::*;

fn ids(posts: &[Post]) -> Vec<&str> {
    posts.iter().map(|post| post.id.as_str()).collect()
}

#[tokio::test]
async fn feed_is_newest_first() {
    let store = MemoryStore::new();
    let t1 = Utc::now() - Duration::minutes(10);
    let t2 = t1 + Duration::minutes(1);
    let t3 = t2 + Duration::minutes(1);
    for (id, at) in [("p1", t1), ("p3", t3), ("p2", t2)] {
        store.insert_post(&post_at(id, "author", at)).await.unwrap();
    }

    let feed = FeedAssembler::new(store).list_feed().await.unwrap();
    assert_eq!(ids(&feed), vec!["p3", "p2", "p1"]);
    assert!(feed.windows(2).all(|pair| pair[0].created_at >= pair[1].created_at));
}

#[tokio::test]
async fn equal_timestamps_keep_insertion_order() {
    let store = MemoryStore::new();
    let at = Utc::now();
    store.insert_post(&post_at("older-write", "a", at)).await.unwrap();
    store.insert_post(&post_at("newer-write", "b", at)).await.unwrap();

    let feed = FeedAssembler::new(store).list_feed().await.unwrap();
    assert_eq!(ids(&feed), vec!["older-write", "newer-write"]);
}

#[tokio::test]
async fn user_feed_only_contains_that_author() {
    let store = MemoryStore::new();
    let now = Utc::now();
    store.insert_post(&post_at("a1", "ada", now)).await.unwrap();
    store.insert_post(&post_at("b1", "bob", now + Duration::seconds(1))).await.unwrap();
    store.insert_post(&post_at("a2", "ada", now + Duration::seconds(2))).await.unwrap();

    let feed = FeedAssembler::new(store);
    let posts = feed.list_user_feed("ada").await.unwrap();
    assert_eq!(ids(&posts), vec!["a2", "a1"]);
    assert!(posts.iter().all(|post| post.author_id == "ada"));
}

#[tokio::test]
async fn empty_store_yields_empty_feed() {
    let feed = FeedAssembler::new(MemoryStore::new());
    assert!(feed.list_feed().await.unwrap().is_empty());
    assert!(feed.list_user_feed("anyone").await.unwrap().is_empty());
    assert!(matches!(
        feed.list_user_feed("").await,
        Err(SocialError::InvalidOperation { .. })
    ));
}

#[tokio::test]
async fn created_post_leads_returned_feed() {
    let store = MemoryStore::new();
    let ada = register(store.clone(), "Ada").await;
    store
        .insert_post(&post_at("old", "someone", Utc::now() - Duration::hours(1)))
        .await
        .unwrap();

    let engagement = EngagementManager::new(store, &EngagementConfig::default());
    let feed = engagement
        .create_post(
            &ada,
            NewPost {
                description: "fresh".into(),
                image_ref: Some("fresh.jpeg".into()),
            },
        )
        .await
        .unwrap();

    assert_eq!(feed.len(), 2);
    assert_eq!(feed[0].description, "fresh");
    assert_eq!(feed[0].author.display_name(), "Ada Tester");
    assert_eq!(feed[0].image_ref.as_deref(), Some("fresh.jpeg"));
    assert_eq!(feed[1].id, "old");
}
