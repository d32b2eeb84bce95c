use super::support::*;

#[tokio::test]
#[ignore = "requires a local redis-server"]
async fn redis_friendship_and_likes_round_trip() {
    let ns = TestNamespace::unique();
    let store = ns.store().await;
    let ada = register(store.clone(), "Ada").await;
    let bob = register(store.clone(), "Bob").await;

    let graph = RelationshipManager::new(store.clone());
    let friends = graph.toggle_friend(&ada, &bob).await.expect("toggle friend");
    assert_eq!(friends[0].id, bob);
    assert_eq!(graph.list_friends(&bob).await.unwrap()[0].id, ada);

    let engagement = EngagementManager::new(store.clone(), &EngagementConfig::default());
    let post_id = publish(&engagement, &ada, "stored in redis").await;
    let liked = engagement.toggle_like(&post_id, &bob).await.expect("like");
    assert_eq!(liked.like_count, 1);
    assert_eq!(liked.post.version, 1);
    let unliked = engagement.toggle_like(&post_id, &bob).await.expect("unlike");
    assert_eq!(unliked.like_count, 0);

    store.clear().await.expect("cleanup");
}

#[tokio::test]
#[ignore = "requires a local redis-server"]
async fn redis_rejects_stale_like_versions() {
    let ns = TestNamespace::unique();
    let store = ns.store().await;
    let ada = register(store.clone(), "Ada").await;
    let engagement = EngagementManager::new(store.clone(), &EngagementConfig::default());
    let post_id = publish(&engagement, &ada, "versioned").await;

    store.set_like(&post_id, &ada, true, 0).await.expect("first write");
    let err = store.set_like(&post_id, &ada, false, 0).await.unwrap_err();
    assert!(matches!(err, StoreError::VersionConflict { expected: 0, actual: 1 }));

    let err = store.set_like("missing", &ada, true, 0).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound { ref id } if id == "missing"));

    store.clear().await.expect("cleanup");
}

#[tokio::test]
#[ignore = "requires a local redis-server"]
async fn redis_duplicate_email_is_rejected_case_insensitively() {
    let ns = TestNamespace::unique();
    let store = ns.store().await;
    register(store.clone(), "Ada").await;

    let err = AccountDirectory::new(store.clone())
        .register(NewUser {
            first_name: "Other".into(),
            last_name: "Ada".into(),
            email: "ADA@example.com".into(),
            password_hash: "hash".into(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, SocialError::EmailTaken { .. }));

    store.clear().await.expect("cleanup");
}

#[tokio::test]
#[ignore = "requires a local redis-server"]
async fn redis_feed_order_and_delete() {
    let ns = TestNamespace::unique();
    let store = ns.store().await;
    let now = Utc::now();
    store.insert_post(&post_at("p1", "ada", now)).await.unwrap();
    store.insert_post(&post_at("p2", "bob", now + Duration::seconds(5))).await.unwrap();
    store.insert_post(&post_at("p3", "ada", now)).await.unwrap();

    let feed = FeedAssembler::new(store.clone());
    let ids: Vec<String> = feed.list_feed().await.unwrap().into_iter().map(|post| post.id).collect();
    assert_eq!(ids, vec!["p2", "p1", "p3"]);

    assert!(store.delete_post("p1").await.unwrap());
    assert!(!store.delete_post("p1").await.unwrap());
    let ids: Vec<String> = feed.list_user_feed("ada").await.unwrap().into_iter().map(|post| post.id).collect();
    assert_eq!(ids, vec!["p3"]);

    store.clear().await.expect("cleanup");
}

#[tokio::test]
#[ignore = "requires a local redis-server"]
async fn redis_reads_legacy_documents() {
    let ns = TestNamespace::unique();
    let store = ns.store().await;
    let mut conn = redis_conn().await;
    let key = store.keys().post("legacy");
    let legacy = serde_json::json!({
        "id": "legacy",
        "author_id": "ada",
        "author": { "first_name": "Ada", "last_name": "Tester" },
        "likes": { "bob": true },
        "comments": {},
        "created_at": "2023-05-01T12:00:00Z",
    });
    redis::cmd("SET")
        .arg(&key)
        .arg(legacy.to_string())
        .query_async::<()>(&mut conn)
        .await
        .expect("seed legacy document");

    let post = store.find_post("legacy").await.unwrap().expect("post present");
    assert!(post.is_liked_by("bob"));
    assert!(post.comments.is_empty());

    let updated = store.set_like("legacy", "cy", true, 0).await.expect("like legacy post");
    assert_eq!(updated.like_count(), 2);

    store.clear().await.expect("cleanup");
}
