use super::support::*;

async fn seeded() -> (MemoryStore, String, String) {
    let store = MemoryStore::new();
    let ada = register(store.clone(), "Ada").await;
    let bob = register(store.clone(), "Bob").await;
    (store, ada, bob)
}

fn retries(max_conflict_retries: u32) -> EngagementConfig {
    EngagementConfig { max_conflict_retries }
}

#[tokio::test]
async fn like_twice_restores_original_state() {
    let (store, ada, bob) = seeded().await;
    let engagement = EngagementManager::new(store.clone(), &EngagementConfig::default());
    let post_id = publish(&engagement, &ada, "sunset").await;

    let liked = engagement.toggle_like(&post_id, &bob).await.unwrap();
    assert!(liked.liked);
    assert!(liked.post.is_liked_by(&bob));
    assert_eq!(liked.like_count, 1);

    let unliked = engagement.toggle_like(&post_id, &bob).await.unwrap();
    assert!(!unliked.liked);
    assert_eq!(unliked.like_count, 0);
    assert!(!store.find_post(&post_id).await.unwrap().unwrap().is_liked_by(&bob));
}

#[tokio::test]
async fn like_count_matches_distinct_likers() {
    let (store, ada, bob) = seeded().await;
    let cy = register(store.clone(), "Cy").await;
    let engagement = EngagementManager::new(store, &EngagementConfig::default());
    let post_id = publish(&engagement, &ada, "sunset").await;

    engagement.toggle_like(&post_id, &bob).await.unwrap();
    engagement.toggle_like(&post_id, &cy).await.unwrap();
    let outcome = engagement.toggle_like(&post_id, &ada).await.unwrap();
    assert_eq!(outcome.like_count, 3);
    assert_eq!(outcome.post.likes.len(), 3);
}

#[tokio::test]
async fn post_stored_without_likes_field_can_be_liked() {
    let (store, ada, bob) = seeded().await;
    let post: Post = serde_json::from_value(serde_json::json!({
        "id": "legacy-post",
        "author_id": ada,
        "author": { "first_name": "Ada", "last_name": "Tester" },
        "description": "from before likes",
        "created_at": "2024-01-01T00:00:00Z",
    }))
    .unwrap();
    assert!(post.likes.is_empty());
    store.insert_post(&post).await.unwrap();

    let engagement = EngagementManager::new(store, &EngagementConfig::default());
    let outcome = engagement.toggle_like("legacy-post", &bob).await.unwrap();
    assert_eq!(outcome.like_count, 1);
}

#[tokio::test]
async fn map_shaped_likes_deserialize_to_the_true_entries() {
    let post: Post = serde_json::from_value(serde_json::json!({
        "id": "p",
        "author_id": "a",
        "author": { "first_name": "A", "last_name": "B" },
        "likes": { "u1": true, "u2": false, "u3": true },
        "comments": ["first!", { "author_id": "u1", "author_name": "U One", "text": "hi", "created_at": "2024-01-01T00:00:00Z" }],
        "created_at": "2024-01-01T00:00:00Z",
    }))
    .unwrap();

    assert_eq!(post.like_count(), 2);
    assert!(post.is_liked_by("u1") && !post.is_liked_by("u2"));
    assert!(post.comments[0].is_legacy());
    assert_eq!(post.comments[0].text(), "first!");
    assert_eq!(post.comments[1].author_id(), Some("u1"));
}

#[tokio::test]
async fn conflicts_within_budget_still_succeed() {
    let (memory, ada, bob) = seeded().await;
    let seed = EngagementManager::new(memory.clone(), &EngagementConfig::default());
    let post_id = publish(&seed, &ada, "busy post").await;

    let store = ConflictingStore::new(memory, 2);
    let engagement = EngagementManager::new(store.clone(), &retries(3));
    let outcome = engagement.toggle_like(&post_id, &bob).await.unwrap();

    assert!(outcome.liked);
    assert_eq!(outcome.like_count, 1);
    assert_eq!(store.attempts.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn persistent_conflicts_surface_as_unavailable() {
    let (memory, ada, bob) = seeded().await;
    let seed = EngagementManager::new(memory.clone(), &EngagementConfig::default());
    let post_id = publish(&seed, &ada, "hot post").await;

    let store = ConflictingStore::new(memory.clone(), u32::MAX);
    let engagement = EngagementManager::new(store.clone(), &retries(4));
    let err = engagement.toggle_like(&post_id, &bob).await.unwrap_err();

    assert!(matches!(err, SocialError::StoreUnavailable { .. }));
    assert_eq!(store.attempts.load(Ordering::SeqCst), 4);
    assert!(memory.find_post(&post_id).await.unwrap().unwrap().likes.is_empty());
}

#[tokio::test]
async fn like_on_missing_post_is_not_found() {
    let (store, _, bob) = seeded().await;
    let engagement = EngagementManager::new(store, &EngagementConfig::default());
    let err = engagement.toggle_like("nope", &bob).await.unwrap_err();
    assert!(matches!(err, SocialError::NotFound { subject: Subject::Post, .. }));
}

#[tokio::test]
async fn comments_append_in_order_with_author_snapshot() {
    let (store, ada, bob) = seeded().await;
    let engagement = EngagementManager::new(store, &EngagementConfig::default());
    let post_id = publish(&engagement, &ada, "thread").await;

    engagement.add_comment(&post_id, &bob, "first").await.unwrap();
    let post = engagement.add_comment(&post_id, &ada, "  second  ").await.unwrap();

    let texts: Vec<&str> = post.comments.iter().map(Comment::text).collect();
    assert_eq!(texts, vec!["first", "second"]);
    assert_eq!(post.comments[0].author_name(), "Bob Tester");
    assert_eq!(post.comments[0].author_picture_ref(), Some("bob.png"));
}

#[tokio::test]
async fn empty_comment_leaves_post_unchanged() {
    let (store, ada, bob) = seeded().await;
    let engagement = EngagementManager::new(store.clone(), &EngagementConfig::default());
    let post_id = publish(&engagement, &ada, "quiet").await;

    let err = engagement.add_comment(&post_id, &bob, "").await.unwrap_err();
    assert!(matches!(err, SocialError::InvalidOperation { .. }));
    assert!(store.find_post(&post_id).await.unwrap().unwrap().comments.is_empty());
}

#[tokio::test]
async fn profile_edits_do_not_rewrite_snapshots() {
    let (store, ada, bob) = seeded().await;
    let engagement = EngagementManager::new(store.clone(), &EngagementConfig::default());
    let post_id = publish(&engagement, &ada, "before rename").await;
    engagement.add_comment(&post_id, &bob, "nice").await.unwrap();

    AccountDirectory::new(store.clone())
        .update_profile(
            &bob,
            ProfilePatch {
                first_name: Some("Robert".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let post = store.find_post(&post_id).await.unwrap().unwrap();
    assert_eq!(post.comments[0].author_name(), "Bob Tester");

    let later = engagement.add_comment(&post_id, &bob, "renamed").await.unwrap();
    assert_eq!(later.comments[1].author_name(), "Robert Tester");
}

#[tokio::test]
async fn delete_is_owner_only() {
    let (store, ada, bob) = seeded().await;
    let engagement = EngagementManager::new(store.clone(), &EngagementConfig::default());
    let post_id = publish(&engagement, &ada, "mine").await;

    let err = engagement.delete_post(&post_id, &bob).await.unwrap_err();
    assert!(matches!(err, SocialError::Forbidden { .. }));
    assert!(store.find_post(&post_id).await.unwrap().is_some());

    let feed = engagement.delete_post(&post_id, &ada).await.unwrap();
    assert!(feed.iter().all(|post| post.id != post_id));

    let err = engagement.delete_post(&post_id, &ada).await.unwrap_err();
    assert!(matches!(err, SocialError::NotFound { subject: Subject::Post, .. }));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_likes_from_distinct_users_all_land() {
    const LIKERS: usize = 32;
    let store = MemoryStore::new();
    let author = register(store.clone(), "Author").await;
    let mut likers = Vec::with_capacity(LIKERS);
    for idx in 0..LIKERS {
        likers.push(register(store.clone(), &format!("Liker{idx}")).await);
    }

    // Every conflict means another liker succeeded, so LIKERS attempts always suffice.
    let engagement = Arc::new(EngagementManager::new(store.clone(), &retries(LIKERS as u32)));
    let post_id = publish(&engagement, &author, "popular").await;

    let handles: Vec<_> = likers
        .iter()
        .cloned()
        .map(|user_id| {
            let engagement = Arc::clone(&engagement);
            let post_id = post_id.clone();
            tokio::spawn(async move { engagement.toggle_like(&post_id, &user_id).await })
        })
        .collect();
    for handle in handles {
        let outcome = handle.await.expect("join").expect("like");
        assert!(outcome.liked);
    }

    let post = store.find_post(&post_id).await.unwrap().unwrap();
    assert_eq!(post.like_count(), LIKERS);
    assert!(likers.iter().all(|user_id| post.is_liked_by(user_id)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_comments_are_all_kept() {
    const COMMENTS: usize = 24;
    let (store, ada, bob) = seeded().await;
    let engagement = Arc::new(EngagementManager::new(store.clone(), &EngagementConfig::default()));
    let post_id = publish(&engagement, &ada, "discuss").await;

    let handles: Vec<_> = (0..COMMENTS)
        .map(|idx| {
            let engagement = Arc::clone(&engagement);
            let post_id = post_id.clone();
            let author = if idx % 2 == 0 { ada.clone() } else { bob.clone() };
            tokio::spawn(async move { engagement.add_comment(&post_id, &author, &format!("comment {idx}")).await })
        })
        .collect();
    for handle in handles {
        handle.await.expect("join").expect("comment");
    }

    let post = store.find_post(&post_id).await.unwrap().unwrap();
    assert_eq!(post.comments.len(), COMMENTS);
    for idx in 0..COMMENTS {
        let text = format!("comment {idx}");
        assert!(post.comments.iter().any(|comment| comment.text() == text), "missing {text}");
    }
}
