use super::support::*;

fn ids(friends: &[amity::FriendView]) -> Vec<String> {
    friends.iter().map(|friend| friend.id.clone()).collect()
}

#[tokio::test]
async fn friendship_is_symmetric_after_every_toggle() {
    let store = MemoryStore::new();
    let a = register(store.clone(), "Ada").await;
    let b = register(store.clone(), "Bob").await;
    let graph = RelationshipManager::new(store.clone());

    for round in 0..4 {
        graph.toggle_friend(&a, &b).await.expect("toggle");
        let a_lists_b = ids(&graph.list_friends(&a).await.unwrap()).contains(&b);
        let b_lists_a = ids(&graph.list_friends(&b).await.unwrap()).contains(&a);
        assert_eq!(a_lists_b, b_lists_a, "asymmetric after round {round}");
        assert_eq!(a_lists_b, round % 2 == 0);
    }
}

#[tokio::test]
async fn toggle_from_either_side_undoes_friendship() {
    let store = MemoryStore::new();
    let a = register(store.clone(), "Ada").await;
    let b = register(store.clone(), "Bob").await;
    let graph = RelationshipManager::new(store);

    graph.toggle_friend(&a, &b).await.unwrap();
    let after = graph.toggle_friend(&b, &a).await.unwrap();
    assert!(after.is_empty());
    assert!(graph.list_friends(&a).await.unwrap().is_empty());
}

#[tokio::test]
async fn toggle_returns_resolved_views() {
    let store = MemoryStore::new();
    let a = register(store.clone(), "Ada").await;
    let b = register(store.clone(), "Bob").await;
    let c = register(store.clone(), "Cy").await;
    let graph = RelationshipManager::new(store);

    graph.toggle_friend(&a, &b).await.unwrap();
    let friends = graph.toggle_friend(&a, &c).await.unwrap();
    assert_eq!(friends.len(), 2);

    let bob = friends.iter().find(|friend| friend.id == b).expect("bob listed");
    assert_eq!(bob.first_name, "Bob");
    assert_eq!(bob.occupation, "Engineer");
    assert_eq!(bob.picture_ref, "bob.png");
}

#[tokio::test]
async fn self_friendship_changes_nothing() {
    let store = MemoryStore::new();
    let a = register(store.clone(), "Ada").await;
    let graph = RelationshipManager::new(store);

    let err = graph.toggle_friend(&a, &a).await.unwrap_err();
    assert!(matches!(err, SocialError::InvalidOperation { .. }));
    assert!(graph.list_friends(&a).await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_friend_changes_nothing() {
    let store = MemoryStore::new();
    let a = register(store.clone(), "Ada").await;
    let graph = RelationshipManager::new(store);

    let err = graph.toggle_friend(&a, "missing-user").await.unwrap_err();
    assert!(matches!(err, SocialError::NotFound { subject: Subject::Friend, .. }));
    assert!(graph.list_friends(&a).await.unwrap().is_empty());
}

#[tokio::test]
async fn blank_ids_are_invalid() {
    let graph = RelationshipManager::new(MemoryStore::new());
    for (user, friend) in [("", "b"), ("a", ""), ("  ", "b")] {
        let err = graph.toggle_friend(user, friend).await.unwrap_err();
        assert!(matches!(err, SocialError::InvalidOperation { .. }), "{user:?}/{friend:?}: {err:?}");
    }
}

#[tokio::test]
async fn crash_between_halves_is_repaired_by_reconcile() {
    let memory = MemoryStore::new();
    let a = register(memory.clone(), "Ada").await;
    let b = register(memory.clone(), "Bob").await;

    // First update_friends call (caller side) succeeds, the mirror write fails.
    let store = CrashingStore::failing_call(memory.clone(), 2);
    let graph = RelationshipManager::new(store.clone());

    let err = graph.toggle_friend(&a, &b).await.unwrap_err();
    assert!(matches!(err, SocialError::StoreUnavailable { .. }));

    let reader = RelationshipManager::new(memory.clone());
    assert_eq!(ids(&reader.list_friends(&a).await.unwrap()), vec![b.clone()]);
    assert!(reader.list_friends(&b).await.unwrap().is_empty());

    store.recover();
    assert!(graph.reconcile(&a, &b).await.unwrap());
    assert_eq!(ids(&reader.list_friends(&b).await.unwrap()), vec![a.clone()]);
    assert!(!graph.reconcile(&a, &b).await.unwrap(), "second reconcile writes nothing");
}

#[tokio::test]
async fn reconcile_also_repairs_a_one_sided_removal() {
    let store = MemoryStore::new();
    let a = register(store.clone(), "Ada").await;
    let b = register(store.clone(), "Bob").await;
    store.update_friends(&b, &[a.clone()], &[], Utc::now()).await.unwrap();

    let graph = RelationshipManager::new(store);
    assert!(graph.reconcile(&a, &b).await.unwrap());
    assert!(graph.list_friends(&b).await.unwrap().is_empty());
}

#[tokio::test]
async fn reconcile_with_deleted_counterpart_is_noop() {
    let store = MemoryStore::new();
    let a = register(store.clone(), "Ada").await;
    store.update_friends(&a, &["gone".to_string()], &[], Utc::now()).await.unwrap();

    let graph = RelationshipManager::new(store);
    assert!(!graph.reconcile(&a, "gone").await.unwrap());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_toggles_with_one_hub_stay_symmetric() {
    const MEMBERS: usize = 24;
    let store = MemoryStore::new();
    let hub = register(store.clone(), "Hub").await;
    let mut members = Vec::with_capacity(MEMBERS);
    for idx in 0..MEMBERS {
        members.push(register(store.clone(), &format!("Member{idx}")).await);
    }

    let graph = Arc::new(RelationshipManager::new(store.clone()));
    let handles: Vec<_> = members
        .iter()
        .cloned()
        .map(|member| {
            let graph = Arc::clone(&graph);
            let hub = hub.clone();
            tokio::spawn(async move { graph.toggle_friend(&member, &hub).await })
        })
        .collect();
    for handle in handles {
        handle.await.expect("join").expect("toggle");
    }

    let hub_friends = ids(&graph.list_friends(&hub).await.unwrap());
    assert_eq!(hub_friends.len(), MEMBERS);
    for member in &members {
        assert!(hub_friends.contains(member), "hub is missing {member}");
        assert_eq!(ids(&graph.list_friends(member).await.unwrap()), vec![hub.clone()]);
    }
}
