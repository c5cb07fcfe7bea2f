//! The lifecycle scenarios driven through the asynchronous forms.
//!
//! Sync and async forms share their semantics; these tests pin that the
//! async path reaches the same outcomes.

use multitopic::{MemoryAuthority, NamespaceAuthority, RegistryError, TopicRegistry, MATCH_ALL};

fn test_registry() -> (MemoryAuthority, TopicRegistry<MemoryAuthority>) {
    let authority = MemoryAuthority::connect("memory://async").unwrap();
    let registry = TopicRegistry::with_authority(authority.clone());
    (authority, registry)
}

#[tokio::test]
async fn test_create_then_lookup() {
    let (authority, registry) = test_registry();

    let entry = registry.create_topic_async("orders").await.unwrap();
    assert_eq!(entry.name(), "orders");
    assert!(authority.topic_exists("orders").unwrap());
    assert!(registry.contains("orders"));
}

#[tokio::test]
async fn test_duplicate_create_fails() {
    let (_, registry) = test_registry();

    registry.create_topic_async("orders").await.unwrap();
    assert!(matches!(
        registry.create_topic_async("orders").await,
        Err(RegistryError::TopicExists(_))
    ));
}

#[tokio::test]
async fn test_subscription_lifecycle() {
    let (authority, registry) = test_registry();
    let entry = registry.create_topic_async("orders").await.unwrap();

    entry
        .create_subscription_with_filter_async("billing", "priority > 5")
        .await
        .unwrap();
    assert_eq!(
        authority.subscription_filter("orders", "billing").as_deref(),
        Some("priority > 5")
    );

    // Default-filter form matches the explicit match-all form
    entry.create_subscription_async("audit").await.unwrap();
    assert_eq!(entry.subscription("audit").unwrap().filter(), MATCH_ALL);

    let handle = entry.subscription("billing").unwrap();
    entry.close_subscription_async("billing").await.unwrap();
    assert!(handle.is_closed());

    // Idempotent through the async form too
    entry.close_subscription_async("billing").await.unwrap();
    assert_eq!(handle.client().close_calls(), 1);
}

#[tokio::test]
async fn test_delete_branches() {
    let (authority, registry) = test_registry();
    let entry = registry.create_topic_async("orders").await.unwrap();
    entry.create_subscription_async("billing").await.unwrap();

    // Remote still present: both deletes are no-ops
    assert!(!entry.delete_subscription_async("billing").await.unwrap());
    assert!(!registry.delete_topic_async("orders").await.unwrap());
    assert!(registry.contains("orders"));

    // Remote gone: both deletes drop local state
    authority.delete_subscription("orders", "billing").unwrap();
    assert!(entry.delete_subscription_async("billing").await.unwrap());

    authority.delete_topic("orders").unwrap();
    assert!(registry.delete_topic_async("orders").await.unwrap());
    assert!(!registry.contains("orders"));
}

#[tokio::test]
async fn test_orderly_shutdown() {
    let (_, registry) = test_registry();

    for name in ["orders", "shipments"] {
        let entry = registry.create_topic_async(name).await.unwrap();
        entry.create_subscription_async("billing").await.unwrap();
        entry.create_subscription_async("audit").await.unwrap();
    }

    registry.close_topic_async("orders").await.unwrap();
    registry.close_topics_async().await.unwrap();

    for name in ["orders", "shipments"] {
        let entry = registry.topic(name).unwrap();
        for sub in ["billing", "audit"] {
            let handle = entry.subscription(sub).unwrap();
            assert!(handle.is_closed());
            assert_eq!(handle.client().close_calls(), 1);
        }
    }
    assert_eq!(registry.topic_count(), 2);
}

#[tokio::test]
async fn test_close_topic_async_unknown_name_fails() {
    let (_, registry) = test_registry();
    assert!(matches!(
        registry.close_topic_async("orders").await,
        Err(RegistryError::TopicNotFound(_))
    ));
}
