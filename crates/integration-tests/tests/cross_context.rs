//! Synchronization between contexts sharing one persisted store.
//!
//! Each `CartService` models one open tab/page. The store is shared behind
//! an `Arc` the way `localStorage` is shared across tabs. Consistency is
//! eventual within one reconciliation interval; the last write to the store
//! wins.

use std::sync::Arc;
use std::time::Duration;

use nextstore_cart::{
    CartConfig, CartEvent, CartService, CartStore, LineKey, MemoryStore, watch,
};
use nextstore_integration_tests::support::{SilentStore, product};
use rust_decimal::Decimal;

/// Config with a short fallback poll so tests finish quickly.
fn fast_config() -> CartConfig {
    let mut config = CartConfig::default();
    config.sync.poll_interval = Duration::from_millis(50);
    config
}

async fn wait_for_external(
    rx: &mut tokio::sync::broadcast::Receiver<CartEvent>,
) -> Option<CartEvent> {
    loop {
        match tokio::time::timeout(Duration::from_secs(2), rx.recv()).await {
            Ok(Ok(event @ CartEvent::External { .. })) => return Some(event),
            Ok(Ok(CartEvent::Local { .. })) => {}
            _ => return None,
        }
    }
}

#[tokio::test]
async fn test_addition_in_one_context_reaches_the_other() {
    let store = Arc::new(MemoryStore::new());
    let a = CartService::new(Arc::clone(&store) as Arc<dyn CartStore>, fast_config());
    let b = Arc::new(CartService::new(store, fast_config()));

    let mut events = b.subscribe();
    let handle = watch(Arc::clone(&b));

    a.add_item(&product("p1", "قميص كلاسيكي", 10_000), Some("M"), Some("أسود"), 1)
        .unwrap();

    let event = wait_for_external(&mut events).await;
    assert_eq!(event, Some(CartEvent::External { item_count: 1 }));

    // context B sees the addition without an explicit reload call
    let items = b.items();
    assert_eq!(items.len(), 1);
    assert_eq!(items.first().unwrap().size.as_deref(), Some("M"));

    handle.abort();
}

#[tokio::test]
async fn test_poll_fallback_converges_without_notifications() {
    // A host with no storage events at all: only the reconciliation poll runs
    let store = Arc::new(SilentStore::new());
    let a = CartService::new(Arc::clone(&store) as Arc<dyn CartStore>, fast_config());
    let b = Arc::new(CartService::new(store, fast_config()));

    let mut events = b.subscribe();
    let handle = watch(Arc::clone(&b));

    a.add_item(&product("p1", "حذاء رياضي", 15_000), None, None, 2)
        .unwrap();

    let event = wait_for_external(&mut events).await;
    assert_eq!(event, Some(CartEvent::External { item_count: 2 }));
    assert_eq!(b.summary().subtotal, Decimal::from(30_000));

    handle.abort();
}

#[tokio::test]
async fn test_remove_propagates_across_contexts() {
    let store = Arc::new(MemoryStore::new());
    let a = CartService::new(Arc::clone(&store) as Arc<dyn CartStore>, fast_config());
    let b = Arc::new(CartService::new(store, fast_config()));

    let p = product("p1", "قميص", 1_000);
    a.add_item(&p, Some("M"), None, 1).unwrap();
    assert!(b.resync());

    let mut events = b.subscribe();
    let handle = watch(Arc::clone(&b));

    a.remove_item(&LineKey::derive(&p.id, Some("M"), None)).unwrap();

    let event = wait_for_external(&mut events).await;
    assert_eq!(event, Some(CartEvent::External { item_count: 0 }));
    assert!(b.items().is_empty());

    handle.abort();
}

#[test]
fn test_store_level_last_write_wins() {
    // Documented weakness: no locking, no compare-and-swap; whichever
    // context's full-list write lands last owns the key
    let store = MemoryStore::new();
    let a = uuid::Uuid::new_v4();
    let b = uuid::Uuid::new_v4();

    store.store("nextstore_cart", r#"[{"from":"a"}]"#, a).unwrap();
    store.store("nextstore_cart", r#"[{"from":"b"}]"#, b).unwrap();

    let raw = store.load("nextstore_cart").unwrap().unwrap();
    assert!(raw.contains("\"b\""));
    assert!(!raw.contains("\"a\""));
}

#[test]
fn test_each_mutation_rereads_before_writing() {
    // Sequential writes from two contexts do not lose updates because every
    // mutation is a fresh read-modify-write of the whole list
    let store = Arc::new(MemoryStore::new());
    let a = CartService::new(Arc::clone(&store) as Arc<dyn CartStore>, fast_config());
    let b = CartService::new(store, fast_config());

    a.add_item(&product("p1", "قميص", 1_000), None, None, 1)
        .unwrap();
    b.add_item(&product("p2", "حذاء", 2_000), None, None, 1)
        .unwrap();

    let items = b.items();
    assert_eq!(items.len(), 2);
    assert_eq!(a.items(), b.items());
}

#[tokio::test]
async fn test_clear_in_one_context_empties_the_other() {
    let store = Arc::new(MemoryStore::new());
    let a = CartService::new(Arc::clone(&store) as Arc<dyn CartStore>, fast_config());
    let b = Arc::new(CartService::new(store, fast_config()));

    a.add_item(&product("p1", "قميص", 1_000), None, None, 3)
        .unwrap();
    assert!(b.resync());
    assert_eq!(b.item_count(), 3);

    let mut events = b.subscribe();
    let handle = watch(Arc::clone(&b));

    a.clear().unwrap();

    let event = wait_for_external(&mut events).await;
    assert_eq!(event, Some(CartEvent::External { item_count: 0 }));
    assert_eq!(b.item_count(), 0);

    handle.abort();
}
