// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use sg_adapters::{FlakyCoordinationStore, MemoryCoordinationStore};
use std::time::Duration;
use yare::parameterized;

const TTL: Duration = Duration::from_secs(3);

async fn held(
    store: &MemoryCoordinationStore,
    mode: ReleaseMode,
    stats: &StrategyStats,
) -> LeaseGuard<MemoryCoordinationStore> {
    let owner = Owner::new("a");
    assert!(store.set_if_absent("lock:1", &owner, TTL).await.unwrap());
    LeaseGuard::new(store.clone(), "lock:1".to_string(), owner, mode, stats.clone())
}

#[parameterized(
    atomic = { ReleaseMode::Atomic },
    read_then_delete = { ReleaseMode::ReadThenDelete },
)]
#[test_macro(tokio::test)]
async fn release_clears_owned_key(mode: ReleaseMode) {
    let store = MemoryCoordinationStore::new();
    let stats = StrategyStats::new();
    let guard = held(&store, mode, &stats).await;

    assert_eq!(guard.release().await, ReleaseOutcome::Released);
    assert_eq!(store.holder("lock:1"), None);
    assert_eq!(stats.snapshot().ownership_violations, 0);
}

#[tokio::test(start_paused = true)]
async fn expired_and_retaken_key_is_left_alone() {
    for mode in [ReleaseMode::Atomic, ReleaseMode::ReadThenDelete] {
        let store = MemoryCoordinationStore::new();
        let stats = StrategyStats::new();
        let guard = held(&store, mode, &stats).await;

        tokio::time::advance(TTL).await;
        assert!(store
            .set_if_absent("lock:1", &Owner::new("b"), TTL)
            .await
            .unwrap());

        assert_eq!(guard.release().await, ReleaseOutcome::NotOwner, "{mode:?}");
        assert_eq!(store.holder("lock:1"), Some(Owner::new("b")));
        assert_eq!(stats.snapshot().ownership_violations, 1);
    }
}

#[tokio::test(start_paused = true)]
async fn release_publishes_after_clearing() {
    let store = MemoryCoordinationStore::new();
    let mut subscription = store.subscribe("lock:1:released").await.unwrap();
    let guard = held(&store, ReleaseMode::Atomic, &StrategyStats::new())
        .await
        .with_notify("lock:1:released".to_string());

    guard.release().await;
    subscription.wait().await;

    // a woken waiter finds the key free
    assert!(store
        .set_if_absent("lock:1", &Owner::new("b"), TTL)
        .await
        .unwrap());
}

#[tokio::test(start_paused = true)]
async fn release_notifies_even_when_not_owner() {
    let store = MemoryCoordinationStore::new();
    let mut subscription = store.subscribe("lock:1:released").await.unwrap();
    let guard = held(&store, ReleaseMode::Atomic, &StrategyStats::new())
        .await
        .with_notify("lock:1:released".to_string());
    tokio::time::advance(TTL).await;

    assert_eq!(guard.release().await, ReleaseOutcome::NotOwner);
    let woke = tokio::time::timeout(Duration::from_millis(1), subscription.wait()).await;
    assert!(woke.is_ok());
}

#[tokio::test(start_paused = true)]
async fn unreachable_store_is_reported_not_raised() {
    let store = FlakyCoordinationStore::new(MemoryCoordinationStore::new());
    let owner = Owner::new("a");
    store.set_if_absent("lock:1", &owner, TTL).await.unwrap();
    let stats = StrategyStats::new();
    let guard = LeaseGuard::new(
        store.clone(),
        "lock:1".to_string(),
        owner,
        ReleaseMode::Atomic,
        stats.clone(),
    );
    store.set_offline(true);

    assert_eq!(guard.release().await, ReleaseOutcome::Failed);
    assert_eq!(stats.snapshot().release_failures, 1);

    // the ttl is the backstop
    store.set_offline(false);
    tokio::time::advance(TTL).await;
    assert_eq!(store.inner().holder("lock:1"), None);
}

#[tokio::test(start_paused = true)]
async fn dropped_guard_releases_in_background() {
    let store = MemoryCoordinationStore::new();
    let guard = held(&store, ReleaseMode::Atomic, &StrategyStats::new()).await;

    drop(guard);
    tokio::time::sleep(Duration::from_millis(1)).await;

    assert_eq!(store.holder("lock:1"), None);
}

#[tokio::test(start_paused = true)]
async fn release_stops_watchdog() {
    let store = MemoryCoordinationStore::new();
    let stats = StrategyStats::new();
    let guard = held(&store, ReleaseMode::Atomic, &stats).await;
    let watchdog = Watchdog::spawn(
        store.clone(),
        guard.key().to_string(),
        guard.owner().clone(),
        TTL,
        Duration::from_secs(1),
        stats.clone(),
    );
    let guard = guard.with_watchdog(watchdog);

    tokio::time::sleep(Duration::from_millis(2_500)).await;
    guard.release().await;
    let renewed = stats.snapshot().lease_extensions;
    tokio::time::sleep(Duration::from_secs(5)).await;

    assert_eq!(renewed, 2);
    assert_eq!(stats.snapshot().lease_extensions, renewed);
    assert_eq!(store.holder("lock:1"), None);
}
