//! Contract Test: File-Cache Reconciliation
//!
//! Constraints verified:
//! - No cache → exactly one update with the current address, then one write
//! - Cache equal to the current address → no update, no write
//! - Cache different from the current address → one update, then one write
//! - The real cache file ends up holding exactly the pushed address
//!
//! If this test fails, the update decision or persistence order is broken.

mod common;

use common::*;
use duckdns_core::{Decision, FileCacheStrategy, FileStateStore, Reconciler, StateStore};

#[tokio::test]
async fn first_run_updates_then_persists() {
    for current in ["203.0.113.5", "198.51.100.9", "192.0.2.1"] {
        let current = ip(current);
        let source = FixedIpSource::new(current);
        let provider = MockDnsProvider::new();
        let store = MockStateStore::empty();

        let outcome = file_cache_reconciler(&source, &provider, &store)
            .run_once()
            .await
            .expect("pass succeeds");

        assert!(outcome.is_updated());
        assert_eq!(outcome.decision(), &Decision::NoCache);
        assert_eq!(provider.pushed_ips(), vec![current]);
        assert_eq!(provider.pushed_domains(), vec![DOMAIN.to_string()]);
        assert_eq!(store.writes(), vec![current]);
    }
}

#[tokio::test]
async fn cache_hit_does_nothing() {
    let current = ip("203.0.113.5");
    let source = FixedIpSource::new(current);
    let provider = MockDnsProvider::new();
    let store = MockStateStore::holding(current);

    let outcome = file_cache_reconciler(&source, &provider, &store)
        .run_once()
        .await
        .expect("pass succeeds");

    assert!(!outcome.is_updated());
    assert_eq!(outcome.decision(), &Decision::CacheHit);
    assert_eq!(provider.update_call_count(), 0, "no provider call on cache hit");
    assert!(store.writes().is_empty(), "no write on cache hit");
    assert_eq!(store.value(), Some(current));
}

#[tokio::test]
async fn cache_miss_updates_then_persists() {
    let cached = ip("203.0.113.5");
    let current = ip("198.51.100.9");
    let source = FixedIpSource::new(current);
    let provider = MockDnsProvider::new();
    let store = MockStateStore::holding(cached);

    let outcome = file_cache_reconciler(&source, &provider, &store)
        .run_once()
        .await
        .expect("pass succeeds");

    assert_eq!(outcome.decision(), &Decision::CacheMiss { cached });
    assert_eq!(provider.pushed_ips(), vec![current]);
    assert_eq!(store.writes(), vec![current]);
}

#[tokio::test]
async fn state_is_read_before_the_public_ip_is_fetched() {
    // An unreadable cache aborts the pass before any network call
    let source = FixedIpSource::new(ip("203.0.113.5"));
    let provider = MockDnsProvider::new();
    let store = MockStateStore::unreadable();

    let err = file_cache_reconciler(&source, &provider, &store)
        .run_once()
        .await
        .expect_err("unreadable cache is fatal");

    assert!(matches!(err, duckdns_core::Error::Io(_)), "got {:?}", err);
    assert_eq!(store.load_count(), 1);
    assert_eq!(source.call_count(), 0);
    assert_eq!(provider.update_call_count(), 0);
}

#[tokio::test]
async fn second_run_with_same_address_is_idle() {
    let current = ip("203.0.113.5");
    let source = FixedIpSource::new(current);
    let provider = MockDnsProvider::new();
    let store = MockStateStore::empty();

    // Two scheduled invocations sharing the same cache
    for _ in 0..2 {
        file_cache_reconciler(&source, &provider, &store)
            .run_once()
            .await
            .expect("pass succeeds");
    }

    assert_eq!(provider.update_call_count(), 1);
    assert_eq!(store.writes(), vec![current]);
}

#[tokio::test]
async fn cache_file_scenarios() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("last.ip");
    let provider = MockDnsProvider::new();

    let run = |current: &str| {
        Reconciler::new(
            Box::new(FixedIpSource::new(ip(current))),
            Box::new(provider.clone()),
            Box::new(FileCacheStrategy::new(Box::new(FileStateStore::new(&path)))),
            DOMAIN,
        )
    };

    // Cache file absent, public IP 203.0.113.5
    run("203.0.113.5").run_once().await.unwrap();
    assert_eq!(provider.pushed_ips(), vec![ip("203.0.113.5")]);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "203.0.113.5");

    // Cache holds 203.0.113.5, public IP unchanged
    run("203.0.113.5").run_once().await.unwrap();
    assert_eq!(provider.update_call_count(), 1);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "203.0.113.5");

    // Cache holds 203.0.113.5, public IP now 198.51.100.9
    run("198.51.100.9").run_once().await.unwrap();
    assert_eq!(
        provider.pushed_ips(),
        vec![ip("203.0.113.5"), ip("198.51.100.9")]
    );
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "198.51.100.9");
    assert_eq!(
        FileStateStore::new(&path).load().await.unwrap(),
        Some(ip("198.51.100.9"))
    );
}
