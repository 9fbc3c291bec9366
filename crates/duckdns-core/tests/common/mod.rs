//! Test doubles and common utilities for reconciler contract tests
//!
//! The doubles count calls and record arguments so tests can assert exactly
//! how many provider calls and cache writes a pass performed.

#![allow(dead_code)]

use duckdns_core::error::{Error, Result};
use duckdns_core::traits::{
    DnsProvider, HostResolver, LookupFailure, PublicIpSource, StateStore, UpdateResult,
};
use duckdns_core::{DnsCompareStrategy, FileCacheStrategy, Reconciler};
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const DOMAIN: &str = "myhome";

pub fn ip(s: &str) -> Ipv4Addr {
    s.parse().expect("valid IPv4 literal")
}

/// An IP source returning a fixed address (or a fixed failure status)
#[derive(Clone)]
pub struct FixedIpSource {
    answer: std::result::Result<Ipv4Addr, u16>,
    call_count: Arc<AtomicUsize>,
}

impl FixedIpSource {
    pub fn new(ip: Ipv4Addr) -> Self {
        Self {
            answer: Ok(ip),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A source whose service answers with `status`
    pub fn failing(status: u16) -> Self {
        Self {
            answer: Err(status),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl PublicIpSource for FixedIpSource {
    async fn current(&self) -> Result<Ipv4Addr> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.answer
            .map_err(|status| Error::http_status("fixed", status))
    }

    fn source_name(&self) -> &'static str {
        "fixed"
    }
}

/// A provider that records every pushed address
#[derive(Clone)]
pub struct MockDnsProvider {
    pushed: Arc<Mutex<Vec<(String, Ipv4Addr)>>>,
    fail_with: Option<u16>,
}

impl MockDnsProvider {
    pub fn new() -> Self {
        Self {
            pushed: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    /// A provider answering every call with `status`
    pub fn failing(status: u16) -> Self {
        Self {
            fail_with: Some(status),
            ..Self::new()
        }
    }

    /// Number of update calls received (failed ones included)
    pub fn update_call_count(&self) -> usize {
        self.pushed.lock().unwrap().len()
    }

    /// Addresses pushed, in order
    pub fn pushed_ips(&self) -> Vec<Ipv4Addr> {
        self.pushed.lock().unwrap().iter().map(|(_, ip)| *ip).collect()
    }

    pub fn pushed_domains(&self) -> Vec<String> {
        self.pushed
            .lock()
            .unwrap()
            .iter()
            .map(|(domain, _)| domain.clone())
            .collect()
    }
}

#[async_trait::async_trait]
impl DnsProvider for MockDnsProvider {
    async fn push_update(&self, domain: &str, ip: Ipv4Addr) -> Result<UpdateResult> {
        self.pushed.lock().unwrap().push((domain.to_string(), ip));

        if let Some(status) = self.fail_with {
            return Err(Error::provider("mock", Some(status), "update failed"));
        }

        Ok(UpdateResult {
            domain: domain.to_string(),
            ip,
        })
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// A state store that counts reads and writes
#[derive(Clone)]
pub struct MockStateStore {
    value: Arc<Mutex<Option<Ipv4Addr>>>,
    load_count: Arc<AtomicUsize>,
    writes: Arc<Mutex<Vec<Ipv4Addr>>>,
    fail_load: bool,
}

impl MockStateStore {
    pub fn empty() -> Self {
        Self {
            value: Arc::new(Mutex::new(None)),
            load_count: Arc::new(AtomicUsize::new(0)),
            writes: Arc::new(Mutex::new(Vec::new())),
            fail_load: false,
        }
    }

    pub fn holding(ip: Ipv4Addr) -> Self {
        let store = Self::empty();
        *store.value.lock().unwrap() = Some(ip);
        store
    }

    /// A store whose cache exists but cannot be read
    pub fn unreadable() -> Self {
        Self {
            fail_load: true,
            ..Self::empty()
        }
    }

    pub fn value(&self) -> Option<Ipv4Addr> {
        *self.value.lock().unwrap()
    }

    pub fn load_count(&self) -> usize {
        self.load_count.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> Vec<Ipv4Addr> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl StateStore for MockStateStore {
    async fn load(&self) -> Result<Option<Ipv4Addr>> {
        self.load_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_load {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "permission denied",
            )));
        }
        Ok(self.value())
    }

    async fn store(&self, ip: Ipv4Addr) -> Result<()> {
        self.writes.lock().unwrap().push(ip);
        *self.value.lock().unwrap() = Some(ip);
        Ok(())
    }
}

/// A resolver with a canned answer that records the names it was asked for
#[derive(Clone)]
pub struct FixedResolver {
    answer: std::result::Result<Vec<Ipv4Addr>, LookupFailure>,
    queries: Arc<Mutex<Vec<String>>>,
}

impl FixedResolver {
    pub fn resolving(addresses: Vec<Ipv4Addr>) -> Self {
        Self {
            answer: Ok(addresses),
            queries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(failure: LookupFailure) -> Self {
        Self {
            answer: Err(failure),
            queries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl HostResolver for FixedResolver {
    async fn resolve_a(&self, fqdn: &str) -> std::result::Result<Vec<Ipv4Addr>, LookupFailure> {
        self.queries.lock().unwrap().push(fqdn.to_string());
        self.answer.clone()
    }
}

/// Reconciler over the file-cache strategy with the given doubles
pub fn file_cache_reconciler(
    source: &FixedIpSource,
    provider: &MockDnsProvider,
    store: &MockStateStore,
) -> Reconciler {
    Reconciler::new(
        Box::new(source.clone()),
        Box::new(provider.clone()),
        Box::new(FileCacheStrategy::new(Box::new(store.clone()))),
        DOMAIN,
    )
}

/// Reconciler over the DNS-compare strategy with the given doubles
pub fn dns_compare_reconciler(
    source: &FixedIpSource,
    provider: &MockDnsProvider,
    resolver: &FixedResolver,
) -> Reconciler {
    Reconciler::new(
        Box::new(source.clone()),
        Box::new(provider.clone()),
        Box::new(DnsCompareStrategy::new(
            Box::new(resolver.clone()),
            format!("{}.duckdns.org", DOMAIN),
        )),
        DOMAIN,
    )
}
