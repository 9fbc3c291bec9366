//! Reconciliation strategies
//!
//! Two interchangeable answers to "what was the address last time?":
//!
//! - [`FileCacheStrategy`]: a local single-value cache, written after every
//!   successful update
//! - [`DnsCompareStrategy`]: the managed hostname's live A-records; nothing
//!   is persisted locally
//!
//! The deployment picks one through configuration; a process never switches
//! between them.

use async_trait::async_trait;
use std::net::Ipv4Addr;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::traits::{HostResolver, LastKnown, LastKnownSource, StateStore};

/// Compare against a locally cached address
pub struct FileCacheStrategy {
    store: Box<dyn StateStore>,
}

impl FileCacheStrategy {
    /// Create a strategy over `store`
    pub fn new(store: Box<dyn StateStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl LastKnownSource for FileCacheStrategy {
    async fn observe(&self) -> Result<LastKnown> {
        Ok(match self.store.load().await? {
            Some(ip) => LastKnown::Cached(ip),
            None => LastKnown::Missing,
        })
    }

    async fn commit(&self, ip: Ipv4Addr) -> Result<()> {
        self.store.store(ip).await
    }

    fn strategy_name(&self) -> &'static str {
        "file-cache"
    }
}

/// Compare against the hostname's current A-records
pub struct DnsCompareStrategy {
    resolver: Box<dyn HostResolver>,
    fqdn: String,
}

impl DnsCompareStrategy {
    /// Create a strategy resolving `fqdn` through `resolver`
    pub fn new(resolver: Box<dyn HostResolver>, fqdn: impl Into<String>) -> Self {
        Self {
            resolver,
            fqdn: fqdn.into(),
        }
    }

    /// The fully-qualified name being compared
    pub fn fqdn(&self) -> &str {
        &self.fqdn
    }
}

#[async_trait]
impl LastKnownSource for DnsCompareStrategy {
    async fn observe(&self) -> Result<LastKnown> {
        match self.resolver.resolve_a(&self.fqdn).await {
            Ok(addresses) => {
                debug!("{} resolves to {:?}", self.fqdn, addresses);
                Ok(LastKnown::Resolved(addresses))
            }
            Err(failure) => {
                // Reported, not raised: an unresolved name means "update"
                let diagnostic = Error::dns_resolution(&self.fqdn, failure.clone());
                warn!(kind = failure.kind(), "{}", diagnostic);
                Ok(LastKnown::Unresolved(failure))
            }
        }
    }

    async fn commit(&self, _ip: Ipv4Addr) -> Result<()> {
        Ok(())
    }

    fn strategy_name(&self) -> &'static str {
        "dns-compare"
    }
}
