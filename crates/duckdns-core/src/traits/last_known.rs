// # Last-Known Source Trait
//
// The single capability both reconciliation strategies share: "what was the
// address last time?". The file-cache strategy answers from a local file,
// the DNS-compare strategy answers by resolving the managed hostname.
//
// The decision itself is a pure function of the observation and the current
// public address (`LastKnown::decide`), so both state machines are testable
// without any I/O.

use async_trait::async_trait;
use std::net::Ipv4Addr;

use super::host_resolver::LookupFailure;

/// What a strategy observed about the previous address
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LastKnown {
    /// No cache file yet (file-cache strategy, first run)
    Missing,
    /// The cached address (file-cache strategy)
    Cached(Ipv4Addr),
    /// The hostname's current A-records, never empty (DNS-compare strategy)
    Resolved(Vec<Ipv4Addr>),
    /// The hostname could not be resolved (DNS-compare strategy)
    Unresolved(LookupFailure),
}

/// Outcome of comparing the current address against the last-known state
///
/// File-cache states: `NoCache`, `CacheHit`, `CacheMiss`.
/// DNS-compare states: `EmptyOrUnresolved`, `Matched`, `Unmatched`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// First run: nothing cached
    NoCache,
    /// Cached address equals the current one
    CacheHit,
    /// Cached address differs from the current one
    CacheMiss {
        /// The stale cached address
        cached: Ipv4Addr,
    },
    /// The hostname resolved to nothing
    EmptyOrUnresolved {
        /// Why, when the lookup failed rather than returning an empty set
        failure: Option<LookupFailure>,
    },
    /// The current address is among the resolved A-records
    Matched,
    /// The current address is not among the resolved A-records
    Unmatched {
        /// The addresses the hostname currently points at
        resolved: Vec<Ipv4Addr>,
    },
}

impl Decision {
    /// Whether the provider must be called
    pub fn needs_update(&self) -> bool {
        !matches!(self, Decision::CacheHit | Decision::Matched)
    }
}

impl LastKnown {
    /// Compare `current` against this observation
    pub fn decide(&self, current: Ipv4Addr) -> Decision {
        match self {
            LastKnown::Missing => Decision::NoCache,
            LastKnown::Cached(cached) if *cached == current => Decision::CacheHit,
            LastKnown::Cached(cached) => Decision::CacheMiss { cached: *cached },
            LastKnown::Resolved(resolved) if resolved.is_empty() => {
                Decision::EmptyOrUnresolved { failure: None }
            }
            LastKnown::Resolved(resolved) if resolved.contains(&current) => Decision::Matched,
            LastKnown::Resolved(resolved) => Decision::Unmatched {
                resolved: resolved.clone(),
            },
            LastKnown::Unresolved(failure) => Decision::EmptyOrUnresolved {
                failure: Some(failure.clone()),
            },
        }
    }
}

/// Trait for reconciliation strategies
#[async_trait]
pub trait LastKnownSource: Send + Sync {
    /// Observe the previous address
    ///
    /// Only fatal conditions are errors (e.g. an unreadable cache file).
    /// "No cache" and lookup failures are observations.
    async fn observe(&self) -> Result<LastKnown, crate::Error>;

    /// Record `ip` after a successful update
    ///
    /// Strategies whose state lives elsewhere (DNS) do nothing here.
    async fn commit(&self, ip: Ipv4Addr) -> Result<(), crate::Error>;

    /// Strategy name (for logging)
    fn strategy_name(&self) -> &'static str;
}
