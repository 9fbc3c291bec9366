//! Reconciler
//!
//! The Reconciler is responsible for:
//! - Observing the last-known address through the configured strategy
//! - Fetching the current public address
//! - Deciding whether the provider must be called
//! - Pushing the update and committing the new state
//!
//! ## Architecture
//!
//! ```text
//!                      ┌──────────────┐
//!                      │  Reconciler  │
//!                      └──────────────┘
//!                             │
//!      ┌──────────────────────┼──────────────────────┐
//!      │                      │                      │
//!      ▼                      ▼                      ▼
//! ┌─────────────────┐  ┌────────────────┐  ┌──────────────┐
//! │ LastKnownSource │  │ PublicIpSource │  │ DnsProvider  │
//! │ (observe/commit)│  │ (current)      │  │ (push)       │
//! └─────────────────┘  └────────────────┘  └──────────────┘
//! ```
//!
//! ## Flow
//!
//! 1. Observe the last-known address
//! 2. Fetch the public address
//! 3. Decide (`LastKnown::decide`)
//! 4. If an update is needed, push it
//! 5. On success, commit the new address (file-cache strategy only)
//!
//! One pass, no loop, no retry: any error aborts the pass and is returned.

use std::net::Ipv4Addr;
use tracing::{debug, info};

use crate::error::Result;
use crate::traits::{Decision, DnsProvider, LastKnownSource, PublicIpSource};

/// What a single pass did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The provider was called and the new address committed
    Updated {
        /// Why the update was needed
        decision: Decision,
        /// The address pushed
        ip: Ipv4Addr,
    },

    /// Nothing to do
    Skipped {
        /// Why no update was needed
        decision: Decision,
        /// The current public address
        ip: Ipv4Addr,
    },
}

impl ReconcileOutcome {
    /// The decision the pass was based on
    pub fn decision(&self) -> &Decision {
        match self {
            ReconcileOutcome::Updated { decision, .. }
            | ReconcileOutcome::Skipped { decision, .. } => decision,
        }
    }

    /// The current public address observed during the pass
    pub fn ip(&self) -> Ipv4Addr {
        match self {
            ReconcileOutcome::Updated { ip, .. } | ReconcileOutcome::Skipped { ip, .. } => *ip,
        }
    }

    /// Whether the provider was called
    pub fn is_updated(&self) -> bool {
        matches!(self, ReconcileOutcome::Updated { .. })
    }
}

/// Public-IP reconciler
///
/// Owns the three collaborators and the managed domain name. Construct with
/// [`Reconciler::new()`] and call [`Reconciler::run_once()`] once per
/// scheduled invocation.
pub struct Reconciler {
    /// Public-IP resolver
    ip_source: Box<dyn PublicIpSource>,

    /// DNS provider for pushing updates
    provider: Box<dyn DnsProvider>,

    /// Strategy answering "what was the address last time?"
    last_known: Box<dyn LastKnownSource>,

    /// Domain name as the provider knows it (e.g. "myhome")
    domain: String,
}

impl Reconciler {
    /// Create a new reconciler
    pub fn new(
        ip_source: Box<dyn PublicIpSource>,
        provider: Box<dyn DnsProvider>,
        last_known: Box<dyn LastKnownSource>,
        domain: impl Into<String>,
    ) -> Self {
        Self {
            ip_source,
            provider,
            last_known,
            domain: domain.into(),
        }
    }

    /// The managed domain
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Perform one fetch-compare-act pass
    ///
    /// # Returns
    ///
    /// - `Ok(ReconcileOutcome)`: the pass completed
    /// - `Err(Error)`: a collaborator failed; nothing after the failing step ran
    pub async fn run_once(&self) -> Result<ReconcileOutcome> {
        debug!(
            "Reconciling {} using {} strategy, {} source, {} provider",
            self.domain,
            self.last_known.strategy_name(),
            self.ip_source.source_name(),
            self.provider.provider_name()
        );

        let last_known = self.last_known.observe().await?;
        let current = self.ip_source.current().await?;
        let decision = last_known.decide(current);

        match &decision {
            Decision::NoCache => debug!("First run, no previous IP found"),
            Decision::CacheMiss { cached } => info!(
                "Last known IP address {} does not match present one {}",
                cached, current
            ),
            Decision::EmptyOrUnresolved { failure: Some(failure) } => info!(
                "No A-record to compare against ({}), updating to {}",
                failure, current
            ),
            Decision::EmptyOrUnresolved { failure: None } => {
                info!("Hostname resolved to nothing, updating to {}", current)
            }
            Decision::Unmatched { resolved } => info!(
                "Resolved addresses {:?} do not include present one {}",
                resolved, current
            ),
            Decision::CacheHit | Decision::Matched => {
                info!("No action, IP matches {}", current)
            }
        }

        if !decision.needs_update() {
            return Ok(ReconcileOutcome::Skipped {
                decision,
                ip: current,
            });
        }

        info!("Updating \"{}\" with new IP {}", self.domain, current);
        self.provider.push_update(&self.domain, current).await?;
        self.last_known.commit(current).await?;

        Ok(ReconcileOutcome::Updated {
            decision,
            ip: current,
        })
    }
}
