// # hickory Host Resolver
//
// A-record lookups for the DNS-compare strategy.
//
// ## Failure Classification
//
// hickory reports every unsuccessful lookup as a `ResolveError`. This crate
// turns that into one of the four closed `LookupFailure` kinds:
//
// | resolver outcome                      | kind       |
// |---------------------------------------|------------|
// | NXDOMAIN                              | `NxDomain` |
// | NOERROR, no A-records                 | `NoAnswer` |
// | nameserver did not answer in time     | `Timeout`  |
// | anything else (SERVFAIL, REFUSED, ..) | `Other`    |
//
// hickory reports every empty response as "no records found", whatever the
// response code. The code decides the kind.

use async_trait::async_trait;
use duckdns_core::traits::{HostResolver, LookupFailure};
use duckdns_core::{Error, Result};
use hickory_resolver::config::{NameServerConfig, ResolverConfig, ResolverOpts};
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::proto::op::ResponseCode;
use hickory_resolver::proto::xfer::Protocol;
use hickory_resolver::proto::{ProtoError, ProtoErrorKind};
use hickory_resolver::{ResolveError, Resolver, TokioResolver};
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

/// A-record resolver backed by hickory
pub struct HickoryHostResolver {
    resolver: TokioResolver,
}

impl std::fmt::Debug for HickoryHostResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HickoryHostResolver").finish_non_exhaustive()
    }
}

impl HickoryHostResolver {
    /// Create a resolver using the host's DNS settings
    ///
    /// On Unix, this reads `/etc/resolv.conf`.
    pub fn system() -> Result<Self> {
        let builder = Resolver::builder_tokio().map_err(system_config_error)?;

        Ok(Self {
            resolver: builder.build(),
        })
    }

    /// Create a resolver that queries a single UDP nameserver
    ///
    /// One attempt per lookup, giving up after `timeout`.
    pub fn with_nameserver(addr: SocketAddr, timeout: Duration) -> Self {
        let mut config = ResolverConfig::new();
        config.add_name_server(NameServerConfig::new(addr, Protocol::Udp));

        let mut opts = ResolverOpts::default();
        opts.timeout = timeout;
        opts.attempts = 1;
        opts.cache_size = 0;

        let resolver =
            Resolver::builder_with_config(config, TokioConnectionProvider::default())
                .with_options(opts)
                .build();

        Self { resolver }
    }
}

#[async_trait]
impl HostResolver for HickoryHostResolver {
    async fn resolve_a(&self, fqdn: &str) -> std::result::Result<Vec<Ipv4Addr>, LookupFailure> {
        let lookup = self.resolver.ipv4_lookup(fqdn).await.map_err(|e| {
            let failure = classify(&e);
            tracing::debug!("A lookup for {} failed ({}): {}", fqdn, failure.kind(), e);
            failure
        })?;

        let addresses: Vec<Ipv4Addr> = lookup.iter().map(|a| a.0).collect();
        if addresses.is_empty() {
            return Err(LookupFailure::NoAnswer);
        }

        Ok(addresses)
    }
}

/// Map a hickory error onto the closed failure kinds
pub fn classify(err: &ResolveError) -> LookupFailure {
    match err.proto().map(ProtoError::kind) {
        Some(ProtoErrorKind::NoRecordsFound { response_code, .. }) => match *response_code {
            ResponseCode::NXDomain => LookupFailure::NxDomain,
            ResponseCode::NoError => LookupFailure::NoAnswer,
            _ => LookupFailure::Other(err.to_string()),
        },
        Some(ProtoErrorKind::Timeout) => LookupFailure::Timeout,
        _ => LookupFailure::Other(err.to_string()),
    }
}

/// An unusable host resolver configuration is a startup failure, not a lookup outcome
fn system_config_error(err: ResolveError) -> Error {
    Error::config(format!(
        "Failed to load the system resolver configuration: {}",
        err
    ))
}
