// # DNS Provider Trait
//
// Defines the interface for pushing a new address to a dynamic-DNS provider.
//
// ## Implementations
//
// - DuckDNS: `duckdns-provider` crate
//
// ## Usage
//
// ```rust,ignore
// use duckdns_core::DnsProvider;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let provider = /* DnsProvider implementation */;
//     provider.push_update("myhome", "203.0.113.5".parse()?).await?;
//     Ok(())
// }
// ```

use async_trait::async_trait;
use std::net::Ipv4Addr;

/// Result of an accepted update call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateResult {
    /// The domain that was updated
    pub domain: String,
    /// The address sent to the provider
    pub ip: Ipv4Addr,
}

/// Trait for DNS provider implementations
///
/// An update is idempotent in effect (pushing the same address again is a
/// no-op on the provider side) but not in execution: every call is one HTTP
/// request with side effects.
///
/// Providers hold their own credentials. They must not retry, must not cache
/// and must not decide whether an update is needed; the `Reconciler` owns
/// that decision.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Push `ip` as the new address of `domain`
    ///
    /// # Returns
    ///
    /// - `Ok(UpdateResult)`: the provider accepted the update
    /// - `Err(Error::Provider)`: non-success HTTP status (carries the code)
    /// - `Err(Error::ProviderRejected)`: the provider refused the update
    async fn push_update(&self, domain: &str, ip: Ipv4Addr)
    -> Result<UpdateResult, crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
