// # Public IP Source Trait
//
// Defines the interface for asking an external service which IPv4 address
// this host is reachable at.
//
// ## Implementations
//
// - HTTP (ipify JSON API): `duckdns-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use duckdns_core::PublicIpSource;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let source = /* PublicIpSource implementation */;
//     let ip = source.current().await?;
//     println!("Public IP: {}", ip);
//     Ok(())
// }
// ```

use async_trait::async_trait;
use std::net::Ipv4Addr;

/// Trait for public-IP resolvers
///
/// The address is fetched fresh on every call. Implementations do not cache
/// and do not retry: a single failed request is returned to the caller and
/// aborts the run.
///
/// # Errors
///
/// - `Error::Network` with the status code when the service answers with a
///   non-success status, or without one when it is unreachable
/// - `Error::InvalidInput` when the answer is not an IPv4 address
#[async_trait]
pub trait PublicIpSource: Send + Sync {
    /// Fetch the caller's current public IPv4 address
    async fn current(&self) -> Result<Ipv4Addr, crate::Error>;

    /// Name of the service (for logging)
    fn source_name(&self) -> &'static str;
}
