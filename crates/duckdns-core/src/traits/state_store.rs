// # State Store Trait
//
// Defines the interface for the local single-value cache holding the address
// of the most recent successful update.
//
// ## Implementations
//
// - File-based: plain text file with exactly one address (`FileStateStore`)
// - In-memory: `MemoryStateStore` (embedding, tests)

use async_trait::async_trait;
use std::net::Ipv4Addr;

/// Trait for state store implementations
///
/// # Semantics
///
/// - An absent cache is a normal state (`Ok(None)`), distinct from a cache
///   that holds an address. It forces an unconditional first update.
/// - `store` replaces the whole content. There is no append, no versioning
///   and no locking; at most one run at a time is assumed.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Read the cached address
    ///
    /// # Returns
    ///
    /// - `Ok(Some(ip))`: the cached address
    /// - `Ok(None)`: no cache yet (first run)
    /// - `Err(Error)`: the cache exists but could not be read or parsed
    async fn load(&self) -> Result<Option<Ipv4Addr>, crate::Error>;

    /// Overwrite the cache with `ip`
    async fn store(&self, ip: Ipv4Addr) -> Result<(), crate::Error>;
}
