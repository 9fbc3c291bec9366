//! Core traits for the updater
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`PublicIpSource`]: Fetch the current public IPv4 address
//! - [`DnsProvider`]: Push an address to the dynamic-DNS provider
//! - [`StateStore`]: Single-value cache of the last pushed address
//! - [`HostResolver`]: Resolve the managed hostname to its A-records
//! - [`LastKnownSource`]: "What was the address last time?" (strategy seam)

pub mod ip_source;
pub mod dns_provider;
pub mod state_store;
pub mod host_resolver;
pub mod last_known;

pub use ip_source::PublicIpSource;
pub use dns_provider::{DnsProvider, UpdateResult};
pub use state_store::StateStore;
pub use host_resolver::{HostResolver, LookupFailure};
pub use last_known::{Decision, LastKnown, LastKnownSource};
