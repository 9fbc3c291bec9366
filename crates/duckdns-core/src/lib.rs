// # duckdns-core
//
// Core library for the DuckDNS public-IP reconciler.
//
// ## Architecture Overview
//
// One pass detects the host's public IPv4 address and, when it differs from
// the last known value, pushes it to the dynamic-DNS provider:
// - **PublicIpSource**: Trait for fetching the current public address
// - **DnsProvider**: Trait for pushing an address to the provider
// - **StateStore**: Trait for the local single-value cache
// - **HostResolver**: Trait for resolving the managed hostname's A-records
// - **LastKnownSource**: Strategy seam, implemented by the file-cache and
//   DNS-compare strategies
// - **Reconciler**: Orchestrates fetch → compare → update → persist
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Decision logic is separate from I/O
// 2. **Single Pass**: No loop, no retry, no concurrency; errors abort the pass
// 3. **Explicit Outcomes**: Lookup failures and decisions are closed enums
// 4. **Library-First**: The binary is a thin layer over this crate

pub mod traits;
pub mod engine;
pub mod strategy;
pub mod config;
pub mod error;
pub mod state;

// Re-export core types for convenience
pub use traits::{
    Decision, DnsProvider, HostResolver, LastKnown, LastKnownSource, LookupFailure,
    PublicIpSource, StateStore,
};
pub use engine::{ReconcileOutcome, Reconciler};
pub use strategy::{DnsCompareStrategy, FileCacheStrategy};
pub use config::{LogLevel, StrategyConfig, UpdaterConfig};
pub use error::{Error, Result};
pub use state::{FileStateStore, MemoryStateStore};
