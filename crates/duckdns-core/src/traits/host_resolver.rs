// # Host Resolver Trait
//
// Defines the interface for resolving the managed hostname to its A-records.
//
// Lookup failures are values, not errors: each of the four outcomes a
// resolver can end in is a distinct `LookupFailure` variant the reconciler
// can branch on.
//
// ## Implementations
//
// - hickory-resolver: `duckdns-resolver` crate

use async_trait::async_trait;
use std::fmt;
use std::net::Ipv4Addr;

/// Why an A-record lookup produced no addresses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupFailure {
    /// The name exists but has no A-records
    NoAnswer,
    /// The name does not exist (NXDOMAIN)
    NxDomain,
    /// The resolver did not answer in time
    Timeout,
    /// Any other resolution error, with the resolver's message
    Other(String),
}

impl LookupFailure {
    /// Short, stable label for the kind (for logs and assertions)
    pub fn kind(&self) -> &'static str {
        match self {
            LookupFailure::NoAnswer => "no_answer",
            LookupFailure::NxDomain => "nxdomain",
            LookupFailure::Timeout => "timeout",
            LookupFailure::Other(_) => "other",
        }
    }
}

impl fmt::Display for LookupFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupFailure::NoAnswer => write!(f, "the name has no A-records"),
            LookupFailure::NxDomain => write!(f, "the name does not exist"),
            LookupFailure::Timeout => write!(f, "the resolver timed out"),
            LookupFailure::Other(msg) => write!(f, "resolution error: {}", msg),
        }
    }
}

/// Trait for A-record resolvers
#[async_trait]
pub trait HostResolver: Send + Sync {
    /// Resolve `fqdn` to its IPv4 addresses
    ///
    /// A successful lookup always carries at least one address; an empty
    /// answer is reported as `LookupFailure::NoAnswer`.
    async fn resolve_a(&self, fqdn: &str) -> Result<Vec<Ipv4Addr>, LookupFailure>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_distinct() {
        let kinds = [
            LookupFailure::NoAnswer.kind(),
            LookupFailure::NxDomain.kind(),
            LookupFailure::Timeout.kind(),
            LookupFailure::Other("boom".into()).kind(),
        ];
        for (i, a) in kinds.iter().enumerate() {
            for b in &kinds[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn other_keeps_message() {
        let failure = LookupFailure::Other("SERVFAIL".into());
        assert_eq!(failure.to_string(), "resolution error: SERVFAIL");
    }
}
