//! Error types for the updater
//!
//! Every error aborts the current reconciliation pass. There is no local
//! recovery and no retry, so the variants only need to describe what failed.

use thiserror::Error;

use crate::traits::LookupFailure;

/// Result type alias for updater operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the updater
#[derive(Error, Debug)]
pub enum Error {
    /// The public-IP service was unreachable or answered with a non-success status
    #[error("Network error ({service}): {message}{}", fmt_status(.status))]
    Network {
        /// Name of the remote service
        service: String,
        /// HTTP status code, when a response was received
        status: Option<u16>,
        /// Human-readable detail
        message: String,
    },

    /// The DNS provider answered the update call with a non-success status
    #[error("Provider error ({provider}): {message}{}", fmt_status(.status))]
    Provider {
        /// Provider name
        provider: String,
        /// HTTP status code, when a response was received
        status: Option<u16>,
        /// Human-readable detail
        message: String,
    },

    /// The provider accepted the request but refused the update (bad token or domain)
    #[error("Provider {provider} rejected the update: {body}")]
    ProviderRejected {
        /// Provider name
        provider: String,
        /// Response body as returned by the provider
        body: String,
    },

    /// Cache file unreadable or unwritable ("file absent" is not an error)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Cache content could not be interpreted
    #[error("State store error: {0}")]
    StateStore(String),

    /// Hostname resolution failed
    #[error("DNS resolution failed for {host}: {kind}")]
    DnsResolution {
        /// The fully-qualified name that was looked up
        host: String,
        /// Which of the closed failure kinds occurred
        kind: LookupFailure,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input (e.g. a malformed address from a remote service)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

fn fmt_status(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" (HTTP status {})", code),
        None => String::new(),
    }
}

impl Error {
    /// Create a network error for a response with the given status
    pub fn http_status(service: impl Into<String>, status: u16) -> Self {
        Self::Network {
            service: service.into(),
            status: Some(status),
            message: "service returned a non-success status".to_string(),
        }
    }

    /// Create a network error for a request that never got a response
    pub fn unreachable(service: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Network {
            service: service.into(),
            status: None,
            message: msg.into(),
        }
    }

    /// Create a provider error
    pub fn provider(
        provider: impl Into<String>,
        status: Option<u16>,
        message: impl Into<String>,
    ) -> Self {
        Self::Provider {
            provider: provider.into(),
            status,
            message: message.into(),
        }
    }

    /// Create a state store error
    pub fn state_store(msg: impl Into<String>) -> Self {
        Self::StateStore(msg.into())
    }

    /// Create a DNS resolution error
    pub fn dns_resolution(host: impl Into<String>, kind: LookupFailure) -> Self {
        Self::DnsResolution {
            host: host.into(),
            kind,
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// HTTP status code carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Network { status, .. } | Self::Provider { status, .. } => *status,
            _ => None,
        }
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
