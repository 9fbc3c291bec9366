//! Configuration types for the updater
//!
//! The configuration is built once at startup and never changes during a run.
//! Loading it from the environment is the binary's job; this module only
//! defines the shape, the defaults and validation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default public-IP service (JSON body with an `ip` field)
pub const DEFAULT_IP_SERVICE_URL: &str = "https://api.ipify.org?format=json";

/// Default DuckDNS update endpoint
pub const DEFAULT_UPDATE_URL: &str = "https://www.duckdns.org/update";

/// Default base domain appended to the subdomain in DNS-compare mode
pub const DEFAULT_BASE_DOMAIN: &str = "duckdns.org";

/// Default log file name
pub const DEFAULT_LOG_FILE: &str = "duckdns-updater.log";

/// Main updater configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct UpdaterConfig {
    /// Domain (subdomain) as the provider knows it, e.g. "myhome"
    pub domain: String,

    /// Provider token
    ///
    /// Never serialized and never shown by `Debug`.
    #[serde(default, skip_serializing)]
    pub token: String,

    /// Reconciliation strategy
    #[serde(default)]
    pub strategy: StrategyConfig,

    /// Public-IP service settings
    #[serde(default)]
    pub ip_service: IpServiceConfig,

    /// Provider settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl fmt::Debug for UpdaterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdaterConfig")
            .field("domain", &self.domain)
            .field("token", &"<REDACTED>")
            .field("strategy", &self.strategy)
            .field("ip_service", &self.ip_service)
            .field("provider", &self.provider)
            .field("logging", &self.logging)
            .finish()
    }
}

impl UpdaterConfig {
    /// Create a configuration with defaults for everything but the credentials
    pub fn new(domain: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            token: token.into(),
            strategy: StrategyConfig::default(),
            ip_service: IpServiceConfig::default(),
            provider: ProviderConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// Set the reconciliation strategy
    pub fn with_strategy(mut self, strategy: StrategyConfig) -> Self {
        self.strategy = strategy;
        self
    }

    /// Validate the configuration
    ///
    /// Domain and token presence are deliberately not checked: a missing
    /// token surfaces as a failed provider call.
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.strategy.validate()?;
        validate_url("public-IP service URL", &self.ip_service.url)?;
        validate_url("provider update URL", &self.provider.update_url)?;
        Ok(())
    }

    /// The fully-qualified managed hostname (`<domain>.<base_domain>`)
    ///
    /// Only meaningful in DNS-compare mode.
    pub fn fqdn(&self) -> Option<String> {
        match &self.strategy {
            StrategyConfig::DnsCompare { base_domain } => {
                Some(format!("{}.{}", self.domain, base_domain.trim_start_matches('.')))
            }
            StrategyConfig::FileCache { .. } => None,
        }
    }
}

fn validate_url(what: &str, url: &str) -> Result<(), crate::Error> {
    if url.is_empty() {
        return Err(crate::Error::config(format!("{} cannot be empty", what)));
    }
    if !url.starts_with("https://") && !url.starts_with("http://") {
        return Err(crate::Error::config(format!(
            "{} must use HTTP or HTTPS scheme. Got: {}",
            what, url
        )));
    }
    Ok(())
}

/// Reconciliation strategy configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StrategyConfig {
    /// Compare against a local single-value cache file
    FileCache {
        /// Path to the cache file
        path: String,
    },

    /// Compare against the hostname's live A-records
    DnsCompare {
        /// Base domain appended to the subdomain (e.g. "duckdns.org")
        base_domain: String,
    },
}

impl StrategyConfig {
    /// Validate the strategy configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            StrategyConfig::FileCache { path } => {
                if path.is_empty() {
                    return Err(crate::Error::config("Cache file path cannot be empty"));
                }
                Ok(())
            }
            StrategyConfig::DnsCompare { base_domain } => {
                if base_domain.trim_matches('.').is_empty() {
                    return Err(crate::Error::config(
                        "Base domain cannot be empty in DNS-compare mode",
                    ));
                }
                Ok(())
            }
        }
    }

    /// Get the strategy type name
    pub fn type_name(&self) -> &'static str {
        match self {
            StrategyConfig::FileCache { .. } => "file",
            StrategyConfig::DnsCompare { .. } => "dns",
        }
    }
}

impl Default for StrategyConfig {
    fn default() -> Self {
        StrategyConfig::FileCache {
            path: crate::state::DEFAULT_CACHE_PATH.to_string(),
        }
    }
}

/// Public-IP service configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpServiceConfig {
    /// URL answering with `{"ip": "..."}`
    #[serde(default = "default_ip_service_url")]
    pub url: String,
}

impl Default for IpServiceConfig {
    fn default() -> Self {
        Self {
            url: default_ip_service_url(),
        }
    }
}

fn default_ip_service_url() -> String {
    DEFAULT_IP_SERVICE_URL.to_string()
}

/// Provider configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Update endpoint
    #[serde(default = "default_update_url")]
    pub update_url: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            update_url: default_update_url(),
        }
    }
}

fn default_update_url() -> String {
    DEFAULT_UPDATE_URL.to_string()
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Maximum level
    #[serde(default)]
    pub level: LogLevel,

    /// Extra plain-text log file (`None` disables it)
    #[serde(default = "default_log_file")]
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            file: default_log_file(),
        }
    }
}

fn default_log_file() -> Option<String> {
    Some(DEFAULT_LOG_FILE.to_string())
}

/// Log verbosity
///
/// Parses the conventional names case-insensitively, including `WARNING`,
/// `FATAL` and `CRITICAL`; the last two map to `Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    #[default]
    Debug,
    Info,
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" | "fatal" | "critical" => Ok(LogLevel::Error),
            _ => Err(crate::Error::config(format!(
                "Log level '{}' is not valid. \
                Valid levels: TRACE, DEBUG, INFO, WARNING, ERROR, FATAL",
                s
            ))),
        }
    }
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}
