// # duckdns-updater - one-shot DuckDNS updater
//
// A thin integration layer meant to be run by an external scheduler (cron,
// systemd timer). Each invocation performs exactly one reconciliation pass
// and exits. All decision logic lives in duckdns-core.
//
// The binary is responsible for:
// 1. Reading configuration from environment variables
// 2. Setting up logging
// 3. Wiring the public-IP source, the provider and the configured strategy
// 4. Running one pass and mapping the result to an exit code
//
// ## Configuration
//
// All configuration is done via environment variables. A `.env` file in the
// working directory is read first; it only fills in variables that are not
// already set.
//
// ### Provider
// - `DUCKDNS_DOMAIN`: Domain (subdomain) to update, e.g. `myhome`
// - `DUCKDNS_TOKEN`: DuckDNS token
// - `DUCKDNS_UPDATE_URL`: Update endpoint (default: https://www.duckdns.org/update)
//
// ### Strategy
// - `DUCKDNS_STRATEGY`: `file` (local cache) or `dns` (compare with A-records)
// - `DUCKDNS_CACHE_PATH`: Cache file for `file` (default: last.ip)
// - `DUCKDNS_BASE_DOMAIN`: Base domain for `dns` (default: duckdns.org)
//
// ### Public IP
// - `DUCKDNS_IP_SERVICE_URL`: Service answering `{"ip": "..."}`
//   (default: https://api.ipify.org?format=json)
//
// ### Logging
// - `LOGGING`: TRACE, DEBUG, INFO, WARNING, ERROR or FATAL (default: DEBUG)
// - `DUCKDNS_LOG_FILE`: Extra log file (default: duckdns-updater.log, empty disables)
//
// ## Example
//
// ```bash
// export DUCKDNS_DOMAIN=myhome
// export DUCKDNS_TOKEN=your_token
// export DUCKDNS_STRATEGY=dns
// export LOGGING=INFO
//
// duckdns-updater
// ```

use anyhow::{Context, Result};
use duckdns_core::config::{
    DEFAULT_BASE_DOMAIN, DEFAULT_IP_SERVICE_URL, DEFAULT_LOG_FILE, DEFAULT_UPDATE_URL,
    IpServiceConfig, LoggingConfig, ProviderConfig,
};
use duckdns_core::state::DEFAULT_CACHE_PATH;
use duckdns_core::{
    DnsCompareStrategy, FileCacheStrategy, FileStateStore, LastKnownSource, LogLevel,
    ReconcileOutcome, Reconciler, StrategyConfig, UpdaterConfig,
};
use duckdns_ip_http::HttpIpSource;
use duckdns_provider::DuckDnsProvider;
use duckdns_resolver::HickoryHostResolver;
use std::env;
use std::fs::OpenOptions;
use std::process::ExitCode;
use std::sync::Mutex;
use std::time::Instant;
use tracing::{Dispatch, debug, error, info, warn};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Exit codes for different termination scenarios
///
/// - 0: Pass completed (updated or nothing to do)
/// - 1: Configuration or startup error
/// - 2: The pass failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UpdaterExitCode {
    /// Pass completed
    Success = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// The pass failed (network, provider, cache)
    RuntimeError = 2,
}

impl From<UpdaterExitCode> for ExitCode {
    fn from(code: UpdaterExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Raw environment configuration
#[derive(Debug)]
struct Config {
    domain: String,
    token: String,
    strategy: String,
    cache_path: String,
    base_domain: String,
    ip_service_url: String,
    update_url: String,
    log_level: String,
    log_file: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, applying defaults for unset keys
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let or_default = |key: &str, default: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            domain: lookup("DUCKDNS_DOMAIN").unwrap_or_default().trim().to_string(),
            token: lookup("DUCKDNS_TOKEN").unwrap_or_default().trim().to_string(),
            strategy: or_default("DUCKDNS_STRATEGY", "file"),
            cache_path: or_default("DUCKDNS_CACHE_PATH", DEFAULT_CACHE_PATH),
            base_domain: or_default("DUCKDNS_BASE_DOMAIN", DEFAULT_BASE_DOMAIN),
            ip_service_url: or_default("DUCKDNS_IP_SERVICE_URL", DEFAULT_IP_SERVICE_URL),
            update_url: or_default("DUCKDNS_UPDATE_URL", DEFAULT_UPDATE_URL),
            log_level: or_default("LOGGING", "DEBUG"),
            // Set-but-empty disables the file
            log_file: match lookup("DUCKDNS_LOG_FILE") {
                Some(path) if path.trim().is_empty() => None,
                Some(path) => Some(path.trim().to_string()),
                None => Some(DEFAULT_LOG_FILE.to_string()),
            },
        }
    }

    /// Build and validate the immutable run configuration
    fn into_updater_config(self) -> Result<UpdaterConfig> {
        let strategy = match self.strategy.to_lowercase().as_str() {
            "file" | "file-cache" | "file_cache" => StrategyConfig::FileCache {
                path: self.cache_path,
            },
            "dns" | "dns-compare" | "dns_compare" => StrategyConfig::DnsCompare {
                base_domain: self.base_domain,
            },
            other => anyhow::bail!(
                "DUCKDNS_STRATEGY '{}' is not supported. \
                Supported strategies: file, dns",
                other
            ),
        };

        let level: LogLevel = self
            .log_level
            .parse()
            .context("LOGGING has an invalid value")?;

        let config = UpdaterConfig {
            domain: self.domain,
            token: self.token,
            strategy,
            ip_service: IpServiceConfig {
                url: self.ip_service_url,
            },
            provider: ProviderConfig {
                update_url: self.update_url,
            },
            logging: LoggingConfig {
                level,
                file: self.log_file,
            },
        };

        config.validate()?;
        Ok(config)
    }
}

/// Build the logging handle for this process
///
/// Output goes to stderr and, when configured, to a plain-text log file.
fn build_dispatch(logging: &LoggingConfig) -> Result<Dispatch> {
    let file_layer = match logging.file.as_deref() {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path))?;
            Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        }
        None => None,
    };

    let subscriber = tracing_subscriber::registry()
        .with(LevelFilter::from_level(logging.level.into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer);

    Ok(Dispatch::new(subscriber))
}

fn main() -> ExitCode {
    let started = Instant::now();

    let env_file = dotenvy::dotenv().ok();

    // Load and validate configuration from environment
    let config = match Config::from_env().into_updater_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return UpdaterExitCode::ConfigError.into();
        }
    };

    // Initialize logging
    let dispatch = match build_dispatch(&config.logging) {
        Ok(dispatch) => dispatch,
        Err(e) => {
            eprintln!("Failed to set up logging: {:#}", e);
            return UpdaterExitCode::ConfigError.into();
        }
    };

    let code = tracing::dispatcher::with_default(&dispatch, || {
        debug!("Updater started");
        if let Some(path) = &env_file {
            debug!("Loaded environment from {}", path.display());
        }

        if config.domain.is_empty() {
            warn!("DUCKDNS_DOMAIN is not set");
        }
        if config.token.is_empty() {
            warn!("DUCKDNS_TOKEN is not set; the provider will reject the update");
        }

        let rt = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(e) => {
                error!("Failed to create tokio runtime: {}", e);
                return UpdaterExitCode::ConfigError;
            }
        };

        let code = match rt.block_on(run(&config)) {
            Ok(outcome) => {
                if outcome.is_updated() {
                    info!("{} now points at {}", config.domain, outcome.ip());
                }
                UpdaterExitCode::Success
            }
            Err(e) => {
                error!("Update failed: {:#}", e);
                UpdaterExitCode::RuntimeError
            }
        };

        debug!(
            "Updater finished in {} milliseconds",
            started.elapsed().as_millis()
        );
        code
    });

    code.into()
}

/// Wire the components and run one pass
async fn run(config: &UpdaterConfig) -> Result<ReconcileOutcome> {
    let ip_source = HttpIpSource::new(&config.ip_service.url);
    let provider = DuckDnsProvider::with_update_url(&config.token, &config.provider.update_url);

    let strategy: Box<dyn LastKnownSource> = match &config.strategy {
        StrategyConfig::FileCache { path } => {
            debug!("Using cache file {}", path);
            Box::new(FileCacheStrategy::new(Box::new(FileStateStore::new(path))))
        }
        StrategyConfig::DnsCompare { .. } => {
            let fqdn = config
                .fqdn()
                .context("DNS-compare strategy without a hostname")?;
            debug!("Comparing against A-records of {}", fqdn);
            let resolver = HickoryHostResolver::system()?;
            Box::new(DnsCompareStrategy::new(Box::new(resolver), fqdn))
        }
    };

    let reconciler = Reconciler::new(
        Box::new(ip_source),
        Box::new(provider),
        strategy,
        &config.domain,
    );

    Ok(reconciler.run_once().await?)
}
