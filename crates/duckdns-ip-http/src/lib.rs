// # HTTP Public-IP Source
//
// This crate provides an HTTP-based public-IP source for the updater.
//
// ## Architecture
//
// Issues one GET to a "what is my IP" service that answers with JSON:
//
// ```json
// {"ip": "203.0.113.5"}
// ```
//
// The default service is ipify (`https://api.ipify.org?format=json`). Any
// service with the same body shape can be configured.
//
// One request per call. No caching, no retries, no failover between
// services: a failed request aborts the run.

use duckdns_core::PublicIpSource;
use duckdns_core::config::DEFAULT_IP_SERVICE_URL;
use duckdns_core::{Error, Result};

use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

/// Default HTTP timeout for the lookup
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Service name used in errors and logs
const SERVICE_NAME: &str = "ipify";

/// Response body of the public-IP service
#[derive(Debug, Deserialize)]
struct IpResponse {
    ip: String,
}

/// HTTP-based public-IP source
#[derive(Debug, Clone)]
pub struct HttpIpSource {
    /// URL to fetch the address from
    url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpSource {
    /// Create a new HTTP IP source
    ///
    /// # Parameters
    ///
    /// - `url`: URL answering with `{"ip": "..."}`
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::builder()
                .timeout(DEFAULT_HTTP_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }

    /// Create a source using the default service
    pub fn ipify() -> Self {
        Self::new(DEFAULT_IP_SERVICE_URL)
    }

    /// The configured service URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch and parse the address
    async fn fetch_ip(&self) -> Result<Ipv4Addr> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::unreachable(SERVICE_NAME, format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(
                "Could not get IP number, HTTP service returned {}",
                status.as_u16()
            );
            return Err(Error::http_status(SERVICE_NAME, status.as_u16()));
        }

        let body: IpResponse = response.json().await.map_err(|e| {
            Error::invalid_input(format!("Failed to decode {} response: {}", SERVICE_NAME, e))
        })?;

        parse_ipv4(&body.ip)
    }
}

impl Default for HttpIpSource {
    fn default() -> Self {
        Self::ipify()
    }
}

/// Parse the service's answer, accepting IPv4 only
fn parse_ipv4(text: &str) -> Result<Ipv4Addr> {
    let text = text.trim();
    match text.parse::<IpAddr>() {
        Ok(IpAddr::V4(ip)) => Ok(ip),
        Ok(IpAddr::V6(ip)) => Err(Error::invalid_input(format!(
            "Expected IPv4, got: {}",
            ip
        ))),
        Err(_) => Err(Error::invalid_input(format!(
            "Invalid IP address: {}",
            text
        ))),
    }
}

#[async_trait::async_trait]
impl PublicIpSource for HttpIpSource {
    async fn current(&self) -> Result<Ipv4Addr> {
        let ip = self.fetch_ip().await?;
        tracing::debug!("Public IP reported by {}: {}", self.url, ip);
        Ok(ip)
    }

    fn source_name(&self) -> &'static str {
        SERVICE_NAME
    }
}
