// # DuckDNS Provider
//
// This crate provides the DuckDNS update client for the updater.
//
// ## Behaviour
//
// - One HTTP GET per update, nothing else
// - Full error propagation; no retry, no backoff, no rate-limit handling
// - No idempotency check: the reconciler decides whether to call
//
// ## Security Requirements
//
// - The token NEVER appears in logs or in `Debug` output
// - Error messages never include the request URL (it carries the token)
//
// ## API Reference
//
// ```http
// GET /update?domains=<domain>&token=<token>&ip=<address>
// ```
//
// DuckDNS answers `200 OK` with the body `OK` when the update is accepted
// (including when the address did not change) and `200 OK` with the body `KO`
// when the domain or token is wrong.

use async_trait::async_trait;
use duckdns_core::config::DEFAULT_UPDATE_URL;
use duckdns_core::traits::{DnsProvider, UpdateResult};
use duckdns_core::{Error, Result};
use std::net::Ipv4Addr;
use std::time::Duration;

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

const PROVIDER_NAME: &str = "duckdns";

/// DuckDNS update client
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose the token.
pub struct DuckDnsProvider {
    /// DuckDNS account token
    /// ⚠️ NEVER log this value
    token: String,

    /// Update endpoint
    update_url: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the token
impl std::fmt::Debug for DuckDnsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DuckDnsProvider")
            .field("token", &"<REDACTED>")
            .field("update_url", &self.update_url)
            .finish()
    }
}

impl DuckDnsProvider {
    /// Create a provider against the public DuckDNS endpoint
    ///
    /// An empty token is accepted; DuckDNS will reject the update.
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_update_url(token, DEFAULT_UPDATE_URL)
    }

    /// Create a provider against a custom endpoint
    pub fn with_update_url(token: impl Into<String>, update_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self {
            token: token.into(),
            update_url: update_url.into(),
            client,
        }
    }

    /// The configured update endpoint
    pub fn update_url(&self) -> &str {
        &self.update_url
    }
}

#[async_trait]
impl DnsProvider for DuckDnsProvider {
    async fn push_update(&self, domain: &str, ip: Ipv4Addr) -> Result<UpdateResult> {
        tracing::debug!("Sending DuckDNS update for {} -> {}", domain, ip);

        let ip_text = ip.to_string();
        let response = self
            .client
            .get(&self.update_url)
            .query(&[
                ("domains", domain),
                ("token", self.token.as_str()),
                ("ip", ip_text.as_str()),
            ])
            .send()
            .await
            // `without_url` keeps the token out of the message
            .map_err(|e| {
                Error::provider(
                    PROVIDER_NAME,
                    None,
                    format!("HTTP request failed: {}", e.without_url()),
                )
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::provider(
                PROVIDER_NAME,
                Some(status.as_u16()),
                format!(
                    "Could not update IP number, HTTP service returned {}",
                    status.as_u16()
                ),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| {
                Error::provider(
                    PROVIDER_NAME,
                    Some(status.as_u16()),
                    format!("Failed to read response: {}", e.without_url()),
                )
            })?;

        let body = body.trim();
        if body.starts_with("KO") {
            return Err(Error::ProviderRejected {
                provider: PROVIDER_NAME.to_string(),
                body: body.to_string(),
            });
        }
        if !body.starts_with("OK") {
            tracing::warn!("Unexpected DuckDNS response body: {:?}", body);
        }

        tracing::info!("DNS record updated successfully: {} -> {}", domain, ip);
        Ok(UpdateResult {
            domain: domain.to_string(),
            ip,
        })
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn server_answering(status: u16, body: &str) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/update"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_sends_domain_token_and_ip() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/update"))
            .and(query_param("domains", "myhome"))
            .and(query_param("token", "secret"))
            .and(query_param("ip", "203.0.113.5"))
            .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
            .expect(1)
            .mount(&server)
            .await;

        let provider =
            DuckDnsProvider::with_update_url("secret", format!("{}/update", server.uri()));
        let result = provider
            .push_update("myhome", Ipv4Addr::new(203, 0, 113, 5))
            .await
            .unwrap();

        assert_eq!(result.domain, "myhome");
        assert_eq!(result.ip, Ipv4Addr::new(203, 0, 113, 5));
    }

    #[tokio::test]
    async fn test_non_success_status_is_provider_error() {
        let server = server_answering(500, "").await;
        let provider = DuckDnsProvider::with_update_url("t", format!("{}/update", server.uri()));

        let err = provider
            .push_update("myhome", Ipv4Addr::new(203, 0, 113, 5))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Provider { .. }), "got {:?}", err);
        assert_eq!(err.status(), Some(500));
    }

    #[tokio::test]
    async fn test_ko_body_is_rejection() {
        let server = server_answering(200, "KO").await;
        let provider = DuckDnsProvider::with_update_url("", format!("{}/update", server.uri()));

        let err = provider
            .push_update("myhome", Ipv4Addr::new(203, 0, 113, 5))
            .await
            .unwrap_err();

        assert!(
            matches!(err, Error::ProviderRejected { ref body, .. } if body == "KO"),
            "got {:?}",
            err
        );
    }

    #[tokio::test]
    async fn test_transport_error_hides_token() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let provider =
            DuckDnsProvider::with_update_url("secret_token_12345", format!("http://{}/update", addr));
        let err = provider
            .push_update("myhome", Ipv4Addr::new(203, 0, 113, 5))
            .await
            .unwrap_err();

        assert_eq!(err.status(), None);
        assert!(!err.to_string().contains("secret_token_12345"));
    }

    #[test]
    fn test_provider_name() {
        let provider = DuckDnsProvider::new("token");
        assert_eq!(provider.provider_name(), "duckdns");
        assert_eq!(provider.update_url(), DEFAULT_UPDATE_URL);
    }

    #[test]
    fn test_token_not_exposed_in_debug() {
        let provider = DuckDnsProvider::new("secret_token_12345");

        let debug_str = format!("{:?}", provider);
        assert!(!debug_str.contains("secret_token"));
        assert!(debug_str.contains("DuckDnsProvider"));
    }
}
