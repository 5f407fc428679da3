//! Wikipedia OpenSearch provider.
//!
//! Endpoint used:
//!   * GET {endpoint}?action=opensearch&limit={n}&format=json&search={term}
//!
//! The response is a JSON array `[term, labels[], descriptions[], links[]]`,
//! passed through untouched; the pipeline picks labels and links out of it.

use std::time::Duration;

use futures::future::BoxFuture;
use reqwest::{Client, Request, Url};
use serde_json::Value;
use tracing::debug;
use typeahead_core::{ConfigError, ProviderError, WidgetConfig};
use typeahead_engine::SearchProvider;

/// OpenSearch HTTP client wrapper.
#[derive(Debug, Clone)]
pub struct WikiProvider {
    http: Client,
    endpoint: Url,
    limit: u32,
    timeout: Duration,
}

impl WikiProvider {
    /// Constructs a provider from widget configuration.
    ///
    /// The transport timeout bounds how long one attempt can hang.
    pub fn from_config(config: &WidgetConfig) -> Result<Self, ConfigError> {
        let endpoint = Url::parse(&config.provider.endpoint).map_err(|e| {
            ConfigError::Invalid(format!(
                "provider.endpoint '{}': {}",
                config.provider.endpoint, e
            ))
        })?;

        let timeout = config.provider.timeout();
        let http = Client::builder()
            .user_agent(config.provider.user_agent.clone())
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::Invalid(format!("http client: {}", e)))?;

        debug!("Creating WikiProvider with endpoint={}", endpoint);
        Ok(Self {
            http,
            endpoint,
            limit: config.result_limit,
            timeout,
        })
    }

    /// Build the GET request for `term`.
    pub fn build_request(&self, term: &str) -> Result<Request, ProviderError> {
        let limit = self.limit.to_string();
        self.http
            .get(self.endpoint.clone())
            .query(&[
                ("action", "opensearch"),
                ("limit", limit.as_str()),
                ("format", "json"),
                ("search", term),
            ])
            .build()
            .map_err(|e| map_error(e, self.timeout))
    }

    async fn fetch(http: Client, request: Request, timeout: Duration) -> Result<Value, ProviderError> {
        debug!("OpenSearch GET {}", request.url());

        let resp = http
            .execute(request)
            .await
            .map_err(|e| map_error(e, timeout))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ProviderError::HttpStatus(status.as_u16()));
        }

        resp.json::<Value>()
            .await
            .map_err(|e| map_error(e, timeout))
    }
}

impl SearchProvider for WikiProvider {
    fn search(&self, term: String) -> BoxFuture<'static, Result<Value, ProviderError>> {
        let http = self.http.clone();
        let timeout = self.timeout;
        let request = self.build_request(&term);

        Box::pin(async move { Self::fetch(http, request?, timeout).await })
    }
}

/// Classify a transport error.
fn map_error(e: reqwest::Error, timeout: Duration) -> ProviderError {
    if e.is_timeout() {
        return ProviderError::Timeout { duration: timeout };
    }
    if let Some(status) = e.status() {
        return ProviderError::HttpStatus(status.as_u16());
    }
    if e.is_decode() {
        return ProviderError::Decode(e.to_string());
    }
    ProviderError::Network(e.to_string())
}
