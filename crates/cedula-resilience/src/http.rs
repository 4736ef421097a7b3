//! `reqwest`-backed transport.
//!
//! Wraps a `reqwest::Client` with the provider's base URL, default headers,
//! an optional bearer token, and a per-request timeout. Retry policy is NOT
//! built in here — the caller owns that via [`crate::ResilientCaller`].

use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::transport::{CallRequest, CallResponse, HttpMethod, Transport, TransportError};

/// Configuration for the HTTP transport.
#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    /// Base URL all request paths are resolved against.
    pub base_url: Url,
    /// Bearer token attached to every request when set.
    pub bearer_token: Option<String>,
    /// Request timeout in seconds (default: 30).
    pub timeout_secs: u64,
}

impl HttpTransportConfig {
    /// Configuration with the default timeout and no authentication.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            bearer_token: None,
            timeout_secs: 30,
        }
    }

    /// Attach a bearer token.
    #[must_use]
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Override the request timeout.
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Production transport over `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
    timeout_ms: u64,
}

impl HttpTransport {
    /// Build the underlying client from configuration.
    pub fn new(config: HttpTransportConfig) -> Result<Self, TransportError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            reqwest::header::HeaderValue::from_static("application/json"),
        );
        if let Some(token) = &config.bearer_token {
            let value = reqwest::header::HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| TransportError::ClientBuild {
                    reason: "bearer token contains invalid header characters".to_string(),
                })?;
            headers.insert(reqwest::header::AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| TransportError::ClientBuild {
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url,
            timeout_ms: config.timeout_secs * 1000,
        })
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &CallRequest) -> Result<CallResponse, TransportError> {
        let endpoint = request.endpoint();
        let url = self.url_for(&request.path);

        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
            HttpMethod::Put => self.client.put(&url),
            HttpMethod::Patch => self.client.patch(&url),
            HttpMethod::Delete => self.client.delete(&url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout {
                    endpoint: endpoint.clone(),
                    elapsed_ms: self.timeout_ms,
                }
            } else if e.is_connect() {
                TransportError::Unreachable {
                    endpoint: endpoint.clone(),
                    reason: e.to_string(),
                }
            } else {
                TransportError::Http {
                    endpoint: endpoint.clone(),
                    source: e,
                }
            }
        })?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response.text().await.map_err(|e| TransportError::Http {
            endpoint,
            source: e,
        })?;

        Ok(CallResponse {
            status,
            headers,
            body,
        })
    }
}
