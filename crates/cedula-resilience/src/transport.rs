//! Transport contract.
//!
//! The caller drives attempts through the [`Transport`] trait — a single
//! `send(request) -> response` seam. Production deployments use the
//! `reqwest`-backed [`crate::http::HttpTransport`]; tests script a mock.
//! The request/response types are plain data so the policy engine stays
//! pure and transport-agnostic.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::policy::ServerRetryPolicy;

/// HTTP status the remote uses to signal throttling.
pub const THROTTLED_STATUS: u16 = 429;

/// HTTP method of a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
            Self::Put => write!(f, "PUT"),
            Self::Patch => write!(f, "PATCH"),
            Self::Delete => write!(f, "DELETE"),
        }
    }
}

/// One logical request, independent of any HTTP client library.
#[derive(Debug, Clone)]
pub struct CallRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Path relative to the transport's base URL.
    pub path: String,
    /// Extra headers to attach.
    pub headers: Vec<(String, String)>,
    /// Optional JSON body.
    pub body: Option<serde_json::Value>,
}

impl CallRequest {
    /// A GET request for `path`.
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// A POST request for `path` carrying a JSON body.
    pub fn post(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: HttpMethod::Post,
            path: path.into(),
            headers: Vec::new(),
            body: Some(body),
        }
    }

    /// Attach a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// `"METHOD /path"`, for diagnostics.
    pub fn endpoint(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

/// The observable outcome of one attempt.
#[derive(Debug, Clone)]
pub struct CallResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers as received.
    pub headers: Vec<(String, String)>,
    /// Raw response body.
    pub body: String,
}

impl CallResponse {
    /// First header with the given name, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Raw `Retry-After` header value, if present.
    pub fn retry_after(&self) -> Option<&str> {
        self.header("retry-after")
    }

    /// The structured `retryPolicy` object from the response body, if the
    /// body is JSON and carries one.
    pub fn server_retry_policy(&self) -> Option<ServerRetryPolicy> {
        let value: serde_json::Value = serde_json::from_str(&self.body).ok()?;
        serde_json::from_value(value.get("retryPolicy")?.clone()).ok()
    }

    /// Whether the remote signaled throttling.
    pub fn is_throttled(&self) -> bool {
        self.status == THROTTLED_STATUS
    }
}

/// Errors from the transport layer itself. Throttling is NOT an error —
/// a 429 is a normal [`CallResponse`].
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The HTTP client failed below the status-code level.
    #[error("HTTP transport failure calling {endpoint}: {source}")]
    Http {
        /// `"METHOD /path"` of the failed call.
        endpoint: String,
        /// Underlying client error.
        #[source]
        source: reqwest::Error,
    },

    /// The request timed out.
    #[error("request to {endpoint} timed out after {elapsed_ms}ms")]
    Timeout {
        /// `"METHOD /path"` of the failed call.
        endpoint: String,
        /// Configured timeout that elapsed.
        elapsed_ms: u64,
    },

    /// The HTTP client could not be constructed.
    #[error("could not build HTTP client: {reason}")]
    ClientBuild {
        /// Why construction failed.
        reason: String,
    },

    /// The remote was unreachable.
    #[error("service unreachable at {endpoint}: {reason}")]
    Unreachable {
        /// `"METHOD /path"` of the failed call.
        endpoint: String,
        /// Connection-level failure description.
        reason: String,
    },
}

/// The external call seam: one request in, one response out.
///
/// Implementations must be `Send + Sync` so a single transport can be
/// shared across concurrent resilient calls behind an `Arc`.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue the request once and return whatever the remote said.
    async fn send(&self, request: &CallRequest) -> Result<CallResponse, TransportError>;
}
