use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// HTTP method of an outbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Method {
    /// `GET`; never carries a body.
    Get,
    /// `POST`.
    #[default]
    Post,
    /// `PUT`.
    Put,
    /// `DELETE`.
    Delete,
}

impl Method {
    /// Upper-case wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully resolved request handed to a [`Transport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    /// Absolute URL.
    pub url: String,
    /// HTTP method.
    pub method: Method,
    /// Final header set (defaults merged with per-request overrides).
    pub headers: BTreeMap<String, String>,
    /// JSON body; always `None` for `GET`.
    pub body: Option<serde_json::Value>,
}

/// Raw response as seen by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransportResponse {
    /// HTTP status; 0 when the transport could not determine one.
    pub status: u16,
    /// `Content-Type` header, if present.
    pub content_type: Option<String>,
    /// `Content-Length` header, if present and numeric.
    pub content_length: Option<u64>,
    /// The response was reached through at least one redirect.
    pub redirected: bool,
    /// Raw body bytes.
    pub body: Vec<u8>,
}

impl TransportResponse {
    /// Build a JSON response with the given status.
    #[must_use]
    pub fn json(status: u16, value: &serde_json::Value) -> Self {
        let body = value.to_string().into_bytes();
        Self {
            status,
            content_type: Some("application/json".to_string()),
            content_length: Some(body.len() as u64),
            redirected: false,
            body,
        }
    }

    /// Build an HTML response with the given status.
    pub fn html(status: u16, html: impl Into<String>) -> Self {
        let body = html.into().into_bytes();
        Self {
            status,
            content_type: Some("text/html; charset=utf-8".to_string()),
            content_length: Some(body.len() as u64),
            redirected: false,
            body,
        }
    }

    /// True for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Body decoded as UTF-8, replacing invalid sequences.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Failure raised by a transport before any response was available.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The transport's own deadline fired.
    #[error("transport timed out")]
    Timeout,
    /// Connection-level failure (DNS, refused, reset, TLS).
    #[error("{0}")]
    Network(String),
}

/// Seam between the orchestrator and the network.
///
/// Implementations must send cookies/credentials with each request and follow
/// redirects, reporting `redirected = true` when they did.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Stable transport name for logging.
    fn name(&self) -> &'static str;

    /// Perform a single exchange. No retries, no interpretation of the status.
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}
