//! safemom-http
//!
//! Production [`Transport`] for the SafeMom orchestrator, backed by `reqwest`.
//! It performs a single exchange per call; retries, timeouts and response
//! interpretation stay with the orchestrator.
#![warn(missing_docs)]

mod builder;

pub use builder::{DEFAULT_MAX_REDIRECTS, DEFAULT_USER_AGENT, ReqwestTransportBuilder};

use async_trait::async_trait;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE, HeaderMap};
use safemom_core::{Method, Transport, TransportError, TransportRequest, TransportResponse};
use thiserror::Error;

/// Failure while constructing a [`ReqwestTransport`].
#[derive(Debug, Error)]
pub enum HttpTransportError {
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// `reqwest`-backed transport with a cookie jar and redirect following.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Start configuring a transport.
    #[must_use]
    pub fn builder() -> ReqwestTransportBuilder {
        ReqwestTransportBuilder::default()
    }

    /// Transport with default settings.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new() -> Result<Self, HttpTransportError> {
        Self::builder().build()
    }

    /// Wrap an existing client (shared connection pool, custom TLS, proxies).
    #[must_use]
    pub const fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn method(method: Method) -> reqwest::Method {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }

    fn map_error(err: &reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout
        } else {
            TransportError::Network(err.to_string())
        }
    }

    fn header_str(headers: &HeaderMap, name: reqwest::header::HeaderName) -> Option<String> {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    fn was_redirected(requested: &str, landed: &reqwest::Url) -> bool {
        // Compare normalized forms so "https://host" and "https://host/" agree.
        !reqwest::Url::parse(requested).is_ok_and(|u| &u == landed)
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    fn name(&self) -> &'static str {
        "safemom-http"
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "safemom_http::send",
            skip(self, request),
            fields(url = %request.url, method = %request.method),
        )
    )]
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let mut rb = self
            .client
            .request(Self::method(request.method), &request.url);
        for (name, value) in &request.headers {
            rb = rb.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            rb = rb.json(body);
        }

        let resp = rb.send().await.map_err(|e| Self::map_error(&e))?;

        let status = resp.status().as_u16();
        let redirected = Self::was_redirected(&request.url, resp.url());
        let content_type = Self::header_str(resp.headers(), CONTENT_TYPE);
        let content_length = Self::header_str(resp.headers(), CONTENT_LENGTH)
            .and_then(|v| v.trim().parse::<u64>().ok());
        let body = resp.bytes().await.map_err(|e| Self::map_error(&e))?.to_vec();

        #[cfg(feature = "tracing")]
        tracing::debug!(status, redirected, bytes = body.len(), "response received");

        Ok(TransportResponse {
            status,
            content_type,
            content_length,
            redirected,
            body,
        })
    }
}
