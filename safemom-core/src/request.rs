use std::collections::BTreeMap;
use std::time::Duration;

use safemom_types::{Diagnostics, RequestError, RetryConfig};
use serde::Serialize;

use crate::transport::Method;

/// Default per-attempt timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Immutable description of one logical request.
///
/// Built fresh per call. Unset knobs fall back to the orchestrator's
/// configuration when the descriptor is executed.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    path: String,
    method: Method,
    body: Option<serde_json::Value>,
    timeout: Option<Duration>,
    max_retries: Option<u32>,
    base_delay: Option<Duration>,
    headers: BTreeMap<String, String>,
}

impl RequestDescriptor {
    /// A `POST` to `path` with no body.
    pub fn post(path: impl AsRef<str>) -> Self {
        Self::new(Method::Post, path)
    }

    /// A `GET` to `path`.
    pub fn get(path: impl AsRef<str>) -> Self {
        Self::new(Method::Get, path)
    }

    /// A request with an explicit method. The path is normalized to start with `/`.
    pub fn new(method: Method, path: impl AsRef<str>) -> Self {
        let path = path.as_ref();
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };
        Self {
            path,
            method,
            body: None,
            timeout: None,
            max_retries: None,
            base_delay: None,
            headers: BTreeMap::new(),
        }
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    /// Returns the serializer error when `body` cannot be represented as JSON.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, serde_json::Error> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Attach an already-built JSON value.
    #[must_use]
    pub fn body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Override the per-attempt timeout. A zero duration is ignored.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the retry budget.
    #[must_use]
    pub const fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Override the base backoff delay.
    #[must_use]
    pub const fn base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = Some(delay);
        self
    }

    /// Add or replace a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Normalized path, always starting with `/`.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Body to send; `None` for `GET` regardless of what was attached.
    #[must_use]
    pub fn payload(&self) -> Option<&serde_json::Value> {
        match self.method {
            Method::Get => None,
            _ => self.body.as_ref(),
        }
    }

    /// Extra headers supplied by the caller.
    #[must_use]
    pub const fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Effective timeout given a fallback; a zero override falls back too.
    #[must_use]
    pub fn effective_timeout(&self, fallback: Duration) -> Duration {
        self.timeout.filter(|t| !t.is_zero()).unwrap_or(fallback)
    }

    /// Effective retry settings given a fallback configuration.
    #[must_use]
    pub fn effective_retry(&self, fallback: RetryConfig) -> RetryConfig {
        RetryConfig {
            max_retries: self.max_retries.unwrap_or(fallback.max_retries),
            base_delay_ms: self
                .base_delay
                .map_or(fallback.base_delay_ms, |d| {
                    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
                }),
            jitter_percent: fallback.jitter_percent,
        }
    }
}

/// Successfully decoded response plus how it was obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct Delivered<T> {
    /// Decoded response body.
    pub data: T,
    /// URL, status, content type, size and the retry attempt that succeeded.
    pub diagnostics: Diagnostics,
}

impl<T> Delivered<T> {
    /// Transform the payload, keeping diagnostics.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Delivered<U> {
        Delivered {
            data: f(self.data),
            diagnostics: self.diagnostics,
        }
    }
}

/// Result of one orchestrated exchange. Failures are values, never panics.
pub type RequestOutcome<T> = Result<Delivered<T>, RequestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_is_normalized_with_leading_slash() {
        assert_eq!(RequestDescriptor::post("api/ping").path(), "/api/ping");
        assert_eq!(RequestDescriptor::post("/api/ping").path(), "/api/ping");
    }

    #[test]
    fn get_never_exposes_a_body() {
        let d = RequestDescriptor::get("/api/ping").body(serde_json::json!({"a": 1}));
        assert!(d.payload().is_none());
        let p = RequestDescriptor::post("/api/x").body(serde_json::json!({"a": 1}));
        assert!(p.payload().is_some());
    }

    #[test]
    fn overrides_win_over_fallbacks() {
        let d = RequestDescriptor::post("/x")
            .max_retries(5)
            .base_delay(Duration::from_millis(10));
        let eff = d.effective_retry(RetryConfig::default());
        assert_eq!(eff.max_retries, 5);
        assert_eq!(eff.base_delay_ms, 10);
        assert_eq!(d.effective_timeout(DEFAULT_TIMEOUT), DEFAULT_TIMEOUT);
    }

    #[test]
    fn zero_timeout_override_uses_fallback() {
        let d = RequestDescriptor::get("/api/ping").timeout(Duration::ZERO);
        assert_eq!(d.effective_timeout(DEFAULT_TIMEOUT), DEFAULT_TIMEOUT);

        let d = RequestDescriptor::get("/api/ping").timeout(Duration::from_millis(250));
        assert_eq!(d.effective_timeout(DEFAULT_TIMEOUT), Duration::from_millis(250));
    }
}
