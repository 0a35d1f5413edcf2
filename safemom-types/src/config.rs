//! Configuration types shared by the orchestrator and its transports.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How a 401 response is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub enum UnauthorizedPolicy {
    /// Parse and return the body anyway; only fail when it is not JSON.
    #[default]
    Lenient,
    /// Treat 401 like any other non-success status.
    Strict,
}

/// Retry budget and exponential backoff settings.
///
/// The delay after the `i`-th failed attempt (0-based) is
/// `base_delay_ms * 2^i`, plus up to `jitter_percent` of that value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Retries allowed after the first attempt; total attempts never exceed this + 1.
    pub max_retries: u32,
    /// Delay before the first retry, in milliseconds.
    pub base_delay_ms: u64,
    /// Random jitter percentage [0, 100] added on top of each delay.
    pub jitter_percent: u8,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay_ms: 1000,
            jitter_percent: 0,
        }
    }
}

/// Where the orchestrator is running, which decides how the base URL resolves.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ExecutionContext {
    /// Browser-like context: requests go to the current origin.
    Browser {
        /// Current page origin, e.g. `https://safemom.app`.
        origin: String,
    },
    /// Server-side context: the base URL comes from the environment.
    #[default]
    Server,
}

/// Global configuration for the `SafeMom` orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafeMomConfig {
    /// Execution context used to resolve the base URL.
    pub context: ExecutionContext,
    /// Per-attempt timeout.
    pub timeout: Duration,
    /// Retry budget shared across all failure categories.
    pub retry: RetryConfig,
    /// Treatment of 401 responses.
    pub unauthorized: UnauthorizedPolicy,
    /// Send the preview-deployment protection bypass header when a preview
    /// deployment is detected.
    pub preview_bypass: bool,
    /// Headers added to every request; per-request headers override these.
    pub default_headers: BTreeMap<String, String>,
}

impl Default for SafeMomConfig {
    fn default() -> Self {
        Self {
            context: ExecutionContext::default(),
            timeout: Duration::from_secs(30),
            retry: RetryConfig::default(),
            unauthorized: UnauthorizedPolicy::default(),
            preview_bypass: false,
            default_headers: BTreeMap::new(),
        }
    }
}
