use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::diagnostics::{Diagnostics, ErrorPatternInfo};

/// Stable failure taxonomy for a single orchestrated request.
///
/// The `Display` output of each variant is the human-readable message shown to
/// users; it does not change between retries or transports.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum RequestFailure {
    /// The client reported itself offline after a network-level failure.
    #[error("You appear to be offline. Please check your internet connection and try again.")]
    Offline,

    /// Every attempt exceeded the configured timeout.
    #[error("Request timed out. Please try again later.")]
    Timeout,

    /// The transport failed before a response was received (DNS, refused, reset).
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with an HTML page where JSON was expected.
    #[error("{}", html_page_message(.status, .pattern))]
    HtmlPage {
        /// HTTP status of the HTML response.
        status: u16,
        /// Matched entry from the known error-pattern table, if any.
        pattern: Option<ErrorPatternInfo>,
    },

    /// The body could not be decoded as JSON.
    #[error("Failed to parse server response. Please try again later.")]
    JsonParse,

    /// The server answered with a non-success status.
    #[error("{message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Server-supplied `error` field, or guidance derived from the status.
        message: String,
    },

    /// A 401 response whose body could not be decoded either.
    #[error("API authentication issue. This may be a temporary problem.")]
    Unauthorized,
}

fn html_page_message(status: &u16, pattern: &Option<ErrorPatternInfo>) -> String {
    match pattern {
        Some(p) => format!("{}: {}", p.name, p.description),
        None => format!("Server returned HTML instead of JSON. Status: {status}"),
    }
}

impl RequestFailure {
    /// Short machine-friendly category label, used for logging.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Offline => "offline",
            Self::Timeout => "timeout",
            Self::Network(_) => "network-error",
            Self::HtmlPage { .. } => "html-page",
            Self::JsonParse => "json-parse-error",
            Self::Http { .. } => "http-error",
            Self::Unauthorized => "unauthorized",
        }
    }

    /// Returns true for failures caused by connectivity rather than the application.
    #[must_use]
    pub const fn is_connectivity(&self) -> bool {
        matches!(self, Self::Offline | Self::Timeout | Self::Network(_))
    }
}

/// A failed request outcome: the failure plus optional debugging metadata.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[error("{failure}")]
pub struct RequestError {
    /// What went wrong.
    pub failure: RequestFailure,
    /// Debugging metadata; absent for the offline short-circuit.
    pub diagnostics: Option<Diagnostics>,
}

impl RequestError {
    /// Build an error without diagnostics.
    #[must_use]
    pub const fn new(failure: RequestFailure) -> Self {
        Self {
            failure,
            diagnostics: None,
        }
    }

    /// Build an error carrying diagnostics.
    #[must_use]
    pub const fn with_diagnostics(failure: RequestFailure, diagnostics: Diagnostics) -> Self {
        Self {
            failure,
            diagnostics: Some(diagnostics),
        }
    }

    /// HTTP status reported in diagnostics, if one was observed.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        self.diagnostics.as_ref().and_then(|d| d.status_code)
    }

    /// True when the server rejected the request as malformed (HTTP 400).
    #[must_use]
    pub fn is_bad_request(&self) -> bool {
        self.status_code() == Some(400)
    }
}

/// Unified error type for everything outside a single orchestrated request.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SafeMomError {
    /// Invalid input argument or builder configuration.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// Reading or writing persisted state failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// Issues with returned or stored data (missing fields, bad JSON).
    #[error("data issue: {0}")]
    Data(String),

    /// A wizard action was invoked while it is disabled.
    #[error("action disabled: {action} ({reason})")]
    Disabled {
        /// Action label, e.g. "identify".
        action: String,
        /// Why the action is currently unavailable.
        reason: String,
    },

    /// An orchestrated request failed.
    #[error(transparent)]
    Request(#[from] RequestError),
}

impl SafeMomError {
    /// Helper: build a `Disabled` error.
    pub fn disabled(action: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Disabled {
            action: action.into(),
            reason: reason.into(),
        }
    }

    /// Helper: build a `Storage` error.
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}
