//! Debugging metadata attached to request outcomes.

use serde::{Deserialize, Serialize};

/// Serializable summary of a matched error pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPatternInfo {
    /// Short pattern name, e.g. "Gateway Timeout".
    pub name: String,
    /// What the pattern usually means.
    pub description: String,
    /// Suggested fix.
    pub solution: String,
}

/// Metadata describing how a request ended.
///
/// Exists for human debugging. Control flow only ever looks at
/// `status_code == 400`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostics {
    /// Fully resolved request URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// JSON rendering of the parsed URL components.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_details: Option<String>,
    /// HTTP status of the last response, if one was received.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    /// `Content-Type` of the last response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Inspection summary when the server returned HTML.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_response: Option<String>,
    /// Response size in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_size: Option<u64>,
    /// Number of retries consumed when the outcome was produced.
    pub retry_attempt: u32,
    /// Matched error pattern, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_pattern: Option<ErrorPatternInfo>,
}

impl Diagnostics {
    /// Diagnostics carrying only the URL and retry attempt.
    pub fn for_url(url: impl Into<String>, retry_attempt: u32) -> Self {
        Self {
            url: Some(url.into()),
            retry_attempt,
            ..Self::default()
        }
    }
}
