use safemom_types::ErrorPatternInfo;

/// Facts about a response that error patterns are matched against.
#[derive(Debug, Clone, Copy)]
pub struct ResponseFacts<'a> {
    /// HTTP status.
    pub status: u16,
    /// The response was reached through a redirect.
    pub redirected: bool,
    /// Body text when the response was HTML.
    pub html: Option<&'a str>,
}

impl ResponseFacts<'_> {
    fn html_contains(&self, needle: &str) -> bool {
        self.html.is_some_and(|h| h.contains(needle))
    }
}

/// A known infrastructure failure signature with a suggested fix.
#[derive(Debug, Clone, Copy)]
pub struct ErrorPattern {
    /// Short name.
    pub name: &'static str,
    /// What the pattern usually means.
    pub description: &'static str,
    /// Suggested fix.
    pub solution: &'static str,
    detect: fn(&ResponseFacts<'_>) -> bool,
}

impl ErrorPattern {
    /// Whether this pattern matches the response.
    #[must_use]
    pub fn matches(&self, facts: &ResponseFacts<'_>) -> bool {
        (self.detect)(facts)
    }

    /// Owned, serializable summary.
    #[must_use]
    pub fn info(&self) -> ErrorPatternInfo {
        ErrorPatternInfo {
            name: self.name.to_string(),
            description: self.description.to_string(),
            solution: self.solution.to_string(),
        }
    }
}

/// Known patterns, checked in order; the first match wins.
pub const COMMON_ERROR_PATTERNS: &[ErrorPattern] = &[
    ErrorPattern {
        name: "Redirect Loop",
        description: "The request reached the API but was redirected (missing trailing slash or auth middleware)",
        solution: "Follow redirects when fetching or correct the URL path",
        detect: |f| f.status == 302 || f.redirected,
    },
    ErrorPattern {
        name: "Route Not Found",
        description: "The API route path is wrong or deployed under the wrong directory",
        solution: "Check that the route exists at the requested path",
        detect: |f| {
            f.status == 404
                && (f.html_contains("NEXT_NOT_FOUND") || f.html_contains("This page could not be found"))
        },
    },
    ErrorPattern {
        name: "Server Error",
        description: "An uncaught exception in the API route (JSON parse error, runtime limit, upstream model error)",
        solution: "Check server logs and return JSON errors from the handler",
        detect: |f| {
            f.status == 500 && (f.html_contains("Server Error") || f.html_contains("Application error"))
        },
    },
    ErrorPattern {
        name: "Payload Too Large",
        description: "Request body (e.g. a base64 image) is too big for the route runtime",
        solution: "Raise the body size limit or upload the image to storage and send its URL",
        detect: |f| f.status == 413,
    },
    ErrorPattern {
        name: "Gateway Timeout",
        description: "The upstream model provider timed out or the edge network failed",
        solution: "Retry with exponential back-off; increase the upstream client timeout",
        detect: |f| matches!(f.status, 502 | 504 | 524),
    },
];

/// Classify a response against [`COMMON_ERROR_PATTERNS`].
#[must_use]
pub fn detect_error_pattern(facts: &ResponseFacts<'_>) -> Option<&'static ErrorPattern> {
    COMMON_ERROR_PATTERNS.iter().find(|p| p.matches(facts))
}

/// Human-readable guidance for a non-success status.
#[must_use]
pub fn solution_for_status(status: u16) -> String {
    match status {
        302 => "Redirect detected. Follow redirects when fetching or fix the URL path.".to_string(),
        404 => "API route not found. Check that the route exists at the requested path.".to_string(),
        413 => "Payload too large. Raise the body size limit or send a smaller image.".to_string(),
        500 => "Server error. Check server logs for uncaught exceptions.".to_string(),
        502 | 504 | 524 => "Gateway timeout. Retry with exponential back-off.".to_string(),
        other => format!("Unexpected status code: {other}. Check server logs."),
    }
}
