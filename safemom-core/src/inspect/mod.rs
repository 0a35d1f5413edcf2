//! Response inspection: HTML sniffing, page summaries and URL breakdowns used
//! to build diagnostics.

mod patterns;

use std::sync::LazyLock;

use regex::Regex;

pub use patterns::{
    COMMON_ERROR_PATTERNS, ErrorPattern, ResponseFacts, detect_error_pattern, solution_for_status,
};

use crate::transport::TransportResponse;

const SNIPPET_LIMIT: usize = 200;

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<title>(.*?)</title>").expect("valid regex"));
static PRE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<pre.*?>(.*?)</pre>").expect("valid regex"));
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

/// True when the content type announces an HTML document.
#[must_use]
pub fn is_html(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| ct.to_ascii_lowercase().contains("text/html"))
}

/// Summarize an HTML error page as pretty-printed JSON:
/// `{title, errorType, statusCode, errorText}`.
#[must_use]
pub fn inspect_html(status: u16, html: &str) -> String {
    let title = TITLE_RE
        .captures(html)
        .and_then(|c| c.get(1))
        .map_or("Unknown page", |m| m.as_str());

    let error_text = PRE_RE
        .captures(html)
        .and_then(|c| c.get(1))
        .map_or_else(
            || "No specific error found".to_string(),
            |m| TAG_RE.replace_all(m.as_str(), "").into_owned(),
        );

    let is_404 = title.contains("404") || html.contains("page not found");
    let is_500 = title.contains("500") || html.contains("server error");
    let is_auth = html.contains("signin") || html.contains("auth");
    let error_type = if is_404 {
        "404 Page"
    } else if is_500 {
        "500 Server Error"
    } else if is_auth {
        "Auth Page"
    } else {
        "Unknown HTML"
    };

    let summary = serde_json::json!({
        "title": title,
        "errorType": error_type,
        "statusCode": status,
        "errorText": truncate_snippet(&error_text),
    });
    serde_json::to_string_pretty(&summary).unwrap_or_else(|_| summary.to_string())
}

fn truncate_snippet(text: &str) -> String {
    if text.chars().count() > SNIPPET_LIMIT {
        let head: String = text.chars().take(SNIPPET_LIMIT).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

/// Pretty-printed JSON breakdown of a URL, or `Invalid URL: <url>`.
#[must_use]
pub fn url_details(raw: &str) -> String {
    let Ok(parsed) = url::Url::parse(raw) else {
        return format!("Invalid URL: {raw}");
    };
    let host = match (parsed.host_str(), parsed.port()) {
        (Some(h), Some(p)) => format!("{h}:{p}"),
        (Some(h), None) => h.to_string(),
        (None, _) => String::new(),
    };
    let details = serde_json::json!({
        "protocol": format!("{}:", parsed.scheme()),
        "host": host,
        "pathname": parsed.path(),
        "search": parsed.query().map(|q| format!("?{q}")).unwrap_or_default(),
        "hash": parsed.fragment().map(|f| format!("#{f}")).unwrap_or_default(),
        "isAbsolute": raw.starts_with("http"),
    });
    serde_json::to_string_pretty(&details).unwrap_or_else(|_| details.to_string())
}

/// Size reported for diagnostics: `Content-Length` if present, else the body length.
#[must_use]
pub fn response_size(response: &TransportResponse) -> u64 {
    response
        .content_length
        .unwrap_or(response.body.len() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_detection_ignores_case_and_params() {
        assert!(is_html(Some("text/html; charset=utf-8")));
        assert!(is_html(Some("TEXT/HTML")));
        assert!(!is_html(Some("application/json")));
        assert!(!is_html(None));
    }

    #[test]
    fn inspection_extracts_title_and_pre_block() {
        let html = "<html><head><title>500: Internal Server Error</title></head>\
                    <body><pre class=\"x\"><b>TypeError</b>: boom</pre></body></html>";
        let summary: serde_json::Value =
            serde_json::from_str(&inspect_html(500, html)).expect("summary is json");
        assert_eq!(summary["title"], "500: Internal Server Error");
        assert_eq!(summary["errorType"], "500 Server Error");
        assert_eq!(summary["statusCode"], 500);
        assert_eq!(summary["errorText"], "TypeError: boom");
    }

    #[test]
    fn inspection_defaults_and_truncation() {
        let long = "x".repeat(250);
        let html = format!("<pre>{long}</pre>");
        let summary: serde_json::Value =
            serde_json::from_str(&inspect_html(200, &html)).expect("summary is json");
        assert_eq!(summary["title"], "Unknown page");
        assert_eq!(summary["errorType"], "Unknown HTML");
        let text = summary["errorText"].as_str().unwrap_or_default();
        assert_eq!(text.len(), 203);
        assert!(text.ends_with("..."));

        let auth: serde_json::Value =
            serde_json::from_str(&inspect_html(200, "<a href=/signin>Sign in</a>"))
                .expect("summary is json");
        assert_eq!(auth["errorType"], "Auth Page");
        assert_eq!(auth["errorText"], "No specific error found");
    }

    #[test]
    fn url_details_breakdown() {
        let d: serde_json::Value = serde_json::from_str(&url_details(
            "http://localhost:3000/api/find-ingredients?x=1#frag",
        ))
        .expect("details are json");
        assert_eq!(d["protocol"], "http:");
        assert_eq!(d["host"], "localhost:3000");
        assert_eq!(d["pathname"], "/api/find-ingredients");
        assert_eq!(d["search"], "?x=1");
        assert_eq!(d["hash"], "#frag");
        assert_eq!(d["isAbsolute"], true);

        assert_eq!(url_details("/relative"), "Invalid URL: /relative");
    }
}
