use std::time::Duration;

use safemom_types::{
    Diagnostics, ErrorPatternInfo, ExecutionContext, RequestError, RequestFailure, RetryConfig,
    SafeMomConfig, UnauthorizedPolicy,
};

#[test]
fn default_config_matches_documented_values() {
    let cfg = SafeMomConfig::default();
    assert_eq!(cfg.timeout, Duration::from_secs(30));
    assert_eq!(cfg.retry.max_retries, 2);
    assert_eq!(cfg.retry.base_delay_ms, 1000);
    assert_eq!(cfg.retry.jitter_percent, 0);
    assert_eq!(cfg.unauthorized, UnauthorizedPolicy::Lenient);
    assert!(!cfg.preview_bypass);
    assert_eq!(cfg.context, ExecutionContext::Server);
}

#[test]
fn config_roundtrip() {
    let cfg = SafeMomConfig {
        context: ExecutionContext::Browser {
            origin: "https://safemom.app".into(),
        },
        timeout: Duration::from_millis(2500),
        retry: RetryConfig {
            max_retries: 4,
            base_delay_ms: 250,
            jitter_percent: 10,
        },
        unauthorized: UnauthorizedPolicy::Strict,
        preview_bypass: true,
        default_headers: [("x-client".to_string(), "cli".to_string())].into(),
    };

    let json = serde_json::to_string(&cfg).expect("serialize config");
    let de: SafeMomConfig = serde_json::from_str(&json).expect("deserialize config");

    assert_eq!(de.timeout.as_millis(), 2500);
    assert_eq!(de.retry, cfg.retry);
    assert_eq!(de.unauthorized, UnauthorizedPolicy::Strict);
    assert_eq!(de.context, cfg.context);
    assert_eq!(de.default_headers.get("x-client").map(String::as_str), Some("cli"));
}

#[test]
fn failure_messages_are_stable() {
    assert_eq!(
        RequestFailure::Timeout.to_string(),
        "Request timed out. Please try again later."
    );
    assert_eq!(
        RequestFailure::HtmlPage {
            status: 503,
            pattern: None
        }
        .to_string(),
        "Server returned HTML instead of JSON. Status: 503"
    );
    let pattern = ErrorPatternInfo {
        name: "Payload Too Large".into(),
        description: "Request body is too big".into(),
        solution: "Shrink the image".into(),
    };
    assert_eq!(
        RequestFailure::HtmlPage {
            status: 413,
            pattern: Some(pattern)
        }
        .to_string(),
        "Payload Too Large: Request body is too big"
    );
    assert_eq!(RequestFailure::Network("dns".into()).category(), "network-error");
}

#[test]
fn request_error_reports_bad_request_from_diagnostics() {
    let diagnostics = Diagnostics {
        status_code: Some(400),
        ..Diagnostics::for_url("http://localhost:3000/api/identify-product", 0)
    };
    let err = RequestError::with_diagnostics(
        RequestFailure::Http {
            status: 400,
            message: "Invalid image URL format".into(),
        },
        diagnostics,
    );
    assert!(err.is_bad_request());
    assert_eq!(err.to_string(), "Invalid image URL format");

    let json = serde_json::to_value(&err).expect("serialize error");
    assert_eq!(json["diagnostics"]["statusCode"], 400);
    assert_eq!(json["diagnostics"]["retryAttempt"], 0);
}
