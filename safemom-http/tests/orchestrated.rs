use std::sync::Arc;
use std::time::Duration;

use httpmock::prelude::*;
use safemom::{ExecutionContext, ImageRef, RequestFailure, SafeMom};
use safemom_http::ReqwestTransport;

fn client(server: &MockServer, retries: u32) -> SafeMom {
    SafeMom::builder()
        .with_transport(Arc::new(ReqwestTransport::new().expect("client")))
        .context(ExecutionContext::Browser {
            origin: server.base_url(),
        })
        .max_retries(retries)
        .retry_delay(Duration::from_millis(10))
        .build()
        .expect("safemom")
}

#[tokio::test]
async fn identify_round_trip_over_http() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/identify-product")
                .header("cache-control", "no-store")
                .json_body(serde_json::json!({ "imageUrl": "https://cdn.example/cerave.jpg" }));
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"product":"CeraVe Moisturizing Cream"}"#);
        })
        .await;

    let safemom = client(&server, 2);
    let delivered = safemom
        .identify_product(&ImageRef::new("https://cdn.example/cerave.jpg"))
        .await
        .expect("identified");

    mock.assert_async().await;
    assert_eq!(
        delivered.data.product.as_deref(),
        Some("CeraVe Moisturizing Cream")
    );
    assert_eq!(delivered.diagnostics.retry_attempt, 0);
    assert_eq!(delivered.diagnostics.status_code, Some(200));
}

#[tokio::test]
async fn html_server_error_is_retried_then_reported() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/find-ingredients");
            then.status(500)
                .header("content-type", "text/html; charset=utf-8")
                .body("<html><head><title>500: Internal Server Error</title></head><body>Application error</body></html>");
        })
        .await;

    let safemom = client(&server, 1);
    let err = safemom
        .find_ingredients("CeraVe Moisturizing Cream")
        .await
        .expect_err("html");

    mock.assert_calls_async(2).await;
    assert!(matches!(
        err.failure,
        RequestFailure::HtmlPage { status: 500, .. }
    ));
    let diag = err.diagnostics.expect("diagnostics");
    assert_eq!(diag.retry_attempt, 1);
    assert!(diag.content_type.unwrap_or_default().starts_with("text/html"));
    assert!(diag.response_size.unwrap_or_default() > 0);
}
