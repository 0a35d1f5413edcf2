//! The retry loop behind every backend call.
//!
//! One logical request becomes at most `retries + 1` transport attempts. Every
//! attempt is classified into a verdict; transient verdicts consume the shared
//! retry budget, everything else ends the call.

pub mod backoff;

use std::collections::BTreeMap;

use safemom_core::inspect::{
    ResponseFacts, detect_error_pattern, inspect_html, is_html, response_size,
    solution_for_status, url_details,
};
use safemom_core::{
    AnalyzeIngredients, Delivered, Diagnostics, Endpoint, FindIngredients, IdentifyProduct,
    Ping, PingResponse, RequestDescriptor, RequestError, RequestFailure, RequestOutcome,
    TransportError, TransportRequest, TransportResponse, UnauthorizedPolicy, join_url,
};
use safemom_types::{
    AnalyzeRequest, IdentifyRequest, IdentifyResponse, ImageRef, IngredientsRequest,
    IngredientsResponse, SafeMomError, SafetyReport,
};
use serde::de::DeserializeOwned;

use crate::SafeMom;
use backoff::retry_wait;

/// Header carrying the preview-protection bypass flag.
pub const PREVIEW_BYPASS_HEADER: &str = "x-vercel-protection-bypass";

/// Classification of a single attempt.
#[derive(Debug)]
pub(crate) enum Verdict<T> {
    /// Final: success or a non-retryable failure.
    Done(RequestOutcome<T>),
    /// Transient failure; retried while budget remains, returned otherwise.
    Retryable(RequestError),
}

fn base_diagnostics(url: &str, retry_attempt: u32) -> Diagnostics {
    Diagnostics {
        url_details: Some(url_details(url)),
        ..Diagnostics::for_url(url, retry_attempt)
    }
}

/// Interpret one transport response.
///
/// HTML bodies never reach the JSON decoder. A 401 under the lenient policy is
/// decoded like a success.
pub(crate) fn interpret<T: DeserializeOwned>(
    url: &str,
    response: &TransportResponse,
    retry_attempt: u32,
    unauthorized: UnauthorizedPolicy,
) -> Verdict<T> {
    let status = response.status;
    let mut diagnostics = Diagnostics {
        status_code: Some(status),
        content_type: response.content_type.clone(),
        response_size: Some(response_size(response)),
        ..base_diagnostics(url, retry_attempt)
    };

    if status == 401 && matches!(unauthorized, UnauthorizedPolicy::Lenient) {
        return Verdict::Done(match serde_json::from_slice::<T>(&response.body) {
            Ok(data) => Ok(Delivered { data, diagnostics }),
            Err(_) => Err(RequestError::with_diagnostics(
                RequestFailure::Unauthorized,
                diagnostics,
            )),
        });
    }

    if is_html(response.content_type.as_deref()) {
        let html = response.text();
        let facts = ResponseFacts {
            status,
            redirected: response.redirected,
            html: Some(&html),
        };
        let pattern = detect_error_pattern(&facts).map(|p| p.info());
        diagnostics.html_response = Some(inspect_html(status, &html));
        diagnostics.error_pattern.clone_from(&pattern);
        let err = RequestError::with_diagnostics(
            RequestFailure::HtmlPage { status, pattern },
            diagnostics,
        );
        return if status >= 500 || status == 0 {
            Verdict::Retryable(err)
        } else {
            Verdict::Done(Err(err))
        };
    }

    let value: serde_json::Value = match serde_json::from_slice(&response.body) {
        Ok(v) => v,
        Err(_) => {
            return Verdict::Retryable(RequestError::with_diagnostics(
                RequestFailure::JsonParse,
                diagnostics,
            ));
        }
    };

    if !response.is_success() {
        let message = value
            .get("error")
            .and_then(serde_json::Value::as_str)
            .map_or_else(|| solution_for_status(status), str::to_string);
        let err =
            RequestError::with_diagnostics(RequestFailure::Http { status, message }, diagnostics);
        return if status >= 500 {
            Verdict::Retryable(err)
        } else {
            Verdict::Done(Err(err))
        };
    }

    // Well-formed JSON of the wrong shape is the backend's answer; asking again
    // would only repeat it.
    Verdict::Done(match serde_json::from_value::<T>(value) {
        Ok(data) => Ok(Delivered { data, diagnostics }),
        Err(_) => Err(RequestError::with_diagnostics(
            RequestFailure::JsonParse,
            diagnostics,
        )),
    })
}

impl SafeMom {
    /// Final header set for `request`: JSON defaults, the preview bypass flag when
    /// active, configured defaults, then per-request headers.
    pub(crate) fn headers_for(&self, request: &RequestDescriptor) -> BTreeMap<String, String> {
        let mut headers = BTreeMap::from([
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Accept".to_string(), "application/json".to_string()),
            ("Cache-Control".to_string(), "no-store".to_string()),
        ]);
        if self.preview_bypass_active() {
            headers.insert(PREVIEW_BYPASS_HEADER.to_string(), "true".to_string());
        }
        headers.extend(self.cfg.default_headers.clone());
        headers.extend(request.headers().clone());
        headers
    }

    /// Perform one logical request with timeout, retry with exponential backoff,
    /// HTML sniffing and diagnostics.
    ///
    /// Behavior:
    /// - Each attempt is bounded by the effective timeout.
    /// - HTML, unparsable bodies, 5xx statuses, timeouts and network errors share one
    ///   retry counter; retry `i` waits `base_delay * 2^i` (plus optional jitter).
    /// - A network error while the client reports itself offline returns
    ///   [`RequestFailure::Offline`] immediately without consuming a retry.
    /// - Never panics; every failure is returned as a [`RequestError`].
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "safemom::execute",
            skip(self, request),
            fields(
                url = tracing::field::Empty,
                method = %request.method(),
                timeout_ms = u64::try_from(request.effective_timeout(self.cfg.timeout).as_millis()).unwrap_or(u64::MAX),
                retries = request.effective_retry(self.cfg.retry).max_retries,
            ),
        )
    )]
    pub async fn execute<T: DeserializeOwned>(&self, request: RequestDescriptor) -> RequestOutcome<T> {
        let url = join_url(&self.base_url(), request.path());
        let timeout = request.effective_timeout(self.cfg.timeout);
        let retry = request.effective_retry(self.cfg.retry);
        let headers = self.headers_for(&request);

        #[cfg(feature = "tracing")]
        tracing::Span::current().record("url", url.as_str());

        let mut retry_count: u32 = 0;
        loop {
            let outgoing = TransportRequest {
                url: url.clone(),
                method: request.method(),
                headers: headers.clone(),
                body: request.payload().cloned(),
            };

            let verdict = match tokio::time::timeout(timeout, self.transport.send(outgoing)).await {
                Ok(Ok(response)) => interpret::<T>(&url, &response, retry_count, self.cfg.unauthorized),
                Ok(Err(TransportError::Timeout)) | Err(_) => Verdict::Retryable(
                    RequestError::with_diagnostics(
                        RequestFailure::Timeout,
                        base_diagnostics(&url, retry_count),
                    ),
                ),
                Ok(Err(TransportError::Network(msg))) => {
                    if !self.connectivity.is_online() {
                        #[cfg(feature = "tracing")]
                        tracing::warn!(error = %msg, "client offline; not retrying");
                        return Err(RequestError::new(RequestFailure::Offline));
                    }
                    Verdict::Retryable(RequestError::with_diagnostics(
                        RequestFailure::Network(msg),
                        base_diagnostics(&url, retry_count),
                    ))
                }
            };

            match verdict {
                Verdict::Done(outcome) => {
                    #[cfg(feature = "tracing")]
                    if let Err(err) = &outcome {
                        tracing::warn!(
                            category = err.failure.category(),
                            status = ?err.status_code(),
                            retry_attempt = retry_count,
                            "request failed"
                        );
                    }
                    return outcome;
                }
                Verdict::Retryable(_err) if retry_count < retry.max_retries => {
                    let wait = retry_wait(retry.base_delay_ms, retry_count, retry.jitter_percent);
                    retry_count += 1;
                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        attempt = retry_count,
                        category = _err.failure.category(),
                        delay_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX),
                        "retrying after transient failure"
                    );
                    tokio::time::sleep(wait).await;
                }
                Verdict::Retryable(err) => {
                    #[cfg(feature = "tracing")]
                    tracing::error!(
                        category = err.failure.category(),
                        retry_attempt = retry_count,
                        "retry budget exhausted"
                    );
                    return Err(err);
                }
            }
        }
    }

    /// Run a typed endpoint template through [`Self::execute`].
    ///
    /// # Errors
    /// Returns `Data` when the request body cannot be serialized and `Request`
    /// for every orchestrated failure.
    pub async fn call<E: Endpoint>(
        &self,
        body: &E::Request,
    ) -> Result<Delivered<E::Response>, SafeMomError> {
        let descriptor = RequestDescriptor::new(E::METHOD, E::PATH)
            .json(body)
            .map_err(|e| SafeMomError::Data(format!("encode {} request: {e}", E::LABEL)))?;
        Ok(self.execute::<E::Response>(descriptor).await?)
    }

    /// Check backend reachability with `GET /api/ping`.
    ///
    /// # Errors
    /// Returns the orchestrated failure when the backend cannot be reached.
    pub async fn ping(&self) -> Result<Delivered<PingResponse>, SafeMomError> {
        self.call::<Ping>(&()).await
    }

    /// Identify the product shown in `image`.
    pub async fn identify_product(&self, image: &ImageRef) -> RequestOutcome<IdentifyResponse> {
        let body = IdentifyRequest {
            image_url: image.clone(),
        };
        self.execute_template::<IdentifyProduct>(&body).await
    }

    /// Look up the ingredient list of `product_name`.
    pub async fn find_ingredients(&self, product_name: &str) -> RequestOutcome<IngredientsResponse> {
        let body = IngredientsRequest {
            product_name: product_name.to_string(),
        };
        self.execute_template::<FindIngredients>(&body).await
    }

    /// Classify `ingredients` as pregnancy-safe or not.
    pub async fn analyze_ingredients(&self, request: &AnalyzeRequest) -> RequestOutcome<SafetyReport> {
        self.execute_template::<AnalyzeIngredients>(request).await
    }

    /// Like [`Self::call`] but keeps the [`RequestOutcome`] shape. Request bodies of
    /// the built-in templates always serialize; a failure surfaces as a parse error.
    async fn execute_template<E: Endpoint>(&self, body: &E::Request) -> RequestOutcome<E::Response> {
        let descriptor = RequestDescriptor::new(E::METHOD, E::PATH)
            .json(body)
            .map_err(|_| RequestError::new(RequestFailure::JsonParse))?;
        self.execute::<E::Response>(descriptor).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "http://localhost:3000/api/identify-product";

    #[test]
    fn lenient_401_parses_body() {
        let resp = TransportResponse::json(401, &serde_json::json!({"product": "CeraVe"}));
        match interpret::<IdentifyResponse>(URL, &resp, 0, UnauthorizedPolicy::Lenient) {
            Verdict::Done(Ok(d)) => assert_eq!(d.data.product.as_deref(), Some("CeraVe")),
            other => panic!("unexpected verdict: {other:?}"),
        }
    }

    #[test]
    fn strict_401_is_http_error() {
        let resp = TransportResponse::json(401, &serde_json::json!({"error": "Unauthorized"}));
        match interpret::<IdentifyResponse>(URL, &resp, 0, UnauthorizedPolicy::Strict) {
            Verdict::Done(Err(e)) => {
                assert_eq!(e.to_string(), "Unauthorized");
                assert_eq!(e.status_code(), Some(401));
            }
            other => panic!("unexpected verdict: {other:?}"),
        }
    }

    #[test]
    fn html_4xx_is_final_and_5xx_retryable() {
        let page = TransportResponse::html(404, "<title>404</title>This page could not be found");
        match interpret::<IdentifyResponse>(URL, &page, 1, UnauthorizedPolicy::Lenient) {
            Verdict::Done(Err(e)) => {
                assert!(matches!(e.failure, RequestFailure::HtmlPage { status: 404, .. }));
                let d = e.diagnostics.expect("diagnostics");
                assert_eq!(d.retry_attempt, 1);
                assert_eq!(d.error_pattern.map(|p| p.name).as_deref(), Some("Route Not Found"));
                assert!(d.html_response.is_some());
            }
            other => panic!("unexpected verdict: {other:?}"),
        }
        let page = TransportResponse::html(503, "<title>Service Unavailable</title>");
        assert!(matches!(
            interpret::<IdentifyResponse>(URL, &page, 0, UnauthorizedPolicy::Lenient),
            Verdict::Retryable(_)
        ));
    }

    #[test]
    fn status_guidance_when_error_field_missing() {
        let resp = TransportResponse::json(404, &serde_json::json!({}));
        match interpret::<IdentifyResponse>(URL, &resp, 0, UnauthorizedPolicy::Lenient) {
            Verdict::Done(Err(e)) => assert!(e.to_string().starts_with("API route not found")),
            other => panic!("unexpected verdict: {other:?}"),
        }
    }

    #[test]
    fn garbage_body_is_retryable_parse_error() {
        let resp = TransportResponse {
            status: 200,
            content_type: Some("application/json".into()),
            body: b"{oops".to_vec(),
            ..TransportResponse::default()
        };
        match interpret::<IdentifyResponse>(URL, &resp, 0, UnauthorizedPolicy::Lenient) {
            Verdict::Retryable(e) => assert_eq!(e.failure, RequestFailure::JsonParse),
            other => panic!("unexpected verdict: {other:?}"),
        }
    }

    #[test]
    fn wrong_shape_json_is_a_final_parse_error() {
        let resp = TransportResponse::json(200, &serde_json::json!({"product": 42}));
        match interpret::<IdentifyResponse>(URL, &resp, 0, UnauthorizedPolicy::Lenient) {
            Verdict::Done(Err(e)) => {
                assert_eq!(e.failure, RequestFailure::JsonParse);
                assert_eq!(e.status_code(), Some(200));
            }
            other => panic!("unexpected verdict: {other:?}"),
        }
    }

    #[test]
    fn loose_safety_report_is_delivered() {
        let resp = TransportResponse::json(
            200,
            &serde_json::json!({"harmfulIngredients": [{"name": "Retinol"}], "isSafe": null}),
        );
        match interpret::<SafetyReport>(URL, &resp, 0, UnauthorizedPolicy::Lenient) {
            Verdict::Done(Ok(d)) => {
                assert!(!d.data.is_safe);
                assert_eq!(d.data.parsing_error, Some(true));
                assert_eq!(d.data.harmful_ingredients[0].name, "Retinol");
                assert!(d.data.harmful_ingredients[0].reason.is_empty());
            }
            other => panic!("unexpected verdict: {other:?}"),
        }
    }
}
