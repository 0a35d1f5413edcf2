//! Mock transports for SafeMom.
//!
//! - [`MockBackend`] answers the three analysis routes from a small, deterministic
//!   product catalogue. It needs no network and is what the demos run against.
//! - [`ScriptedTransport`] replays per-path behaviors queued through a
//!   [`ScriptController`], for tests that need exact control over each attempt.
//!
//! The special product names `FAIL` and `TIMEOUT` make [`MockBackend`] answer with
//! a framework error page or never answer at all.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use safemom_core::{
    AnalyzeIngredients, AnalyzeRequest, Endpoint, FindIngredients, IdentifyProduct,
    IdentifyRequest, IngredientsRequest, Ping, Transport, TransportError, TransportRequest,
    TransportResponse,
};

pub mod fixtures;
pub mod scripted;

pub use scripted::{MockBehavior, ScriptController, ScriptedTransport, path_of};

use fixtures::products;

/// Fixture-backed transport for CI-safe demos and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockBackend;

impl MockBackend {
    /// Create the backend.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn parse<B: DeserializeOwned>(request: &TransportRequest) -> Result<B, TransportResponse> {
        request
            .body
            .clone()
            .and_then(|b| serde_json::from_value(b).ok())
            .ok_or_else(|| fixtures::json_error(400, "Invalid request body"))
    }

    async fn special(name: &str) -> Option<TransportResponse> {
        match name {
            "FAIL" => Some(fixtures::pages::server_error_page()),
            "TIMEOUT" => {
                // Never answers; the orchestrator's timeout decides what happens.
                std::future::pending::<()>().await;
                None
            }
            _ => None,
        }
    }

    fn identify(request: &IdentifyRequest) -> TransportResponse {
        let image = request.image_url.as_str();
        if image.contains("unidentifiable") {
            return fixtures::identify_unidentifiable();
        }
        match products::by_image(image) {
            Some(p) => fixtures::identify_ok(p.name),
            None => fixtures::identify_ok("I don't know what this product is"),
        }
    }

    fn ingredients(request: &IngredientsRequest) -> TransportResponse {
        if request.product_name.trim().is_empty() {
            return fixtures::json_error(400, "Product name is required");
        }
        match products::by_name(&request.product_name) {
            Some(p) => fixtures::ingredients_ok(
                p.ingredients,
                p.alcohol_warning.is_some(),
                p.alcohol_warning,
                p.is_food,
            ),
            None => fixtures::ingredients_ok(&[], false, None, false),
        }
    }

    fn analyze(request: &AnalyzeRequest) -> TransportResponse {
        if request.ingredients.is_empty() {
            return fixtures::json_error(400, "No ingredients provided");
        }
        let harmful = products::harmful_in(&request.ingredients);
        fixtures::analysis_ok(&harmful, harmful.is_empty())
    }
}

#[async_trait]
impl Transport for MockBackend {
    fn name(&self) -> &'static str {
        "safemom-mock"
    }

    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let path = path_of(&request.url);
        let resp = if path == IdentifyProduct::PATH {
            match Self::parse::<IdentifyRequest>(&request) {
                Ok(req) => match Self::special(req.image_url.as_str()).await {
                    Some(resp) => resp,
                    None => Self::identify(&req),
                },
                Err(resp) => resp,
            }
        } else if path == FindIngredients::PATH {
            match Self::parse::<IngredientsRequest>(&request) {
                Ok(req) => match Self::special(&req.product_name).await {
                    Some(resp) => resp,
                    None => Self::ingredients(&req),
                },
                Err(resp) => resp,
            }
        } else if path == AnalyzeIngredients::PATH {
            match Self::parse::<AnalyzeRequest>(&request) {
                Ok(req) => match Self::special(&req.product_name).await {
                    Some(resp) => resp,
                    None => Self::analyze(&req),
                },
                Err(resp) => resp,
            }
        } else if path == Ping::PATH {
            TransportResponse::json(200, &serde_json::json!({ "status": "ok" }))
        } else {
            fixtures::pages::not_found_page()
        };
        Ok(resp)
    }
}
