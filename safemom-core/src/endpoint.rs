//! Typed request templates for the backend analysis routes.
//!
//! Each template pairs a route with its request and response shapes so callers
//! never hand-assemble paths or JSON.

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use safemom_types::{
    AnalyzeRequest, IdentifyRequest, IdentifyResponse, IngredientsRequest, IngredientsResponse,
    SafetyReport,
};

use crate::transport::Method;

/// A backend route with a fixed JSON contract.
pub trait Endpoint {
    /// Route path, starting with `/`.
    const PATH: &'static str;
    /// HTTP method.
    const METHOD: Method = Method::Post;
    /// Short label used in logs.
    const LABEL: &'static str;

    /// Request body type.
    type Request: Serialize + Send + Sync;
    /// Successful response body type.
    type Response: DeserializeOwned + Send;
}

/// Identify brand and product name from an image.
#[derive(Debug, Clone, Copy)]
pub struct IdentifyProduct;

impl Endpoint for IdentifyProduct {
    const PATH: &'static str = "/api/identify-product";
    const LABEL: &'static str = "identify";
    type Request = IdentifyRequest;
    type Response = IdentifyResponse;
}

/// Enumerate likely ingredients for a named product.
#[derive(Debug, Clone, Copy)]
pub struct FindIngredients;

impl Endpoint for FindIngredients {
    const PATH: &'static str = "/api/find-ingredients";
    const LABEL: &'static str = "find-ingredients";
    type Request = IngredientsRequest;
    type Response = IngredientsResponse;
}

/// Classify ingredients as pregnancy-safe or not.
#[derive(Debug, Clone, Copy)]
pub struct AnalyzeIngredients;

impl Endpoint for AnalyzeIngredients {
    const PATH: &'static str = "/api/analyze-ingredients";
    const LABEL: &'static str = "analyze-ingredients";
    type Request = AnalyzeRequest;
    type Response = SafetyReport;
}

/// Reachability check.
#[derive(Debug, Clone, Copy)]
pub struct Ping;

/// Body returned by the ping route.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingResponse {
    /// Free-form status string, usually "ok".
    #[serde(default)]
    pub status: Option<String>,
}

impl Endpoint for Ping {
    const PATH: &'static str = "/api/ping";
    const METHOD: Method = Method::Get;
    const LABEL: &'static str = "ping";
    type Request = ();
    type Response = PingResponse;
}
