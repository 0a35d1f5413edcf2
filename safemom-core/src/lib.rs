//! safemom-core
//!
//! Core contracts and utilities shared across the SafeMom crates.
//!
//! - `transport`: the `Transport` seam every network backend implements.
//! - `request`: `RequestDescriptor`, `Delivered`, and `RequestOutcome`.
//! - `endpoint`: typed templates for the backend analysis routes.
//! - `inspect`: HTML sniffing, error-pattern classification, URL breakdowns.
//! - `environment`: base-URL resolution and preview detection.
//! - `store`: saved-search persistence behind the `SearchStore` trait.
//!
//! Async runtime
//! -------------
//! Nothing here spawns tasks or sleeps. `Transport::send` is an `async_trait`
//! method; the orchestrator in the `safemom` crate drives it under Tokio.
//!
#![warn(missing_docs)]

/// Online/offline signal consulted before retrying network failures.
pub mod connectivity;
pub mod endpoint;
pub mod environment;
/// Data-URL helpers for uploaded images.
pub mod image;
pub mod inspect;
/// Request descriptors and outcomes.
pub mod request;
pub mod store;
/// Transport contract and raw request/response shapes.
pub mod transport;

pub use connectivity::{AlwaysOnline, Connectivity, ConnectivityFlag};
pub use endpoint::{
    AnalyzeIngredients, Endpoint, FindIngredients, IdentifyProduct, Ping, PingResponse,
};
pub use environment::{EnvLookup, is_preview_deployment, join_url, process_env, resolve_base_url};
pub use image::{data_url_from_bytes, decode_data_url};
pub use request::{DEFAULT_TIMEOUT, Delivered, RequestDescriptor, RequestOutcome};
pub use store::{JsonFileStore, MemoryStore, SAVED_SEARCHES_KEY, SearchHistory, SearchStore};
pub use transport::{Method, Transport, TransportError, TransportRequest, TransportResponse};

pub use safemom_types::*;
