//! SafeMom checks consumer products for pregnancy safety through a small
//! backend of analysis routes.
//!
//! Overview
//! - `SafeMom` performs one resilient JSON exchange per call: per-attempt
//!   timeout, a retry budget shared by every transient failure, exponential
//!   backoff, HTML sniffing with error-pattern classification, and diagnostics.
//! - `Wizard` is a pure four-step state machine (identify, find ingredients,
//!   analyze, results) with short-circuits for unidentifiable images and
//!   alcoholic products.
//! - `AnalysisSession` drives the wizard against the orchestrator and keeps a
//!   ten-entry, newest-first saved-search history.
//!
//! Key behaviors and trade-offs
//! - Failures are values: the orchestrator returns `RequestOutcome<T>` and never
//!   panics; the wizard parks on the current step and keeps the retry available.
//! - 4xx answers are final, 5xx answers (JSON or HTML), unparsable bodies,
//!   timeouts and network errors are retried until the budget runs out.
//! - A network error while the client reports itself offline is returned
//!   immediately without consuming a retry.
//! - 401 responses are parsed anyway under the default lenient policy.
//!
//! Examples
//! Building an orchestrator and running the wizard:
//! ```rust,ignore
//! use std::sync::Arc;
//! use safemom::{AnalysisSession, SafeMom, SearchHistory};
//!
//! let client = SafeMom::builder()
//!     .with_transport(Arc::new(ReqwestTransport::new()?))
//!     .origin("https://safemom.app")
//!     .build()?;
//! let mut session = AnalysisSession::new(Arc::new(client), SearchHistory::in_memory());
//! session.select_image(image, None);
//! session.identify().await?;
//! session.find_ingredients().await?;
//! session.analyze().await?;
//! let saved = session.save()?;
//! ```
//!
//! See `demos/examples/` for runnable end-to-end demonstrations.
#![warn(missing_docs)]

pub(crate) mod core;
/// Retry loop, response interpretation, and backoff helpers.
pub mod orchestrator;
pub mod wizard;

pub use crate::core::{SafeMom, SafeMomBuilder};
pub use orchestrator::PREVIEW_BYPASS_HEADER;
pub use orchestrator::backoff::{backoff_delay_ms, jitter_wait, retry_wait};
pub use wizard::{
    Action, AnalysisSession, Blocker, Call, CallRequest, Event, Step, StepError, StepErrorKind, Wizard,
    WizardError, is_unidentifiable,
};

// Re-export core types for convenience
pub use safemom_core::{
    AlwaysOnline, AnalysisResult, AnalyzeIngredients, AnalyzeRequest, Connectivity,
    ConnectivityFlag, Delivered, Diagnostics, Endpoint, ErrorPatternInfo, ExecutionContext,
    FindIngredients, HarmfulIngredient, IdentifyProduct, IdentifyRequest, IdentifyResponse,
    ImageRef, IngredientsRequest, IngredientsResponse, JsonFileStore, MemoryStore, Method, Ping,
    PingResponse, RequestDescriptor, RequestError, RequestFailure, RequestOutcome, RetryConfig,
    SafeMomConfig, SafeMomError, SafetyReport, SearchHistory, SearchStore, Transport,
    TransportError, TransportRequest, TransportResponse, UnauthorizedPolicy,
};
