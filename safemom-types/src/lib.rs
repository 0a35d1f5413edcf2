//! SafeMom data transfer objects, configuration primitives, and the request
//! failure taxonomy shared by every crate in the workspace.
#![warn(missing_docs)]

mod analysis;
mod config;
mod diagnostics;
mod error;
mod history;

pub use analysis::{
    AnalysisResult, AnalyzeRequest, HarmfulIngredient, IdentifyRequest, IdentifyResponse,
    ImageRef, IngredientsRequest, IngredientsResponse, PLACEHOLDER_IMAGE, SafetyReport,
};
pub use config::{ExecutionContext, RetryConfig, SafeMomConfig, UnauthorizedPolicy};
pub use diagnostics::{Diagnostics, ErrorPatternInfo};
pub use error::{RequestError, RequestFailure, SafeMomError};
pub use history::{BoundedHistory, DEFAULT_HISTORY_CAPACITY, SavedSearches};
