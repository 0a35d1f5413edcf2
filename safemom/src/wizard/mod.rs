//! The four-step analysis wizard: identify, find ingredients, analyze, results.
//!
//! `machine` holds the pure state machine; `controller` drives it against the
//! orchestrator and the saved-search history.

pub mod controller;
pub mod denylist;
pub mod machine;

pub use controller::{AnalysisSession, WizardError};
pub use denylist::{UNIDENTIFIABLE_PHRASES, is_unidentifiable};
pub use machine::{Action, Blocker, Call, CallRequest, Event, Step, StepError, StepErrorKind, Wizard};
