use std::fmt;

use safemom_core::{
    AnalysisResult, AnalyzeRequest, Diagnostics, HarmfulIngredient, IdentifyResponse, ImageRef,
    IngredientsResponse, RequestError, RequestFailure, RequestOutcome, SafetyReport,
};
use serde::{Deserialize, Serialize};

use super::denylist::is_unidentifiable;

/// Name of the harmful-ingredient record synthesized for alcoholic products.
pub const ALCOHOL_INGREDIENT: &str = "Alcohol (Ethanol)";
/// Reason attached to the synthesized alcohol record.
pub const ALCOHOL_REASON: &str = "Alcohol in skincare products can be absorbed through the skin. While the risk is lower than with consumption, it's generally recommended to avoid alcohol-containing products during pregnancy as a precaution.";
/// Warning shown when the backend flags alcohol without its own text.
pub const DEFAULT_ALCOHOL_WARNING: &str =
    "This product contains alcohol, which is generally recommended to avoid during pregnancy.";
/// Message shown with the unidentifiable outcome.
pub const UNIDENTIFIABLE_MESSAGE: &str = "I'm unable to identify this. Please try another image.";
/// Message shown when the ingredient lookup came back empty.
pub const NO_INGREDIENTS_MESSAGE: &str = "Failed to find ingredients. Please try again.";

/// The four ordinal wizard steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Step {
    /// Identify the product from the uploaded image.
    #[default]
    Identify = 1,
    /// Look up ingredients for the identified product.
    FindIngredients = 2,
    /// Classify the ingredients.
    AnalyzeSafety = 3,
    /// Show (and optionally save) the verdict.
    Results = 4,
}

impl Step {
    /// 1-based position of the step.
    #[must_use]
    pub const fn ordinal(self) -> u8 {
        self as u8
    }
}

/// Backend call a step performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Call {
    /// Identify-from-image.
    Identify,
    /// Find-ingredients.
    FindIngredients,
    /// Analyze-ingredients.
    Analyze,
}

impl Call {
    const fn label(self) -> &'static str {
        match self {
            Self::Identify => "identify",
            Self::FindIngredients => "find-ingredients",
            Self::Analyze => "analyze",
        }
    }

    const fn parse_error_message(self) -> &'static str {
        match self {
            Self::Identify => {
                "There was an error processing the image. Please try again or use a different image."
            }
            Self::FindIngredients | Self::Analyze => {
                "There was an error processing the request. Please try again."
            }
        }
    }

    const fn bad_request_message(self) -> &'static str {
        match self {
            Self::Identify => {
                "The server couldn't process this image. Please try a different image or format."
            }
            Self::FindIngredients => {
                "The server couldn't process this request. Please try again with a different product name."
            }
            Self::Analyze => "The server couldn't process these ingredients. Please try again.",
        }
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Why an action is currently unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blocker {
    /// Another call is still running.
    InFlight,
    /// The client reports itself offline.
    Offline,
    /// The wizard is on a different step.
    WrongStep(Step),
    /// No image has been selected.
    NoImage,
    /// The last image could not be identified; a new upload is required.
    Unidentifiable,
    /// No product name is known.
    NoProduct,
    /// No ingredients are known.
    NoIngredients,
    /// There is no verdict to save.
    NoResults,
    /// The verdict is already saved.
    AlreadySaved,
}

impl fmt::Display for Blocker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InFlight => f.write_str("A request is already in progress."),
            Self::Offline => f.write_str(
                "You appear to be offline. Please check your internet connection and try again.",
            ),
            Self::WrongStep(step) => write!(f, "Not available at step {}.", step.ordinal()),
            Self::NoImage => f.write_str("No image available. Please upload an image first."),
            Self::Unidentifiable => f.write_str(UNIDENTIFIABLE_MESSAGE),
            Self::NoProduct => {
                f.write_str("No product name available. Please identify the product first.")
            }
            Self::NoIngredients => {
                f.write_str("No ingredients available. Please find ingredients first.")
            }
            Self::NoResults => f.write_str("There are no results to save yet."),
            Self::AlreadySaved => f.write_str("This result is already saved."),
        }
    }
}

/// Flavor of a surfaced step error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepErrorKind {
    /// Any orchestrated failure without a dedicated message.
    Request,
    /// The response body could not be parsed.
    JsonParse,
    /// The server answered HTTP 400.
    BadRequest,
    /// The ingredient lookup came back empty.
    NoIngredients,
    /// Persisting the verdict failed.
    Save,
}

/// Error parked on the current step, with optional diagnostics for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepError {
    /// User-facing message.
    pub message: String,
    /// What kind of failure this is.
    pub kind: StepErrorKind,
    /// Request diagnostics, when the failure came from the orchestrator.
    pub diagnostics: Option<Diagnostics>,
}

/// Inputs to the wizard.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A new image was uploaded, optionally with a product name detected during upload.
    ImageSelected {
        /// Image reference.
        image: ImageRef,
        /// Product name detected while uploading.
        detected_product: Option<String>,
    },
    /// User pressed "identify".
    IdentifyRequested,
    /// Identify call finished.
    IdentifyCompleted(RequestOutcome<IdentifyResponse>),
    /// User pressed "find ingredients".
    FindIngredientsRequested,
    /// Find-ingredients call finished.
    FindIngredientsCompleted(RequestOutcome<IngredientsResponse>),
    /// User pressed "analyze".
    AnalyzeRequested,
    /// Analyze call finished.
    AnalyzeCompleted(RequestOutcome<SafetyReport>),
    /// The driver stopped waiting for `Call` before it completed.
    CallAbandoned(Call),
    /// Online status changed.
    ConnectivityChanged {
        /// New status.
        online: bool,
    },
    /// User pressed "save"; identity is supplied by the driver.
    SaveRequested {
        /// Record id.
        id: String,
        /// RFC 3339 timestamp.
        timestamp: String,
    },
    /// Persisting the record failed.
    SaveFailed {
        /// Storage error text.
        message: String,
    },
    /// A previously saved result was opened.
    SavedSearchSelected(AnalysisResult),
    /// The surfaced error was dismissed.
    DismissError,
    /// Start over.
    Reset,
}

impl Event {
    /// Short name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ImageSelected { .. } => "image-selected",
            Self::IdentifyRequested => "identify-requested",
            Self::IdentifyCompleted(_) => "identify-completed",
            Self::FindIngredientsRequested => "find-ingredients-requested",
            Self::FindIngredientsCompleted(_) => "find-ingredients-completed",
            Self::AnalyzeRequested => "analyze-requested",
            Self::AnalyzeCompleted(_) => "analyze-completed",
            Self::CallAbandoned(_) => "call-abandoned",
            Self::ConnectivityChanged { .. } => "connectivity-changed",
            Self::SaveRequested { .. } => "save-requested",
            Self::SaveFailed { .. } => "save-failed",
            Self::SavedSearchSelected(_) => "saved-search-selected",
            Self::DismissError => "dismiss-error",
            Self::Reset => "reset",
        }
    }
}

/// Backend call the driver must make; its completion event goes back to the wizard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallRequest {
    /// Call identify-from-image.
    Identify {
        /// Image to identify.
        image: ImageRef,
    },
    /// Call find-ingredients.
    FindIngredients {
        /// Product to look up.
        product_name: String,
    },
    /// Call analyze-ingredients.
    Analyze(AnalyzeRequest),
}

impl CallRequest {
    /// Which call this is.
    #[must_use]
    pub const fn call(&self) -> Call {
        match self {
            Self::Identify { .. } => Call::Identify,
            Self::FindIngredients { .. } => Call::FindIngredients,
            Self::Analyze(_) => Call::Analyze,
        }
    }
}

/// Side effects the driver must perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Make a backend call.
    Send(CallRequest),
    /// Persist the record to saved searches.
    Persist(AnalysisResult),
}

/// Four-step analysis wizard.
///
/// Pure: `handle` consumes the state and an event and returns the next state
/// plus the actions to run. Requests that are currently disabled leave the
/// state untouched and produce no actions.
#[derive(Debug, Clone, PartialEq)]
pub struct Wizard {
    step: Step,
    image: Option<ImageRef>,
    product: Option<String>,
    ingredients: Vec<String>,
    safety: Option<SafetyReport>,
    alcohol_warning: Option<String>,
    is_food: bool,
    unidentifiable: bool,
    json_parse_error: bool,
    bad_request: bool,
    in_flight: Option<Call>,
    online: bool,
    from_saved: bool,
    saved: bool,
    error: Option<StepError>,
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new()
    }
}

impl Wizard {
    /// Fresh wizard at step 1, online, with no image.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            step: Step::Identify,
            image: None,
            product: None,
            ingredients: Vec::new(),
            safety: None,
            alcohol_warning: None,
            is_food: false,
            unidentifiable: false,
            json_parse_error: false,
            bad_request: false,
            in_flight: None,
            online: true,
            from_saved: false,
            saved: false,
            error: None,
        }
    }

    /// Current step.
    #[must_use]
    pub const fn step(&self) -> Step {
        self.step
    }
    /// Selected image.
    #[must_use]
    pub const fn image(&self) -> Option<&ImageRef> {
        self.image.as_ref()
    }
    /// Identified product name.
    #[must_use]
    pub fn product(&self) -> Option<&str> {
        self.product.as_deref()
    }
    /// Ingredient list (ordered, may contain duplicates).
    #[must_use]
    pub fn ingredients(&self) -> &[String] {
        &self.ingredients
    }
    /// Safety verdict, once at `Results`.
    #[must_use]
    pub const fn safety(&self) -> Option<&SafetyReport> {
        self.safety.as_ref()
    }
    /// Alcohol warning text when the alcohol short-circuit fired.
    #[must_use]
    pub fn alcohol_warning(&self) -> Option<&str> {
        self.alcohol_warning.as_deref()
    }
    /// The product is a food.
    #[must_use]
    pub const fn is_food(&self) -> bool {
        self.is_food
    }
    /// The verdict came from a parsing fallback on the backend.
    #[must_use]
    pub fn parsing_error(&self) -> bool {
        self.safety
            .as_ref()
            .and_then(|s| s.parsing_error)
            .unwrap_or(false)
    }
    /// The last image could not be identified.
    #[must_use]
    pub const fn is_unidentifiable(&self) -> bool {
        self.unidentifiable
    }
    /// The last failure was an unparsable response.
    #[must_use]
    pub const fn has_json_parse_error(&self) -> bool {
        self.json_parse_error
    }
    /// The last failure was HTTP 400.
    #[must_use]
    pub const fn has_bad_request_error(&self) -> bool {
        self.bad_request
    }
    /// Call currently running, if any.
    #[must_use]
    pub const fn in_flight(&self) -> Option<Call> {
        self.in_flight
    }
    /// Whether the client is online.
    #[must_use]
    pub const fn is_online(&self) -> bool {
        self.online
    }
    /// The results were loaded from saved searches.
    #[must_use]
    pub const fn is_from_saved(&self) -> bool {
        self.from_saved
    }
    /// The results are saved.
    #[must_use]
    pub const fn is_saved(&self) -> bool {
        self.saved
    }
    /// Error parked on the current step.
    #[must_use]
    pub const fn error(&self) -> Option<&StepError> {
        self.error.as_ref()
    }

    fn common_blocker(&self, step: Step) -> Option<Blocker> {
        if self.in_flight.is_some() {
            Some(Blocker::InFlight)
        } else if !self.online {
            Some(Blocker::Offline)
        } else if self.step != step {
            Some(Blocker::WrongStep(self.step))
        } else {
            None
        }
    }

    /// Why "identify" is disabled, or `None` when it is enabled.
    #[must_use]
    pub fn identify_blocker(&self) -> Option<Blocker> {
        if self.image.is_none() {
            return Some(Blocker::NoImage);
        }
        if let Some(b) = self.common_blocker(Step::Identify) {
            return Some(b);
        }
        self.unidentifiable.then_some(Blocker::Unidentifiable)
    }

    /// Why "find ingredients" is disabled, or `None` when it is enabled.
    #[must_use]
    pub fn find_ingredients_blocker(&self) -> Option<Blocker> {
        if self.product.as_deref().is_none_or(|p| p.trim().is_empty()) {
            return Some(Blocker::NoProduct);
        }
        self.common_blocker(Step::FindIngredients)
    }

    /// Why "analyze" is disabled, or `None` when it is enabled.
    #[must_use]
    pub fn analyze_blocker(&self) -> Option<Blocker> {
        if self.ingredients.is_empty() {
            return Some(Blocker::NoIngredients);
        }
        self.common_blocker(Step::AnalyzeSafety)
    }

    /// Why "save" is disabled, or `None` when it is enabled.
    #[must_use]
    pub fn save_blocker(&self) -> Option<Blocker> {
        if self.step != Step::Results || self.safety.is_none() || self.ingredients.is_empty() {
            return Some(Blocker::NoResults);
        }
        if self.saved || self.from_saved {
            return Some(Blocker::AlreadySaved);
        }
        self.product
            .as_deref()
            .is_none_or(|p| p.trim().is_empty())
            .then_some(Blocker::NoProduct)
    }

    /// "identify" is enabled.
    #[must_use]
    pub fn can_identify(&self) -> bool {
        self.identify_blocker().is_none()
    }
    /// "find ingredients" is enabled.
    #[must_use]
    pub fn can_find_ingredients(&self) -> bool {
        self.find_ingredients_blocker().is_none()
    }
    /// "analyze" is enabled.
    #[must_use]
    pub fn can_analyze(&self) -> bool {
        self.analyze_blocker().is_none()
    }
    /// "save" is enabled.
    #[must_use]
    pub fn can_save(&self) -> bool {
        self.save_blocker().is_none()
    }

    /// Record that would be persisted by a save with the given identity.
    #[must_use]
    pub fn to_record(&self, id: String, timestamp: String) -> Option<AnalysisResult> {
        let safety = self.safety.as_ref()?;
        Some(AnalysisResult {
            id,
            timestamp,
            product: self.product.clone().unwrap_or_default(),
            image_url: ImageRef::or_placeholder(self.image.as_ref()),
            ingredients: self.ingredients.clone(),
            harmful_ingredients: safety.harmful_ingredients.clone(),
            is_safe: safety.is_safe,
            parsing_error: safety.parsing_error,
            is_food: Some(self.is_food),
        })
    }

    /// Apply `event`, returning the next state and the actions to perform.
    #[must_use]
    pub fn handle(self, event: Event) -> (Self, Vec<Action>) {
        #[cfg(feature = "tracing")]
        let (from, name) = (self.step, event.name());
        let (next, actions) = self.transition(event);
        #[cfg(feature = "tracing")]
        tracing::debug!(from = ?from, to = ?next.step, event = name, actions = actions.len(), "wizard transition");
        (next, actions)
    }

    fn transition(mut self, event: Event) -> (Self, Vec<Action>) {
        match event {
            Event::ImageSelected {
                image,
                detected_product,
            } => {
                let mut next = Self {
                    online: self.online,
                    image: Some(image),
                    ..Self::new()
                };
                match detected_product {
                    Some(p) if !is_unidentifiable(&p) => {
                        next.product = Some(p.trim().to_string());
                        next.step = Step::FindIngredients;
                    }
                    Some(_) => next.unidentifiable = true,
                    None => {}
                }
                (next, Vec::new())
            }

            Event::IdentifyRequested => {
                if !self.can_identify() {
                    return (self, Vec::new());
                }
                let Some(image) = self.image.clone() else {
                    return (self, Vec::new());
                };
                self.clear_for_request();
                self.alcohol_warning = None;
                self.is_food = false;
                self.in_flight = Some(Call::Identify);
                (self, vec![Action::Send(CallRequest::Identify { image })])
            }

            Event::IdentifyCompleted(outcome) => {
                if !self.settle(Call::Identify) {
                    return (self, Vec::new());
                }
                match outcome {
                    Err(err) => self.park(Call::Identify, &err),
                    Ok(delivered) => {
                        let resp = delivered.data;
                        let product = resp.product.as_deref().map(str::trim).unwrap_or_default();
                        if resp.unidentifiable == Some(true) || is_unidentifiable(product) {
                            self.unidentifiable = true;
                            self.product = None;
                        } else {
                            self.product = Some(product.to_string());
                            self.step = Step::FindIngredients;
                        }
                    }
                }
                (self, Vec::new())
            }

            Event::FindIngredientsRequested => {
                if !self.can_find_ingredients() {
                    return (self, Vec::new());
                }
                let product_name = self.product.clone().unwrap_or_default();
                self.clear_for_request();
                self.alcohol_warning = None;
                self.in_flight = Some(Call::FindIngredients);
                (self, vec![Action::Send(CallRequest::FindIngredients { product_name })])
            }

            Event::FindIngredientsCompleted(outcome) => {
                if !self.settle(Call::FindIngredients) {
                    return (self, Vec::new());
                }
                match outcome {
                    Err(err) => self.park(Call::FindIngredients, &err),
                    Ok(delivered) => self.apply_ingredients(delivered.data),
                }
                (self, Vec::new())
            }

            Event::AnalyzeRequested => {
                if !self.can_analyze() {
                    return (self, Vec::new());
                }
                let request = AnalyzeRequest {
                    ingredients: self.ingredients.clone(),
                    product_name: self.product.clone().unwrap_or_default(),
                    is_food: self.is_food,
                };
                self.clear_for_request();
                self.saved = false;
                self.in_flight = Some(Call::Analyze);
                (self, vec![Action::Send(CallRequest::Analyze(request))])
            }

            Event::AnalyzeCompleted(outcome) => {
                if !self.settle(Call::Analyze) {
                    return (self, Vec::new());
                }
                match outcome {
                    Err(err) => self.park(Call::Analyze, &err),
                    Ok(delivered) => {
                        self.safety = Some(delivered.data);
                        self.step = Step::Results;
                    }
                }
                (self, Vec::new())
            }

            Event::CallAbandoned(call) => {
                self.settle(call);
                (self, Vec::new())
            }

            Event::ConnectivityChanged { online } => {
                self.online = online;
                (self, Vec::new())
            }

            Event::SaveRequested { id, timestamp } => {
                if !self.can_save() {
                    return (self, Vec::new());
                }
                match self.to_record(id, timestamp) {
                    Some(record) => {
                        self.saved = true;
                        (self, vec![Action::Persist(record)])
                    }
                    None => (self, Vec::new()),
                }
            }

            Event::SaveFailed { message } => {
                self.saved = false;
                self.error = Some(StepError {
                    message,
                    kind: StepErrorKind::Save,
                    diagnostics: None,
                });
                (self, Vec::new())
            }

            Event::SavedSearchSelected(record) => {
                let next = Self {
                    step: Step::Results,
                    image: Some(ImageRef::or_placeholder(Some(&record.image_url))),
                    product: Some(record.product),
                    ingredients: record.ingredients,
                    safety: Some(SafetyReport {
                        harmful_ingredients: record.harmful_ingredients,
                        is_safe: record.is_safe,
                        parsing_error: record.parsing_error,
                    }),
                    is_food: record.is_food.unwrap_or(false),
                    online: self.online,
                    from_saved: true,
                    saved: true,
                    ..Self::new()
                };
                (next, Vec::new())
            }

            Event::DismissError => {
                self.error = None;
                (self, Vec::new())
            }

            Event::Reset => (
                Self {
                    online: self.online,
                    ..Self::new()
                },
                Vec::new(),
            ),
        }
    }

    fn clear_for_request(&mut self) {
        self.error = None;
        self.unidentifiable = false;
        self.json_parse_error = false;
        self.bad_request = false;
    }

    /// Clears the in-flight marker; false when `call` was not the one running.
    fn settle(&mut self, call: Call) -> bool {
        if self.in_flight == Some(call) {
            self.in_flight = None;
            true
        } else {
            false
        }
    }

    fn apply_ingredients(&mut self, resp: IngredientsResponse) {
        self.is_food = resp.is_food.unwrap_or(false);
        if resp.contains_alcohol {
            self.alcohol_warning = Some(
                resp.alcohol_warning
                    .filter(|w| !w.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_ALCOHOL_WARNING.to_string()),
            );
            self.ingredients = resp.ingredients;
            self.safety = Some(SafetyReport {
                harmful_ingredients: vec![HarmfulIngredient {
                    name: ALCOHOL_INGREDIENT.to_string(),
                    reason: ALCOHOL_REASON.to_string(),
                }],
                is_safe: false,
                parsing_error: None,
            });
            self.step = Step::Results;
        } else if resp.ingredients.is_empty() {
            self.error = Some(StepError {
                message: NO_INGREDIENTS_MESSAGE.to_string(),
                kind: StepErrorKind::NoIngredients,
                diagnostics: None,
            });
        } else {
            self.ingredients = resp.ingredients;
            self.step = Step::AnalyzeSafety;
        }
    }

    fn park(&mut self, call: Call, err: &RequestError) {
        let diagnostics = err.diagnostics.clone();
        let (kind, message) = if matches!(err.failure, RequestFailure::JsonParse) {
            self.json_parse_error = true;
            (StepErrorKind::JsonParse, call.parse_error_message().to_string())
        } else if err.is_bad_request() {
            self.bad_request = true;
            (StepErrorKind::BadRequest, call.bad_request_message().to_string())
        } else {
            (StepErrorKind::Request, err.to_string())
        };
        self.error = Some(StepError {
            message,
            kind,
            diagnostics,
        });
    }
}
