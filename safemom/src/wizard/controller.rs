use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use safemom_core::{AnalysisResult, ImageRef, SafeMomError, SearchHistory};
use uuid::Uuid;

use super::machine::{Action, Blocker, Call, CallRequest, Event, Wizard};
use crate::SafeMom;

/// Errors surfaced by [`AnalysisSession`].
///
/// Request failures never show up here; they are parked on the wizard step.
pub type WizardError = SafeMomError;

fn disabled(action: &'static str, blocker: Blocker) -> WizardError {
    WizardError::disabled(action, blocker.to_string())
}

/// Tells the wizard a call was abandoned if the future running it is dropped
/// before the completion event is dispatched.
struct AbandonGuard<'a> {
    wizard: &'a mut Wizard,
    call: Option<Call>,
}

impl AbandonGuard<'_> {
    fn disarm(mut self) {
        self.call = None;
    }
}

impl Drop for AbandonGuard<'_> {
    fn drop(&mut self) {
        if let Some(call) = self.call.take() {
            let (next, _) = std::mem::take(self.wizard).handle(Event::CallAbandoned(call));
            *self.wizard = next;
        }
    }
}

/// Drives a [`Wizard`] against a [`SafeMom`] orchestrator and a saved-search history.
///
/// Calls run one at a time: each method awaits its backend call before
/// returning, and `&mut self` rules out overlapping steps. Dropping a step
/// future mid-call (a caller-side timeout, `select!`) releases the step so it
/// can be retried.
pub struct AnalysisSession {
    client: Arc<SafeMom>,
    history: SearchHistory,
    wizard: Wizard,
}

impl std::fmt::Debug for AnalysisSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisSession")
            .field("wizard", &self.wizard)
            .finish_non_exhaustive()
    }
}

impl AnalysisSession {
    /// New session at step 1.
    #[must_use]
    pub fn new(client: Arc<SafeMom>, history: SearchHistory) -> Self {
        let mut session = Self {
            client,
            history,
            wizard: Wizard::new(),
        };
        session.sync_connectivity();
        session
    }

    /// Current wizard state.
    #[must_use]
    pub const fn wizard(&self) -> &Wizard {
        &self.wizard
    }

    /// Saved-search history backing this session.
    #[must_use]
    pub const fn history(&self) -> &SearchHistory {
        &self.history
    }

    fn dispatch(&mut self, event: Event) -> Vec<Action> {
        let (next, actions) = std::mem::take(&mut self.wizard).handle(event);
        self.wizard = next;
        actions
    }

    /// Refresh the wizard's online flag from the orchestrator's connectivity source.
    pub fn sync_connectivity(&mut self) {
        let online = self.client.is_online();
        if online != self.wizard.is_online() {
            self.dispatch(Event::ConnectivityChanged { online });
        }
    }

    /// Select a new image, discarding all step data.
    pub fn select_image(&mut self, image: ImageRef, detected_product: Option<String>) -> &Wizard {
        self.dispatch(Event::ImageSelected {
            image,
            detected_product,
        });
        &self.wizard
    }

    /// Run the identify step.
    ///
    /// # Errors
    /// Returns `Disabled` when identify is not currently available. Backend
    /// failures are parked on the wizard instead.
    pub async fn identify(&mut self) -> Result<&Wizard, WizardError> {
        self.sync_connectivity();
        if let Some(blocker) = self.wizard.identify_blocker() {
            return Err(disabled("identify", blocker));
        }
        let actions = self.dispatch(Event::IdentifyRequested);
        self.run(actions).await;
        Ok(&self.wizard)
    }

    /// Run the find-ingredients step.
    ///
    /// # Errors
    /// Returns `Disabled` when the step is not currently available.
    pub async fn find_ingredients(&mut self) -> Result<&Wizard, WizardError> {
        self.sync_connectivity();
        if let Some(blocker) = self.wizard.find_ingredients_blocker() {
            return Err(disabled("find-ingredients", blocker));
        }
        let actions = self.dispatch(Event::FindIngredientsRequested);
        self.run(actions).await;
        Ok(&self.wizard)
    }

    /// Run the safety analysis step.
    ///
    /// # Errors
    /// Returns `Disabled` when the step is not currently available.
    pub async fn analyze(&mut self) -> Result<&Wizard, WizardError> {
        self.sync_connectivity();
        if let Some(blocker) = self.wizard.analyze_blocker() {
            return Err(disabled("analyze", blocker));
        }
        let actions = self.dispatch(Event::AnalyzeRequested);
        self.run(actions).await;
        Ok(&self.wizard)
    }

    /// Persist the current verdict as the newest saved search.
    ///
    /// # Errors
    /// Returns `Disabled` when there is nothing new to save, or the storage error
    /// when persisting failed (the wizard then allows saving again).
    pub fn save(&mut self) -> Result<AnalysisResult, WizardError> {
        if let Some(blocker) = self.wizard.save_blocker() {
            return Err(disabled("save", blocker));
        }
        let actions = self.dispatch(Event::SaveRequested {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        });
        let mut saved = None;
        for action in actions {
            if let Action::Persist(record) = action {
                match self.history.save(record.clone()) {
                    Ok(_evicted) => saved = Some(record),
                    Err(err) => {
                        self.dispatch(Event::SaveFailed {
                            message: err.to_string(),
                        });
                        return Err(err);
                    }
                }
            }
        }
        saved.ok_or_else(|| disabled("save", Blocker::NoResults))
    }

    /// Open a saved search by id and jump to the results step.
    ///
    /// # Errors
    /// Returns `InvalidArg` for an unknown id and storage errors from the history.
    pub fn open_saved(&mut self, id: &str) -> Result<&Wizard, WizardError> {
        let record = self
            .history
            .get(id)?
            .ok_or_else(|| WizardError::InvalidArg(format!("no saved search with id {id}")))?;
        self.dispatch(Event::SavedSearchSelected(record));
        Ok(&self.wizard)
    }

    /// Saved searches, newest first.
    ///
    /// # Errors
    /// Propagates storage errors.
    pub fn saved_searches(&self) -> Result<Vec<AnalysisResult>, WizardError> {
        self.history.all()
    }

    /// Delete one saved search.
    ///
    /// # Errors
    /// Propagates storage errors.
    pub fn delete_saved(&self, id: &str) -> Result<bool, WizardError> {
        self.history.delete(id)
    }

    /// Delete every saved search.
    ///
    /// # Errors
    /// Propagates storage errors.
    pub fn clear_saved(&self) -> Result<(), WizardError> {
        self.history.clear()
    }

    /// Dismiss the surfaced error, keeping the current step.
    pub fn dismiss_error(&mut self) -> &Wizard {
        self.dispatch(Event::DismissError);
        &self.wizard
    }

    /// Start over at step 1.
    pub fn reset(&mut self) -> &Wizard {
        self.dispatch(Event::Reset);
        &self.wizard
    }

    async fn run(&mut self, actions: Vec<Action>) {
        for action in actions {
            let Action::Send(request) = action else {
                continue;
            };
            let guard = AbandonGuard {
                wizard: &mut self.wizard,
                call: Some(request.call()),
            };
            let event = match request {
                CallRequest::Identify { image } => {
                    Event::IdentifyCompleted(self.client.identify_product(&image).await)
                }
                CallRequest::FindIngredients { product_name } => {
                    Event::FindIngredientsCompleted(self.client.find_ingredients(&product_name).await)
                }
                CallRequest::Analyze(request) => {
                    Event::AnalyzeCompleted(self.client.analyze_ingredients(&request).await)
                }
            };
            guard.disarm();
            self.dispatch(event);
        }
    }
}
