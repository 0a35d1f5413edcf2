use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use safemom_core::{Transport, TransportError, TransportRequest, TransportResponse};

/// Instruction for how one attempt against a path should behave.
#[derive(Clone, Debug)]
pub enum MockBehavior {
    /// Answer with the provided response immediately.
    Respond(TransportResponse),
    /// Fail immediately with the provided transport error.
    Fail(TransportError),
    /// Hang indefinitely (simulate a stalled connection).
    Hang,
}

#[derive(Default)]
struct InternalState {
    queues: HashMap<String, VecDeque<MockBehavior>>,
    fallbacks: HashMap<String, MockBehavior>,
    requests: Vec<TransportRequest>,
}

/// Path component of an absolute URL, without query or fragment.
#[must_use]
pub fn path_of(url: &str) -> &str {
    let after_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    let path = after_scheme
        .find('/')
        .map_or("/", |i| &after_scheme[i..]);
    let end = path.find(['?', '#']).unwrap_or(path.len());
    &path[..end]
}

/// Controller handle used by tests to script the transport from the outside.
#[derive(Clone)]
pub struct ScriptController {
    state: Arc<Mutex<InternalState>>,
}

impl ScriptController {
    /// Queue one behavior for the next unanswered attempt against `path`.
    pub async fn push(&self, path: &str, behavior: MockBehavior) {
        let mut guard = self.state.lock().await;
        guard
            .queues
            .entry(path.to_string())
            .or_default()
            .push_back(behavior);
    }

    /// Queue a response for `path`.
    pub async fn respond(&self, path: &str, response: TransportResponse) {
        self.push(path, MockBehavior::Respond(response)).await;
    }

    /// Queue several behaviors for `path`, consumed in order.
    pub async fn push_many(&self, path: &str, behaviors: impl IntoIterator<Item = MockBehavior>) {
        let mut guard = self.state.lock().await;
        guard
            .queues
            .entry(path.to_string())
            .or_default()
            .extend(behaviors);
    }

    /// Behavior used for `path` whenever its queue is empty.
    pub async fn set_fallback(&self, path: &str, behavior: MockBehavior) {
        let mut guard = self.state.lock().await;
        guard.fallbacks.insert(path.to_string(), behavior);
    }

    /// Copy of every request received so far, oldest first.
    pub async fn requests(&self) -> Vec<TransportRequest> {
        self.state.lock().await.requests.clone()
    }

    /// Number of attempts made against `path`.
    pub async fn attempts(&self, path: &str) -> usize {
        let guard = self.state.lock().await;
        guard
            .requests
            .iter()
            .filter(|r| path_of(&r.url) == path)
            .count()
    }

    /// Clear all scripted behaviors and the request log.
    pub async fn clear_all_behaviors(&self) {
        let mut guard = self.state.lock().await;
        guard.queues.clear();
        guard.fallbacks.clear();
        guard.requests.clear();
    }
}

/// Transport whose answers are scripted per path by a [`ScriptController`].
///
/// Unscripted paths answer `404` with a JSON error body.
pub struct ScriptedTransport {
    state: Arc<Mutex<InternalState>>,
}

impl ScriptedTransport {
    /// Create a new scripted transport and its controller.
    #[must_use]
    pub fn new_with_controller() -> (Arc<dyn Transport>, ScriptController) {
        let state = Arc::new(Mutex::new(InternalState::default()));
        let controller = ScriptController {
            state: Arc::clone(&state),
        };
        let me = Arc::new(Self { state });
        (me as Arc<dyn Transport>, controller)
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    fn name(&self) -> &'static str {
        "safemom-scripted"
    }

    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        // Pick the behavior without holding the lock across await points
        let behavior = {
            let mut guard = self.state.lock().await;
            let path = path_of(&request.url).to_string();
            guard.requests.push(request);
            let queued = guard.queues.get_mut(&path).and_then(VecDeque::pop_front);
            queued.or_else(|| guard.fallbacks.get(&path).cloned()).unwrap_or_else(|| {
                MockBehavior::Respond(TransportResponse::json(
                    404,
                    &serde_json::json!({ "error": format!("no scripted response for {path}") }),
                ))
            })
        };

        match behavior {
            MockBehavior::Respond(resp) => Ok(resp),
            MockBehavior::Fail(e) => Err(e),
            MockBehavior::Hang => {
                std::future::pending::<()>().await;
                unreachable!()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_extraction() {
        assert_eq!(path_of("http://localhost:3000/api/ping"), "/api/ping");
        assert_eq!(path_of("https://x.app/api/find-ingredients?x=1#y"), "/api/find-ingredients");
        assert_eq!(path_of("https://x.app"), "/");
        assert_eq!(path_of("/relative"), "/relative");
    }
}
