use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::api::client::{ApiError, Citation, ModelClient, ModelReply, ModelRequest};
use crate::core::app::App;
use crate::core::orchestrator::RequestOrchestrator;
use crate::core::preferences::MemoryPreferenceStore;

pub fn reply(text: &str, citations: Vec<Citation>) -> ModelReply {
    ModelReply {
        text: text.to_string(),
        citations,
    }
}

/// Returns canned outcomes in order and records every request it receives.
pub struct ScriptedClient {
    outcomes: Mutex<VecDeque<Result<ModelReply, ApiError>>>,
    requests: Mutex<Vec<ModelRequest>>,
    never_resolves: bool,
}

impl ScriptedClient {
    pub fn new(outcomes: Vec<Result<ModelReply, ApiError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            requests: Mutex::new(Vec::new()),
            never_resolves: false,
        }
    }

    /// A client whose calls stay outstanding forever.
    pub fn pending() -> Self {
        Self {
            never_resolves: true,
            ..Self::new(Vec::new())
        }
    }

    pub fn requests(&self) -> MutexGuard<'_, Vec<ModelRequest>> {
        self.requests.lock().unwrap()
    }
}

#[async_trait]
impl ModelClient for ScriptedClient {
    async fn generate(&self, request: &ModelRequest) -> Result<ModelReply, ApiError> {
        self.requests.lock().unwrap().push(request.clone());
        if self.never_resolves {
            std::future::pending::<()>().await;
        }
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::MalformedResponse("no scripted reply".into())))
    }
}

/// An orchestrator backed by `client` with an in-memory preference store.
pub fn orchestrator_with(client: Arc<ScriptedClient>) -> RequestOrchestrator {
    RequestOrchestrator::new(
        Ok(client),
        "test-model",
        Box::new(MemoryPreferenceStore::default()),
    )
}

/// A terminal-free app whose client fails every call.
pub fn create_test_app() -> App {
    App::new(orchestrator_with(Arc::new(ScriptedClient::new(Vec::new()))))
}
