//! Single-flight request lifecycle.
//!
//! The orchestrator is the only writer of [`SessionState`] and the only owner
//! of the [`HistoryAdapter`]. A send is split into a synchronous entry half
//! ([`RequestOrchestrator::begin_send`]), the one asynchronous call
//! ([`PendingRequest::execute`]) and a synchronous exit half
//! ([`RequestOrchestrator::complete`]) so the terminal loop can keep drawing
//! while the call is outstanding. [`RequestOrchestrator::send_message`] runs
//! all three in sequence.

use std::error::Error;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::api::client::{ApiError, ModelClient, ModelReply, ModelRequest};
use crate::core::constants::{INIT_FAILURE_MESSAGE, REQUEST_FAILURE_MESSAGE, SYSTEM_INSTRUCTION};
use crate::core::history::{HistoryAdapter, HistoryEntry};
use crate::core::message::{sources_from_citations, Message};
use crate::core::preferences::PreferenceStore;
use crate::core::session::{SessionState, ThemeMode};

pub type ClientInit = Result<Arc<dyn ModelClient>, ApiError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Nothing happened: blank input, a request already in flight, or a stale result.
    Ignored,
    Replied,
    Failed,
}

/// A request snapshot taken when the user entry was appended.
pub struct PendingRequest {
    id: u64,
    client: Option<Arc<dyn ModelClient>>,
    request: ModelRequest,
}

impl PendingRequest {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn request(&self) -> &ModelRequest {
        &self.request
    }

    pub async fn execute(self) -> Result<ModelReply, ApiError> {
        match self.client {
            Some(client) => client.generate(&self.request).await,
            None => Err(ApiError::NotInitialized),
        }
    }
}

pub struct RequestOrchestrator {
    state: SessionState,
    history: HistoryAdapter,
    client: Option<Arc<dyn ModelClient>>,
    model: String,
    preferences: Box<dyn PreferenceStore>,
    next_request_id: u64,
    in_flight: Option<u64>,
}

impl RequestOrchestrator {
    pub fn new(
        client: ClientInit,
        model: impl Into<String>,
        preferences: Box<dyn PreferenceStore>,
    ) -> Self {
        let theme = match preferences.load_theme() {
            Ok(theme) => theme.unwrap_or_default(),
            Err(err) => {
                warn!(error = %err, "failed to load theme preference; using default");
                ThemeMode::default()
            }
        };

        let mut state = SessionState::new(theme);
        let client = match client {
            Ok(client) => Some(client),
            Err(err) => {
                warn!(error = %err, "model client initialization failed");
                state.last_error = Some(INIT_FAILURE_MESSAGE.to_string());
                None
            }
        };

        Self {
            state,
            history: HistoryAdapter::new(),
            client,
            model: model.into(),
            preferences,
            next_request_id: 1,
            in_flight: None,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn history(&self) -> &[HistoryEntry] {
        self.history.entries()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn is_initialized(&self) -> bool {
        self.client.is_some()
    }

    /// Append the user turn and snapshot the request to send.
    ///
    /// Returns `None` without touching any state when the trimmed text is
    /// empty or a request is already in flight.
    pub fn begin_send(&mut self, text: &str) -> Option<PendingRequest> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        if self.state.is_loading {
            debug!("dropping send while a request is in flight");
            return None;
        }

        if self.history.has_unanswered_tail() {
            debug!("previous turn went unanswered; resending it as context");
        }
        self.state.messages.push(Message::user(text));
        self.history.push_user(text);
        self.state.is_loading = true;
        self.state.last_error = None;

        let id = self.next_request_id;
        self.next_request_id += 1;
        self.in_flight = Some(id);

        debug!(request_id = id, history_len = self.history.len(), "request started");

        Some(PendingRequest {
            id,
            client: self.client.clone(),
            request: ModelRequest {
                model: self.model.clone(),
                history: self.history.entries().to_vec(),
                system_instruction: SYSTEM_INSTRUCTION.to_string(),
                grounding: true,
            },
        })
    }

    /// Record the outcome of request `request_id`. Clears the loading flag on
    /// every path; results for a request that is no longer in flight are dropped.
    pub fn complete(
        &mut self,
        request_id: u64,
        outcome: Result<ModelReply, ApiError>,
    ) -> SendOutcome {
        if self.in_flight != Some(request_id) {
            debug!(request_id, "discarding result for stale request");
            return SendOutcome::Ignored;
        }
        self.in_flight = None;
        self.state.is_loading = false;

        match outcome {
            Ok(reply) => {
                let sources = sources_from_citations(&reply.citations);
                debug!(
                    request_id,
                    sources = sources.len(),
                    dropped_citations = reply.citations.len() - sources.len(),
                    "request completed"
                );
                self.history.push_model(reply.text.clone());
                self.state
                    .messages
                    .push(Message::assistant(reply.text, sources));
                SendOutcome::Replied
            }
            Err(err) => {
                warn!(request_id, error = %err, "request failed");
                self.state.last_error = Some(REQUEST_FAILURE_MESSAGE.to_string());
                self.state
                    .messages
                    .push(Message::assistant(REQUEST_FAILURE_MESSAGE, Vec::new()));
                SendOutcome::Failed
            }
        }
    }

    /// Full send cycle. If the returned future is dropped mid-call the turn is
    /// recorded as failed, so the loading flag never outlives the call.
    pub async fn send_message(&mut self, text: &str) -> SendOutcome {
        let Some(pending) = self.begin_send(text) else {
            return SendOutcome::Ignored;
        };
        let guard = InFlightGuard {
            orchestrator: self,
            request_id: pending.id(),
            armed: true,
        };
        let outcome = pending.execute().await;
        guard.finish(outcome)
    }

    /// Empty the transcript and history. Theme is untouched; a request still
    /// in flight becomes stale and its result is discarded.
    pub fn clear_session(&mut self) {
        if let Some(id) = self.in_flight.take() {
            debug!(request_id = id, "session cleared with request in flight");
        }
        self.state.messages.clear();
        self.history.clear();
        self.state.is_loading = false;
    }

    /// Apply `theme` and persist it. The in-memory theme changes even if the
    /// write fails.
    pub fn set_theme(&mut self, theme: ThemeMode) -> Result<(), Box<dyn Error>> {
        self.state.theme = theme;
        self.preferences.save_theme(theme).inspect_err(|err| {
            warn!(error = %err, "failed to persist theme preference");
        })
    }

    pub fn toggle_theme(&mut self) -> Result<ThemeMode, Box<dyn Error>> {
        let next = self.state.theme.toggled();
        self.set_theme(next)?;
        Ok(next)
    }
}

struct InFlightGuard<'a> {
    orchestrator: &'a mut RequestOrchestrator,
    request_id: u64,
    armed: bool,
}

impl InFlightGuard<'_> {
    fn finish(mut self, outcome: Result<ModelReply, ApiError>) -> SendOutcome {
        self.armed = false;
        self.orchestrator.complete(self.request_id, outcome)
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.orchestrator.complete(
                self.request_id,
                Err(ApiError::TaskFailed("request dropped before completion".into())),
            );
        }
    }
}
