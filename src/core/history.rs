//! Conversation history in the role/parts shape the model API replays.
//!
//! The adapter mirrors the transcript one entry per successful append. It is
//! owned by the request orchestrator and never rendered.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryRole {
    User,
    Model,
}

impl HistoryRole {
    pub fn as_str(self) -> &'static str {
        match self {
            HistoryRole::User => "user",
            HistoryRole::Model => "model",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: HistoryRole,
    pub parts: Vec<String>,
}

impl HistoryEntry {
    pub fn new(role: HistoryRole, text: impl Into<String>) -> Self {
        Self {
            role,
            parts: vec![text.into()],
        }
    }

    pub fn text(&self) -> &str {
        self.parts.first().map(String::as_str).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default)]
pub struct HistoryAdapter {
    entries: Vec<HistoryEntry>,
}

impl HistoryAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.entries.push(HistoryEntry::new(HistoryRole::User, text));
    }

    pub fn push_model(&mut self, text: impl Into<String>) {
        self.entries.push(HistoryEntry::new(HistoryRole::Model, text));
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when the last entry is a user turn that never got a model reply.
    pub fn has_unanswered_tail(&self) -> bool {
        self.entries
            .last()
            .is_some_and(|entry| entry.role == HistoryRole::User)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
