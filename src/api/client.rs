//! The seam between the request orchestrator and the hosted model.

use std::error::Error;
use std::fmt;

use async_trait::async_trait;

use crate::core::history::HistoryEntry;

/// Everything needed for one completion: the full history, the system
/// instruction, and whether web-search grounding is enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRequest {
    pub model: String,
    pub history: Vec<HistoryEntry>,
    pub system_instruction: String,
    pub grounding: bool,
}

/// A grounding citation exactly as the API reported it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Citation {
    pub uri: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelReply {
    pub text: String,
    pub citations: Vec<Citation>,
}

#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn generate(&self, request: &ModelRequest) -> Result<ModelReply, ApiError>;
}

#[derive(Debug)]
pub enum ApiError {
    /// No API key was available at startup.
    MissingApiKey,

    /// The HTTP client could not be built.
    Client(reqwest::Error),

    /// No client exists; initialization failed earlier.
    NotInitialized,

    /// The request never produced an HTTP response.
    Transport(reqwest::Error),

    /// The API answered with a non-success status.
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The response body was not valid JSON for the expected shape.
    Decode(serde_json::Error),

    /// The response decoded but carried no usable reply.
    MalformedResponse(String),

    /// The task running the request ended without an outcome.
    TaskFailed(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::MissingApiKey => write!(f, "no API key configured"),
            ApiError::Client(err) => write!(f, "failed to build HTTP client: {err}"),
            ApiError::NotInitialized => write!(f, "model client is not initialized"),
            ApiError::Transport(err) => write!(f, "request failed: {err}"),
            ApiError::Status { status, body } => {
                write!(f, "API request failed with status {status}: {}", format_api_error(body))
            }
            ApiError::Decode(err) => write!(f, "failed to decode response: {err}"),
            ApiError::MalformedResponse(detail) => write!(f, "malformed response: {detail}"),
            ApiError::TaskFailed(detail) => write!(f, "request task failed: {detail}"),
        }
    }
}

impl Error for ApiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ApiError::Client(err) | ApiError::Transport(err) => Some(err),
            ApiError::Decode(err) => Some(err),
            _ => None,
        }
    }
}

fn extract_error_summary(value: &serde_json::Value) -> Option<String> {
    let summary = value
        .pointer("/error/message")
        .and_then(|v| v.as_str())
        .map(str::to_owned)
        .or_else(|| {
            value.get("error").and_then(|v| match v {
                serde_json::Value::String(s) => Some(s.to_string()),
                _ => None,
            })
        })
        .or_else(|| {
            value
                .get("message")
                .and_then(|v| v.as_str().map(str::to_owned))
        });

    summary.map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
}

/// Collapse an error body into a single line for the debug log.
pub fn format_api_error(error_text: &str) -> String {
    let trimmed = error_text.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    if let Ok(json_value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        if let Some(summary) = extract_error_summary(&json_value) {
            if !summary.is_empty() {
                return summary;
            }
        }
        return json_value.to_string();
    }

    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}
