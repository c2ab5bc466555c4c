//! Shared constants used across the application

/// Shown in the transcript and the banner whenever a request fails.
pub const REQUEST_FAILURE_MESSAGE: &str = "Sorry, something went wrong. Please try again.";

/// Shown once at startup when the model client could not be constructed.
pub const INIT_FAILURE_MESSAGE: &str =
    "Failed to initialize the AI model. Please check that GEMINI_API_KEY is set and valid.";

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Sent verbatim with every request.
pub const SYSTEM_INSTRUCTION: &str = "You are a friendly, knowledgeable research assistant. \
Answer clearly and concisely using Markdown formatting where it helps readability. \
When a question depends on recent events or facts you are unsure about, use Google Search \
to ground your answer and prefer information from reputable sources. \
Only consider the most recent ten exchanges of the conversation as context; \
older turns may be ignored. If you do not know the answer, say so instead of guessing.";
