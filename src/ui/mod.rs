//! Terminal UI layer for interactive chat sessions.
//!
//! - [`chat_loop`]: the interaction loop that dispatches input to
//!   [`crate::commands`] and runs requests through the orchestrator.
//! - [`renderer`], [`layout`] and [`markdown`]: view composition and frame output.
//! - [`theme`] and [`builtin_themes`]: color/style policy.
//!
//! This layer only reads [`crate::core::session::SessionState`]; every
//! mutation goes through the orchestrator.

pub mod builtin_themes;
pub mod chat_loop;
pub mod layout;
pub mod markdown;
pub mod renderer;
pub mod theme;
