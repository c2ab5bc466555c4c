//! Conversation state and the request lifecycle.
//!
//! - [`orchestrator`] drives send → call → append and owns the session.
//! - [`message`], [`history`] and [`session`] hold the data it mutates.
//! - [`config`] and [`preferences`] persist the theme between runs.
//! - [`app`] wraps the orchestrator with the terminal's view state.

pub mod app;
pub mod config;
pub mod constants;
pub mod history;
pub mod keyring;
pub mod message;
pub mod orchestrator;
pub mod preferences;
pub mod session;
