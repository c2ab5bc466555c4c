//! groundchat: a full-screen terminal chat client for web-grounded answers.
//!
//! - [`core`] holds the transcript, the conversation history and the
//!   single-flight request orchestrator.
//! - [`api`] speaks the Gemini `generateContent` wire format.
//! - [`ui`] and [`commands`] form the terminal presentation shell.
//! - [`cli`] wires everything together behind clap.

pub mod api;
pub mod auth;
pub mod cli;
pub mod commands;
pub mod core;
pub mod ui;
pub mod utils;
