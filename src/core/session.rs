//! Per-session state read by the presentation layer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::message::Message;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            other => Err(format!("invalid theme: {other} (expected light or dark)")),
        }
    }
}

/// Everything the UI needs to draw a frame. Only the orchestrator mutates it.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub messages: Vec<Message>,
    pub is_loading: bool,
    pub last_error: Option<String>,
    pub theme: ThemeMode,
}

impl SessionState {
    pub fn new(theme: ThemeMode) -> Self {
        Self {
            theme,
            ..Default::default()
        }
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// A reply is pending for the most recent user message.
    pub fn awaiting_reply(&self) -> bool {
        self.is_loading && self.last_message().is_some_and(Message::is_user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_parses_case_insensitively() {
        assert_eq!("DARK".parse::<ThemeMode>(), Ok(ThemeMode::Dark));
        assert_eq!(" light ".parse::<ThemeMode>(), Ok(ThemeMode::Light));
        assert!("dracula".parse::<ThemeMode>().is_err());
    }

    #[test]
    fn toggling_twice_restores_theme() {
        assert_eq!(ThemeMode::Light.toggled().toggled(), ThemeMode::Light);
        assert_eq!(ThemeMode::Dark.toggled(), ThemeMode::Light);
    }

    #[test]
    fn awaiting_reply_requires_loading_and_trailing_user_message() {
        let mut state = SessionState::new(ThemeMode::Dark);
        assert!(!state.awaiting_reply());

        state.messages.push(Message::user("hi"));
        assert!(!state.awaiting_reply());

        state.is_loading = true;
        assert!(state.awaiting_reply());

        state.messages.push(Message::assistant("hello", Vec::new()));
        assert!(!state.awaiting_reply());
    }
}
