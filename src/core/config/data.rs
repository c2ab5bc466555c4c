use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::constants::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::core::session::ThemeMode;

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    /// UI theme name ("light" or "dark")
    pub theme: Option<String>,
    /// Model used when `--model` is not given
    pub default_model: Option<String>,
    /// Override for the API base URL
    pub base_url: Option<String>,
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}

impl Config {
    /// The stored theme, ignoring values that are not a known theme.
    pub fn theme_mode(&self) -> Option<ThemeMode> {
        self.theme.as_deref().and_then(|name| name.parse().ok())
    }

    pub fn set_theme_mode(&mut self, theme: ThemeMode) {
        self.theme = Some(theme.as_str().to_string());
    }

    pub fn resolve_model(&self, requested: Option<&str>) -> String {
        requested
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .or(self.default_model.as_deref())
            .unwrap_or(DEFAULT_MODEL)
            .to_string()
    }

    pub fn resolve_base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }
}
