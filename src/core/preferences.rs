//! Where the theme preference lives between sessions.

use std::error::Error;
use std::path::PathBuf;

use crate::core::config::orchestrator::ConfigOrchestrator;
use crate::core::session::ThemeMode;

pub trait PreferenceStore: Send {
    fn load_theme(&self) -> Result<Option<ThemeMode>, Box<dyn Error>>;
    fn save_theme(&mut self, theme: ThemeMode) -> Result<(), Box<dyn Error>>;
}

/// Theme stored under `theme` in the TOML config file.
pub struct ConfigPreferenceStore {
    config: ConfigOrchestrator,
}

impl ConfigPreferenceStore {
    pub fn new(config: ConfigOrchestrator) -> Self {
        Self { config }
    }

    pub fn at_path(path: PathBuf) -> Self {
        Self::new(ConfigOrchestrator::new(path))
    }
}

impl PreferenceStore for ConfigPreferenceStore {
    fn load_theme(&self) -> Result<Option<ThemeMode>, Box<dyn Error>> {
        Ok(self.config.load_with_cache()?.theme_mode())
    }

    fn save_theme(&mut self, theme: ThemeMode) -> Result<(), Box<dyn Error>> {
        self.config.mutate(|config| {
            config.set_theme_mode(theme);
            Ok(())
        })
    }
}

/// Process-local store, used with `--no-persist` and in tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryPreferenceStore {
    theme: Option<ThemeMode>,
    pub writes: usize,
}

impl MemoryPreferenceStore {
    pub fn new(theme: Option<ThemeMode>) -> Self {
        Self { theme, writes: 0 }
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load_theme(&self) -> Result<Option<ThemeMode>, Box<dyn Error>> {
        Ok(self.theme)
    }

    fn save_theme(&mut self, theme: ThemeMode) -> Result<(), Box<dyn Error>> {
        self.theme = Some(theme);
        self.writes += 1;
        Ok(())
    }
}
