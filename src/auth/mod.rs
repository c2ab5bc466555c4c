//! API key resolution and storage.
//!
//! The key is read once at startup: `GEMINI_API_KEY` wins, otherwise the
//! system keyring entry written by `groundchat auth` is used.

use std::io::{self, BufRead, Write};

use keyring::Entry;
use tracing::{debug, warn};

use crate::core::constants::API_KEY_ENV;
use crate::core::keyring::KeyringAccessError;

const KEYRING_SERVICE: &str = "groundchat";
const KEYRING_USER: &str = "gemini";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    Environment,
    Keyring,
}

pub struct AuthManager {
    use_keyring: bool,
}

impl AuthManager {
    pub fn new() -> Self {
        Self::new_with_keyring(true)
    }

    pub fn new_with_keyring(use_keyring: bool) -> Self {
        Self { use_keyring }
    }

    /// The API key and where it came from, or `None` when no key is configured.
    pub fn resolve_api_key(&self) -> Option<(String, KeySource)> {
        if let Some(key) = non_empty(std::env::var(API_KEY_ENV).ok()) {
            debug!("using API key from {API_KEY_ENV}");
            return Some((key, KeySource::Environment));
        }

        match self.get_token() {
            Ok(Some(key)) => Some((key, KeySource::Keyring)),
            Ok(None) => None,
            Err(err) => {
                warn!(
                    error = %err,
                    recoverable = err.is_recoverable(),
                    "keyring lookup failed"
                );
                None
            }
        }
    }

    pub fn get_token(&self) -> Result<Option<String>, KeyringAccessError> {
        if !self.use_keyring {
            return Ok(None);
        }
        let entry = Entry::new(KEYRING_SERVICE, KEYRING_USER)?;
        match entry.get_password() {
            Ok(token) => Ok(non_empty(Some(token))),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    pub fn store_token(&self, token: &str) -> Result<(), KeyringAccessError> {
        let entry = Entry::new(KEYRING_SERVICE, KEYRING_USER)?;
        entry.set_password(token)?;
        Ok(())
    }

    pub fn remove_token(&self) -> Result<bool, KeyringAccessError> {
        let entry = Entry::new(KEYRING_SERVICE, KEYRING_USER)?;
        match entry.delete_credential() {
            Ok(()) => Ok(true),
            Err(keyring::Error::NoEntry) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    /// Prompt for a key on stdin and store it in the keyring.
    pub fn interactive_auth(&self) -> Result<(), Box<dyn std::error::Error>> {
        print!("Enter your Gemini API key: ");
        io::stdout().flush()?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        let token = non_empty(Some(line)).ok_or("No API key entered")?;

        self.store_token(&token)?;
        println!("✅ API key stored in the system keyring");
        Ok(())
    }
}

impl Default for AuthManager {
    fn default() -> Self {
        Self::new()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_keyring_never_yields_a_token() {
        let auth = AuthManager::new_with_keyring(false);
        assert!(matches!(auth.get_token(), Ok(None)));
    }

    #[test]
    fn non_empty_trims_and_rejects_blank() {
        assert_eq!(non_empty(Some("  key\n".into())).as_deref(), Some("key"));
        assert_eq!(non_empty(Some(" \n".into())), None);
        assert_eq!(non_empty(None), None);
    }
}
