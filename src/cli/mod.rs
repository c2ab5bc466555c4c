//! Command-line interface parsing and handling
//!
//! This module parses arguments, wires the orchestrator to its collaborators
//! and dispatches to the chat screen or one of the utility subcommands.

pub mod say;

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;

use crate::api::client::{ApiError, ModelClient};
use crate::api::gemini::GeminiClient;
use crate::auth::AuthManager;
use crate::core::app::App;
use crate::core::config::{path_display, Config, ConfigOrchestrator};
use crate::core::orchestrator::{ClientInit, RequestOrchestrator};
use crate::core::preferences::{ConfigPreferenceStore, MemoryPreferenceStore, PreferenceStore};
use crate::core::session::ThemeMode;
use crate::ui::chat_loop::run_chat;
use crate::utils::logging::init_file_logging;

use self::say::run_say;

#[derive(Parser)]
#[command(name = "groundchat")]
#[command(version)]
#[command(about = "A terminal chat interface for web-grounded answers from Gemini")]
#[command(
    long_about = "groundchat is a full-screen terminal chat interface backed by the Gemini API. \
Every answer is grounded with Google Search and lists the web sources it cites.\n\n\
Authentication:\n\
  Set GEMINI_API_KEY, or run 'groundchat auth' to store a key in the system keyring.\n\n\
Controls:\n\
  Enter             Send the message\n\
  Alt+Enter         Insert a new line\n\
  PageUp/PageDown   Scroll through the conversation\n\
  Ctrl+L            Clear the conversation\n\
  Ctrl+T            Toggle light/dark theme\n\
  Ctrl+C, Esc       Quit\n\n\
Commands:\n\
  /clear            Start a new conversation\n\
  /theme [name]     Toggle the theme or pick light/dark\n\
  /help             Show commands and key bindings\n\
  /quit             Leave the chat"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Model to use instead of the configured default
    #[arg(short = 'm', long, global = true, value_name = "MODEL")]
    pub model: Option<String>,

    /// Write diagnostic logs to this file (filter with GROUNDCHAT_LOG)
    #[arg(long, global = true, value_name = "PATH")]
    pub debug_log: Option<PathBuf>,

    /// Keep theme changes in memory instead of saving them
    #[arg(long, global = true)]
    pub no_persist: bool,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// Ask a single question and print the grounded answer
    Say {
        /// The prompt to send
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        prompt: Vec<String>,
    },
    /// Store a Gemini API key in the system keyring
    Auth,
    /// Remove the stored Gemini API key
    Deauth,
    /// Set configuration values
    Set {
        /// Configuration key to set (theme, default-model, base-url)
        key: Option<String>,
        /// Value to set for the key
        value: Option<String>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

pub fn main() -> Result<(), Box<dyn Error>> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    if let Some(path) = args.debug_log.as_deref() {
        init_file_logging(path)?;
    }

    match args.command.unwrap_or(Commands::Chat) {
        Commands::Auth => AuthManager::new().interactive_auth(),
        Commands::Deauth => {
            if AuthManager::new().remove_token()? {
                println!("✅ Removed the stored API key");
            } else {
                println!("No API key was stored");
            }
            Ok(())
        }
        Commands::Set { key, value } => {
            let config = ConfigOrchestrator::for_default_path()?;
            match (key, value) {
                (Some(key), Some(value)) => {
                    let message = config.mutate(|cfg| apply_setting(cfg, &key, Some(&value)))?;
                    println!("✅ {message}");
                }
                _ => {
                    config.load_with_cache()?.print_all();
                    println!("  (file: {})", path_display(config.path()));
                }
            }
            Ok(())
        }
        Commands::Unset { key } => {
            let config = ConfigOrchestrator::for_default_path()?;
            let message = config.mutate(|cfg| apply_setting(cfg, &key, None))?;
            println!("✅ {message}");
            Ok(())
        }
        Commands::Say { prompt } => {
            let orchestrator = build_orchestrator(args.model.as_deref(), true)?;
            run_say(prompt, orchestrator).await
        }
        Commands::Chat => {
            let orchestrator = build_orchestrator(args.model.as_deref(), args.no_persist)?;
            run_chat(App::new(orchestrator)).await
        }
    }
}

/// Apply `groundchat set`/`unset` to `config`. `value` of `None` unsets.
pub(crate) fn apply_setting(
    config: &mut Config,
    key: &str,
    value: Option<&str>,
) -> Result<String, Box<dyn Error>> {
    let value = value.map(str::trim).filter(|v| !v.is_empty());
    match key {
        "theme" => match value {
            Some(value) => {
                let theme: ThemeMode = value.parse()?;
                config.set_theme_mode(theme);
                Ok(format!("Set theme to: {theme}"))
            }
            None => {
                config.theme = None;
                Ok("Unset theme".to_string())
            }
        },
        "default-model" => {
            config.default_model = value.map(str::to_string);
            Ok(match value {
                Some(model) => format!("Set default-model to: {model}"),
                None => "Unset default-model".to_string(),
            })
        }
        "base-url" => {
            config.base_url = value.map(|url| url.trim_end_matches('/').to_string());
            Ok(match &config.base_url {
                Some(url) => format!("Set base-url to: {url}"),
                None => "Unset base-url".to_string(),
            })
        }
        _ => Err(format!("Unknown config key: {key} (expected theme, default-model or base-url)").into()),
    }
}

fn resolve_client(config: &Config) -> ClientInit {
    let (api_key, source) = AuthManager::new()
        .resolve_api_key()
        .ok_or(ApiError::MissingApiKey)?;
    info!(?source, "API key resolved");
    let client = GeminiClient::new(api_key, config.resolve_base_url())?;
    Ok(Arc::new(client) as Arc<dyn ModelClient>)
}

/// Assemble the orchestrator from the config file, the API key and the
/// preference store. A missing key is not an error here: the orchestrator
/// starts uninitialized and reports it through `last_error`.
pub fn build_orchestrator(
    model: Option<&str>,
    no_persist: bool,
) -> Result<RequestOrchestrator, Box<dyn Error>> {
    let config_orchestrator = ConfigOrchestrator::for_default_path()?;
    let config = config_orchestrator.load_with_cache()?;
    let model = config.resolve_model(model);
    info!(%model, path = %path_display(config_orchestrator.path()), "starting session");

    let preferences: Box<dyn PreferenceStore> = if no_persist {
        Box::new(MemoryPreferenceStore::new(config.theme_mode()))
    } else {
        Box::new(ConfigPreferenceStore::new(config_orchestrator))
    };

    Ok(RequestOrchestrator::new(
        resolve_client(&config),
        model,
        preferences,
    ))
}
