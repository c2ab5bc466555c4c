mod registry;

pub use registry::{all_commands, find_command, Command, CommandInvocation};

use crate::core::app::App;
use crate::core::session::ThemeMode;

pub const KEY_HELP: &str =
    "Enter send • Alt+Enter newline • Ctrl+L clear • Ctrl+T theme • PgUp/PgDn scroll • Esc quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    Continue,
    ProcessAsMessage(String),
    Exit,
}

/// Route a line from the input box: known slash commands run against `app`,
/// anything else is sent as a chat message.
pub fn process_input(app: &mut App, input: &str) -> CommandResult {
    let trimmed = input.trim();

    let Some(rest) = trimmed.strip_prefix('/') else {
        return CommandResult::ProcessAsMessage(input.to_string());
    };

    let mut parts = rest.splitn(2, char::is_whitespace);
    let command_name = match parts.next() {
        Some(name) if !name.is_empty() => name,
        _ => return CommandResult::ProcessAsMessage(input.to_string()),
    };
    let args = parts.next().unwrap_or("").trim();

    match find_command(command_name) {
        Some(command) => {
            (command.handler)(app, CommandInvocation { args })
        }
        None => CommandResult::ProcessAsMessage(input.to_string()),
    }
}

pub(super) fn handle_help(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    let usages: Vec<&str> = all_commands().iter().map(|c| c.usage).collect();
    app.set_status(format!("{} • {}", usages.join(", "), KEY_HELP));
    CommandResult::Continue
}

pub(super) fn handle_clear(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    app.clear_chat();
    CommandResult::Continue
}

pub(super) fn handle_theme(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    if invocation.args.is_empty() {
        app.toggle_theme();
        return CommandResult::Continue;
    }
    match invocation.args.parse::<ThemeMode>() {
        Ok(mode) => app.set_theme(mode),
        Err(err) => app.set_status(err),
    }
    CommandResult::Continue
}

pub(super) fn handle_quit(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    app.request_exit();
    CommandResult::Exit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::create_test_app;

    #[test]
    fn plain_text_is_processed_as_message() {
        let mut app = create_test_app();
        assert_eq!(
            process_input(&mut app, "hello there"),
            CommandResult::ProcessAsMessage("hello there".to_string())
        );
    }

    #[test]
    fn unknown_commands_are_sent_verbatim() {
        let mut app = create_test_app();
        assert_eq!(
            process_input(&mut app, "/usr/bin is a path"),
            CommandResult::ProcessAsMessage("/usr/bin is a path".to_string())
        );
        assert_eq!(
            process_input(&mut app, "/"),
            CommandResult::ProcessAsMessage("/".to_string())
        );
    }

    #[test]
    fn theme_without_args_toggles() {
        let mut app = create_test_app();
        assert_eq!(process_input(&mut app, "/theme"), CommandResult::Continue);
        assert_eq!(app.state().theme, ThemeMode::Dark);
        process_input(&mut app, "/theme");
        assert_eq!(app.state().theme, ThemeMode::Light);
    }

    #[test]
    fn theme_with_name_applies_it() {
        let mut app = create_test_app();
        process_input(&mut app, "/theme DARK");
        assert_eq!(app.state().theme, ThemeMode::Dark);
        process_input(&mut app, "/theme dark");
        assert_eq!(app.state().theme, ThemeMode::Dark);
    }

    #[test]
    fn unknown_theme_reports_status_and_keeps_theme() {
        let mut app = create_test_app();
        process_input(&mut app, "/theme sepia");
        assert_eq!(app.state().theme, ThemeMode::Light);
        assert!(app.status.as_deref().unwrap_or_default().contains("sepia"));
    }

    #[test]
    fn clear_empties_transcript() {
        let mut app = create_test_app();
        app.begin_send("hello");
        assert_eq!(process_input(&mut app, "/clear"), CommandResult::Continue);
        assert!(app.state().messages.is_empty());
    }

    #[test]
    fn help_lists_every_command() {
        let mut app = create_test_app();
        process_input(&mut app, "/help");
        let status = app.status.clone().unwrap_or_default();
        for command in all_commands() {
            assert!(status.contains(command.usage));
        }
        assert!(status.contains("Ctrl+T"));
    }

    #[test]
    fn quit_requests_exit() {
        let mut app = create_test_app();
        assert_eq!(process_input(&mut app, "/quit"), CommandResult::Exit);
        assert!(app.exit_requested);
    }
}
