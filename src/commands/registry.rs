use super::CommandResult;
use crate::core::app::App;

pub type CommandHandler = fn(&mut App, CommandInvocation<'_>) -> CommandResult;

pub struct Command {
    pub name: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
}

#[derive(Clone, Copy)]
pub struct CommandInvocation<'a> {
    pub args: &'a str,
}

pub fn all_commands() -> &'static [Command] {
    COMMANDS
}

pub fn find_command(name: &str) -> Option<&'static Command> {
    all_commands()
        .iter()
        .find(|command| command.name.eq_ignore_ascii_case(name))
}

const COMMANDS: &[Command] = &[
    Command {
        name: "help",
        usage: "/help",
        handler: super::handle_help,
    },
    Command {
        name: "clear",
        usage: "/clear",
        handler: super::handle_clear,
    },
    Command {
        name: "theme",
        usage: "/theme [light|dark]",
        handler: super::handle_theme,
    },
    Command {
        name: "quit",
        usage: "/quit",
        handler: super::handle_quit,
    },
];
