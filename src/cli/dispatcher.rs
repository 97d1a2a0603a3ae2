use anyhow::{Result, anyhow};
use clap::CommandFactory;
use colored::Colorize;

use crate::{
    cli::{Cli, handlers},
    constants::BACKGROUND_FLAG,
};

// --- Command Definition and Registry ---

/// Defines a system command, its aliases, and its handler function.
struct CommandDefinition {
    name: &'static str,
    aliases: &'static [&'static str],
    handler: fn(Vec<String>) -> Result<()>,
}

/// The single source of truth for all actions.
static COMMAND_REGISTRY: &[CommandDefinition] = &[
    CommandDefinition {
        name: "watch",
        aliases: &[BACKGROUND_FLAG, "monitor"],
        handler: handlers::watch::handle,
    },
    CommandDefinition {
        name: "apply",
        aliases: &[],
        handler: handlers::apply::handle,
    },
    CommandDefinition {
        name: "status",
        aliases: &[],
        handler: handlers::status::handle,
    },
    CommandDefinition {
        name: "list",
        aliases: &["ls"],
        handler: handlers::list::handle,
    },
    CommandDefinition {
        name: "add",
        aliases: &[],
        handler: handlers::add::handle,
    },
    CommandDefinition {
        name: "edit",
        aliases: &[],
        handler: handlers::edit::handle,
    },
    CommandDefinition {
        name: "enable",
        aliases: &[],
        handler: handlers::toggle::handle_enable,
    },
    CommandDefinition {
        name: "disable",
        aliases: &[],
        handler: handlers::toggle::handle_disable,
    },
    CommandDefinition {
        name: "remove",
        aliases: &["rm"],
        handler: handlers::remove::handle,
    },
    CommandDefinition {
        name: "const",
        aliases: &["constants"],
        handler: handlers::constant::handle,
    },
    CommandDefinition {
        name: "autostart",
        aliases: &[],
        handler: handlers::autostart::handle,
    },
    CommandDefinition {
        name: "help",
        aliases: &[],
        handler: handle_help,
    },
];

/// Finds a command definition in the registry by its name or alias.
fn find_command(name: &str) -> Option<&'static CommandDefinition> {
    COMMAND_REGISTRY
        .iter()
        .find(|cmd| cmd.name == name || cmd.aliases.contains(&name))
}

/// Routes the parsed command line to its handler. Without an action, prints the help.
pub fn dispatch(cli: Cli) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);

    let mut args = cli.args.into_iter();
    let Some(action) = args.next() else {
        return handle_help(Vec::new());
    };

    let command = find_command(&action).ok_or_else(|| {
        anyhow!(
            "Unknown action '{}'. Run '{}' to see what is available.",
            action.yellow(),
            "switchcraft help".cyan()
        )
    })?;
    (command.handler)(args.collect())
}

fn handle_help(_args: Vec<String>) -> Result<()> {
    Cli::command().print_help()?;
    Ok(())
}
