// src/cli/handlers/add.rs

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use crate::{
    cli::handlers::commons,
    models::{CommandEntry, Theme},
};

#[derive(Parser, Debug)]
#[command(no_binary_name = true, about = "Appends a command to a theme.")]
struct AddArgs {
    /// The theme the command belongs to.
    theme: Theme,

    /// Store the command without enabling it.
    #[arg(long)]
    disabled: bool,

    /// The shell command. Several words are joined with shell quoting.
    #[arg(required = true, num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
    command: Vec<String>,
}

/// Entry point for `switchcraft add`.
pub fn handle(args: Vec<String>) -> Result<()> {
    let add_args = AddArgs::try_parse_from(&args)?;
    let command = commons::join_command_words(&add_args.command)?;

    let store = commons::open_store()?;
    let mut commands = store.load_commands();
    let entries = commands.entries_mut(add_args.theme);
    entries.push(CommandEntry {
        command: command.clone(),
        enabled: !add_args.disabled,
    });
    let position = entries.len();

    store
        .save_commands(&commands)
        .context("Failed to save the command list")?;

    println!(
        "{} {} {} {}",
        "Added".green(),
        format!("{} #{}:", add_args.theme, position).bold(),
        command.cyan(),
        if add_args.disabled { "(disabled)".dimmed() } else { "".normal() }
    );
    Ok(())
}
