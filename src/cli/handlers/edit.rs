// src/cli/handlers/edit.rs

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use crate::{cli::handlers::commons, models::Theme};

#[derive(Parser, Debug)]
#[command(no_binary_name = true, about = "Replaces the command at a position.")]
struct EditArgs {
    theme: Theme,

    /// 1-based position, as shown by `list`.
    position: usize,

    /// The new shell command.
    #[arg(required = true, num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
    command: Vec<String>,
}

/// Entry point for `switchcraft edit`.
pub fn handle(args: Vec<String>) -> Result<()> {
    let edit_args = EditArgs::try_parse_from(&args)?;
    let command = commons::join_command_words(&edit_args.command)?;

    let store = commons::open_store()?;
    let mut commands = store.load_commands();
    let entry = commons::entry_at(&mut commands, edit_args.theme, edit_args.position)?;
    let old_command = std::mem::replace(&mut entry.command, command.clone());

    store
        .save_commands(&commands)
        .context("Failed to save the command list")?;

    println!(
        "{} {} {} {} {}",
        "Updated".green(),
        format!("{} #{}:", edit_args.theme, edit_args.position).bold(),
        old_command.dimmed(),
        "→".blue(),
        command.cyan()
    );
    Ok(())
}
