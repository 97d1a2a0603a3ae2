// src/cli/handlers/remove.rs

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use crate::{cli::handlers::commons, models::Theme};

#[derive(Parser, Debug)]
#[command(no_binary_name = true, about = "Deletes the command at a position.")]
struct RemoveArgs {
    theme: Theme,

    /// 1-based position, as shown by `list`.
    position: usize,

    /// Do not ask for confirmation.
    #[arg(long, short)]
    yes: bool,
}

/// Entry point for `switchcraft remove`.
pub fn handle(args: Vec<String>) -> Result<()> {
    let remove_args = RemoveArgs::try_parse_from(&args)?;

    let store = commons::open_store()?;
    let mut commands = store.load_commands();
    let command = commons::entry_at(&mut commands, remove_args.theme, remove_args.position)?
        .command
        .clone();

    let prompt = format!("Remove {} command '{}'?", remove_args.theme, command);
    if !commons::confirm(&prompt, remove_args.yes)? {
        println!("{}", "Nothing removed.".dimmed());
        return Ok(());
    }

    commands.remove(remove_args.theme, remove_args.position);
    store
        .save_commands(&commands)
        .context("Failed to save the command list")?;

    println!("{} {}", "Removed".red(), command.dimmed());
    Ok(())
}
