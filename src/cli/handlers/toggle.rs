// src/cli/handlers/toggle.rs

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use crate::{cli::handlers::commons, models::Theme};

#[derive(Parser, Debug)]
#[command(no_binary_name = true)]
struct ToggleArgs {
    theme: Theme,

    /// 1-based position, as shown by `list`.
    position: usize,
}

/// Entry point for `switchcraft enable`.
pub fn handle_enable(args: Vec<String>) -> Result<()> {
    set_enabled(args, true)
}

/// Entry point for `switchcraft disable`.
pub fn handle_disable(args: Vec<String>) -> Result<()> {
    set_enabled(args, false)
}

fn set_enabled(args: Vec<String>, enabled: bool) -> Result<()> {
    let toggle_args = ToggleArgs::try_parse_from(&args)?;

    let store = commons::open_store()?;
    let mut commands = store.load_commands();
    let entry = commons::entry_at(&mut commands, toggle_args.theme, toggle_args.position)?;

    let verb = if enabled { "Enabled".green() } else { "Disabled".yellow() };
    if entry.enabled == enabled {
        println!(
            "{}",
            format!("'{}' is already {}.", entry.command, verb.to_lowercase()).dimmed()
        );
        return Ok(());
    }
    entry.enabled = enabled;
    let command = entry.command.clone();

    store
        .save_commands(&commands)
        .context("Failed to save the command list")?;
    println!(
        "{} {} {}",
        verb,
        format!("{} #{}:", toggle_args.theme, toggle_args.position).bold(),
        command.cyan()
    );
    Ok(())
}
