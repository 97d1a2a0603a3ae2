// src/cli/handlers/autostart.rs

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;

use crate::system::autostart::Autostart;

#[derive(Parser, Debug)]
#[command(
    no_binary_name = true,
    about = "Starts the monitor automatically when you log in."
)]
struct AutostartArgs {
    #[command(subcommand)]
    action: Option<AutostartAction>,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum AutostartAction {
    /// Writes the login entry that runs `switchcraft --background`.
    #[command(alias = "enable")]
    On,
    /// Removes the login entry.
    #[command(alias = "disable")]
    Off,
    /// Shows whether the login entry exists.
    Status,
}

/// Entry point for `switchcraft autostart`.
pub fn handle(args: Vec<String>) -> Result<()> {
    let autostart_args = AutostartArgs::try_parse_from(&args)?;
    let autostart = Autostart::open_default().context("Could not locate the autostart directory")?;

    match autostart_args.action.unwrap_or(AutostartAction::Status) {
        AutostartAction::On => {
            let path = autostart.enable().context("Failed to enable autostart")?;
            println!(
                "{} The monitor will start at login ({}).",
                "✔".green(),
                path.display().to_string().dimmed()
            );
        }
        AutostartAction::Off => {
            if autostart.disable().context("Failed to disable autostart")? {
                println!("{} Autostart disabled.", "✔".green());
            } else {
                println!("{}", "Autostart was not enabled.".dimmed());
            }
        }
        AutostartAction::Status => {
            let state = if autostart.is_enabled() { "on".green() } else { "off".yellow() };
            println!("Autostart: {}", state);
        }
    }
    Ok(())
}
