// src/cli/handlers/status.rs

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use crate::{
    cli::handlers::{apply::current_theme, commons},
    models::Theme,
    system::{autostart::Autostart, settings::GsettingsSource},
};

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Shows the current theme, configuration and autostart state."
)]
struct StatusArgs {}

/// Entry point for `switchcraft status`.
pub fn handle(args: Vec<String>) -> Result<()> {
    StatusArgs::try_parse_from(&args)?;

    let theme = match current_theme(&GsettingsSource::new()) {
        Ok(theme) => theme.to_string().cyan().bold(),
        Err(e) => {
            log::debug!("Could not read current theme: {:#}", e);
            "unavailable".red()
        }
    };
    println!("{:<14}{}", "Theme:".bold(), theme);

    let store = commons::open_store()?;
    println!("{:<14}{}", "Config:".bold(), store.dir().display());

    let commands = store.load_commands();
    for theme in Theme::ALL {
        let entries = commands.entries(theme);
        let enabled = entries.iter().filter(|e| e.enabled).count();
        println!(
            "{:<14}{} {}",
            format!("  {}:", theme).bold(),
            entries.len(),
            format!("({} enabled)", enabled).dimmed()
        );
    }
    println!("{:<14}{}", "Constants:".bold(), store.load_constants().len());

    let autostart = match Autostart::open_default() {
        Ok(autostart) if autostart.is_enabled() => "on".green(),
        Ok(_) => "off".yellow(),
        Err(_) => "unknown".red(),
    };
    println!("{:<14}{}", "Autostart:".bold(), autostart);
    Ok(())
}
