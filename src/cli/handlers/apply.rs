// src/cli/handlers/apply.rs

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use crate::{
    cli::handlers::commons,
    constants::COLOR_SCHEME_KEY,
    core::monitor::ThemeMonitor,
    models::Theme,
    system::{
        launcher::ShellLauncher,
        settings::{GsettingsSource, NotificationSource},
    },
};

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Runs the commands of a theme once, right now."
)]
struct ApplyArgs {
    /// The theme to run. Defaults to the theme currently active on the desktop.
    theme: Option<Theme>,
}

/// Entry point for `switchcraft apply`.
pub fn handle(args: Vec<String>) -> Result<()> {
    let apply_args = ApplyArgs::try_parse_from(&args)?;

    let theme = match apply_args.theme {
        Some(theme) => theme,
        None => current_theme(&GsettingsSource::new())
            .context("Could not read the current appearance. Pass 'light' or 'dark' explicitly")?,
    };

    let store = commons::open_store()?;
    let summary = ThemeMonitor::new(store, ShellLauncher::new()).dispatch(theme);

    if summary.launched == 0 && summary.failed == 0 {
        println!("{}", format!("No enabled {} commands. Nothing to run.", theme).yellow());
        return Ok(());
    }
    println!(
        "{} {} {} command(s).",
        "→".blue(),
        "Launched".green(),
        summary.launched.to_string().bold()
    );
    if summary.failed > 0 {
        println!(
            "{}",
            format!("{} command(s) could not be started.", summary.failed).red()
        );
    }
    Ok(())
}

/// Reads and classifies the current `color-scheme`.
pub fn current_theme(source: &dyn NotificationSource) -> Result<Theme> {
    let raw = source.current(COLOR_SCHEME_KEY)?;
    Ok(Theme::from_color_scheme(&raw))
}
