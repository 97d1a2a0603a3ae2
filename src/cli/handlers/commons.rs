// src/cli/handlers/commons.rs

// Shared functions used by multiple handlers.

use anyhow::{Context, Result, anyhow};
use colored::Colorize;
use dialoguer::{Confirm, theme::ColorfulTheme};

use crate::{
    core::config_store::ConfigStore,
    models::{CommandEntry, CommandSet, Theme},
};

/// Opens the configuration store at its default location.
pub fn open_store() -> Result<ConfigStore> {
    ConfigStore::open_default().context("Could not open the switchcraft configuration directory")
}

/// Turns the words of a command given on the command line back into one command string.
///
/// A single word is taken verbatim (the user already quoted the whole command). Several words
/// are re-quoted so that `add dark notify-send "Dark mode"` stores what the user typed.
pub fn join_command_words(words: &[String]) -> Result<String> {
    let command = match words {
        [] => return Err(anyhow!("No command given.")),
        [single] => single.trim().to_string(),
        _ => shlex::try_join(words.iter().map(String::as_str))
            .map_err(|e| anyhow!("Could not quote the command: {}", e))?,
    };
    if command.is_empty() {
        return Err(anyhow!("The command must not be empty."));
    }
    Ok(command)
}

/// Returns the entry at 1-based `position`, or a helpful error.
pub fn entry_at(commands: &mut CommandSet, theme: Theme, position: usize) -> Result<&mut CommandEntry> {
    let count = commands.entries(theme).len();
    commands
        .get_mut(theme, position)
        .ok_or_else(|| out_of_range(theme, position, count))
}

/// The error for a position outside `1..=count`.
pub fn out_of_range(theme: Theme, position: usize, count: usize) -> anyhow::Error {
    if count == 0 {
        anyhow!("There are no {} commands.", theme)
    } else {
        anyhow!(
            "No {} command at position {}. Valid positions are 1 to {}.",
            theme,
            position,
            count
        )
    }
}

/// Prints the commands of one theme with their 1-based position.
pub fn print_theme_entries(theme: Theme, entries: &[CommandEntry]) {
    let header = match theme {
        Theme::Light => "☀ light".yellow().bold(),
        Theme::Dark => "☾ dark".blue().bold(),
    };
    println!("{} {}", header, format!("({})", entries.len()).dimmed());

    if entries.is_empty() {
        println!("    {}", "no commands".dimmed());
        return;
    }
    for (i, entry) in entries.iter().enumerate() {
        let position = format!("{:>3}.", i + 1);
        if entry.enabled {
            println!("  {} {}", position.dimmed(), entry.command.green());
        } else {
            println!(
                "  {} {} {}",
                position.dimmed(),
                entry.command.dimmed().strikethrough(),
                "(disabled)".dimmed()
            );
        }
    }
}

/// Asks for confirmation unless `assume_yes` is set.
pub fn confirm(prompt: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()
        .context("Could not read confirmation from the terminal (use --yes to skip it)")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_single_word_is_verbatim() {
        let cmd = join_command_words(&words(&["pkill -USR1 kitty && notify-send 'dark'"])).unwrap();
        assert_eq!(cmd, "pkill -USR1 kitty && notify-send 'dark'");
    }

    #[test]
    fn test_several_words_are_requoted() {
        let cmd = join_command_words(&words(&["notify-send", "Dark mode"])).unwrap();
        assert!(cmd.starts_with("notify-send "));
        assert_eq!(shlex::split(&cmd).unwrap(), words(&["notify-send", "Dark mode"]));
    }

    #[test]
    fn test_empty_command_is_rejected() {
        assert!(join_command_words(&[]).is_err());
        assert!(join_command_words(&words(&["   "])).is_err());
    }

    #[test]
    fn test_entry_at_reports_range() {
        let mut set = CommandSet::default();
        let err = entry_at(&mut set, Theme::Dark, 1).unwrap_err();
        assert!(err.to_string().contains("no dark commands"));

        set.dark.push(CommandEntry::new("a"));
        assert_eq!(entry_at(&mut set, Theme::Dark, 1).unwrap().command, "a");
        let err = entry_at(&mut set, Theme::Dark, 2).unwrap_err();
        assert!(err.to_string().contains("1 to 1"));
    }
}
