// src/cli/handlers/list.rs

use anyhow::Result;
use clap::Parser;

use crate::{cli::handlers::commons, models::Theme};

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Lists the commands of each theme.")]
struct ListArgs {
    /// Only show this theme.
    theme: Option<Theme>,
}

/// Entry point for `switchcraft list`.
pub fn handle(args: Vec<String>) -> Result<()> {
    let list_args = ListArgs::try_parse_from(&args)?;
    let commands = commons::open_store()?.load_commands();

    let themes: Vec<Theme> = match list_args.theme {
        Some(theme) => vec![theme],
        None => Theme::ALL.to_vec(),
    };
    for (i, theme) in themes.into_iter().enumerate() {
        if i > 0 {
            println!();
        }
        commons::print_theme_entries(theme, commands.entries(theme));
    }
    Ok(())
}
