// src/cli/handlers/constant.rs

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use colored::Colorize;

use crate::{
    cli::handlers::commons,
    core::{config_store::ConfigStore, expander},
    models::Constants,
};

#[derive(Parser, Debug)]
#[command(
    no_binary_name = true,
    about = "Manages the named values available to every command."
)]
struct ConstArgs {
    #[command(subcommand)]
    action: Option<ConstAction>,
}

#[derive(Subcommand, Debug)]
enum ConstAction {
    /// Lists every constant.
    #[command(alias = "ls")]
    List,
    /// Defines or overwrites a constant.
    Set {
        name: String,
        /// The value. Several words are joined with spaces.
        #[arg(required = true, num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Deletes a constant.
    #[command(alias = "rm")]
    Unset {
        name: String,
        #[arg(long, short)]
        yes: bool,
    },
    /// Renames a constant, keeping its value.
    #[command(alias = "mv")]
    Rename { old: String, new: String },
}

/// Entry point for `switchcraft const`. Without a sub-action, lists the constants.
pub fn handle(args: Vec<String>) -> Result<()> {
    let const_args = ConstArgs::try_parse_from(&args)?;
    let store = commons::open_store()?;

    match const_args.action.unwrap_or(ConstAction::List) {
        ConstAction::List => list(&store.load_constants()),
        ConstAction::Set { name, value } => set(&store, &name, &value.join(" ")),
        ConstAction::Unset { name, yes } => unset(&store, &name, yes),
        ConstAction::Rename { old, new } => rename(&store, &old, &new),
    }
}

fn list(constants: &Constants) -> Result<()> {
    if constants.is_empty() {
        println!("{}", "No constants defined.".dimmed());
        return Ok(());
    }
    let width = constants.keys().map(String::len).max().unwrap_or(0);
    for (name, value) in constants {
        println!("  {:<width$}  {}", name.cyan().bold(), value, width = width);
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<()> {
    if expander::is_valid_constant_name(name) {
        Ok(())
    } else {
        Err(anyhow!(
            "Invalid constant name '{}'. Use letters, digits and underscores, not starting with a digit.",
            name
        ))
    }
}

fn set(store: &ConfigStore, name: &str, value: &str) -> Result<()> {
    validate_name(name)?;
    if value.trim().is_empty() {
        return Err(anyhow!("The value of '{}' must not be empty.", name));
    }

    let mut constants = store.load_constants();
    let previous = constants.insert(name.to_string(), value.to_string());
    save(store, &constants)?;

    match previous {
        Some(old) if old != value => println!(
            "{} {} {} {} {}",
            "Updated".green(),
            name.cyan().bold(),
            old.dimmed(),
            "→".blue(),
            value
        ),
        Some(_) => println!("{}", format!("'{}' is unchanged.", name).dimmed()),
        None => println!("{} {} = {}", "Defined".green(), name.cyan().bold(), value),
    }
    Ok(())
}

fn unset(store: &ConfigStore, name: &str, assume_yes: bool) -> Result<()> {
    let mut constants = store.load_constants();
    let Some(value) = constants.get(name).cloned() else {
        return Err(anyhow!("Constant '{}' is not defined.", name));
    };

    let prompt = format!("Delete constant '{}' (= {})?", name, value);
    if !commons::confirm(&prompt, assume_yes)? {
        println!("{}", "Nothing removed.".dimmed());
        return Ok(());
    }
    constants.remove(name);
    save(store, &constants)?;
    println!("{} {}", "Removed".red(), name.dimmed());
    Ok(())
}

fn rename(store: &ConfigStore, old: &str, new: &str) -> Result<()> {
    validate_name(new)?;
    let mut constants = store.load_constants();
    if old == new {
        return Ok(());
    }
    if constants.contains_key(new) {
        return Err(anyhow!("Constant '{}' already exists.", new));
    }
    let value = constants
        .remove(old)
        .ok_or_else(|| anyhow!("Constant '{}' is not defined.", old))?;
    constants.insert(new.to_string(), value);
    save(store, &constants)?;

    println!(
        "{} {} {} {}",
        "Renamed".green(),
        old.dimmed(),
        "→".blue(),
        new.cyan().bold()
    );
    Ok(())
}

fn save(store: &ConfigStore, constants: &Constants) -> Result<()> {
    store
        .save_constants(constants)
        .context("Failed to save the constants")
}
