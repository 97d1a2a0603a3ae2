// src/bin/switchcraft.rs

use clap::Parser;
use colored::*;
use switchcraft::{
    cli::{Cli, dispatcher},
    constants::LOG_ENV,
};

/// The main entry point of `switchcraft`.
/// It sets up logging, parses arguments, dispatches to the action handler,
/// and performs centralized error handling.
fn main() {
    env_logger::Builder::from_env(env_logger::Env::new().filter_or(LOG_ENV, "info"))
        .format_timestamp_secs()
        .init();

    if let Err(e) = dispatcher::dispatch(Cli::parse()) {
        // Handler argument errors (including `--help` of an action) are printed by clap itself.
        if let Some(clap_err) = e.downcast_ref::<clap::Error>() {
            clap_err.exit();
        }

        eprintln!("\n{}: {:#}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}
