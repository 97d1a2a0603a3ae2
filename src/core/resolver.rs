// src/core/resolver.rs

use crate::models::{CommandSet, Theme};

/// Returns the commands to run for `theme`, in persisted order, without disabled or blank ones.
///
/// Shape detection already happened in the config store, so this only has to filter.
pub fn resolve(commands: &CommandSet, theme: Theme) -> Vec<String> {
    commands
        .entries(theme)
        .iter()
        .filter(|entry| entry.enabled)
        .filter(|entry| !entry.command.trim().is_empty())
        .map(|entry| entry.command.clone())
        .collect()
}
