// src/core/mod.rs

/// JSON persistence of commands and constants.
pub mod config_store;
/// Constant substitution and environment building.
pub mod expander;
/// Theme change handling.
pub mod monitor;
/// Configuration and autostart directories.
pub mod paths;
/// Selection of the commands to run for a theme.
pub mod resolver;
