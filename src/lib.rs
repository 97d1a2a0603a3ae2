//! switchcraft: run your own shell commands whenever the desktop switches between light and
//! dark mode.

/// Argument parsing, the action registry and the action handlers.
pub mod cli;
/// Names shared across the crate.
pub mod constants;
/// Configuration, constant expansion and theme dispatch.
pub mod core;
/// Persisted data types.
pub mod models;
/// Operating system access.
pub mod system;
