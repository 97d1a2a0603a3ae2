// src/cli/handlers/mod.rs

/// `add`
pub mod add;
/// `apply`
pub mod apply;
/// `autostart`
pub mod autostart;
/// Helpers shared by the handlers.
pub mod commons;
/// `const`
pub mod constant;
/// `edit`
pub mod edit;
/// `list`
pub mod list;
/// `remove`
pub mod remove;
/// `status`
pub mod status;
/// `enable` and `disable`
pub mod toggle;
/// `watch`
pub mod watch;
