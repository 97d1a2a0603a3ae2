//! # System Interaction Layer
//!
//! Abstractions over the operating system, kept apart from the dispatch logic in `core`.
//!
//! ## Modules
//!
//! - **`launcher`**: starts shell commands detached from the caller and reaps them in the
//!   background.
//! - **`settings`**: reads and watches the desktop appearance preference behind the
//!   `NotificationSource` trait, with a `gsettings`-backed implementation.
//! - **`autostart`**: installs and removes the XDG autostart entry that runs the monitor at login.

/// Login autostart entry.
pub mod autostart;
/// Detached command launching.
pub mod launcher;
/// Desktop settings access.
pub mod settings;
