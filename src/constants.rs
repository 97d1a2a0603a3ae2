// src/constants.rs

/// The name of the directory holding switchcraft configuration (inside the platform config dir).
pub const CONFIG_DIR_NAME: &str = "switchcraft";

/// Environment variable that overrides the configuration directory.
pub const CONFIG_DIR_ENV: &str = "SWITCHCRAFT_CONFIG_DIR";

/// Environment variable read by the logger for its filter.
pub const LOG_ENV: &str = "SWITCHCRAFT_LOG";

/// The file holding the `light`/`dark` command lists.
pub const COMMANDS_FILENAME: &str = "commands.json";

/// The file holding the user constants.
pub const CONSTANTS_FILENAME: &str = "constants.json";

/// GSettings schema that carries the desktop appearance preference.
pub const INTERFACE_SCHEMA: &str = "org.gnome.desktop.interface";

/// The key inside [`INTERFACE_SCHEMA`] that holds the appearance preference.
pub const COLOR_SCHEME_KEY: &str = "color-scheme";

/// The value of [`COLOR_SCHEME_KEY`] that means "dark".
pub const PREFER_DARK: &str = "prefer-dark";

/// Application id, also used as the autostart desktop file name.
pub const APP_ID: &str = "io.github.switchcraft.Switchcraft";

/// Flag passed by the autostart entry to run the monitor without any UI.
pub const BACKGROUND_FLAG: &str = "--background";
