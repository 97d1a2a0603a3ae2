// src/models.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::ffi::OsString;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::constants::PREFER_DARK;

/// The user constants, keyed by name. Ordered so that every walk over it is deterministic.
pub type Constants = BTreeMap<String, String>;

/// A process environment. Kept as `OsString` so variables that are not valid UTF-8 survive.
pub type Environment = HashMap<OsString, OsString>;

// --- THEME ---

/// The normalized appearance mode. There is no third state.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Any appearance other than the dark preference.
    Light,
    /// `color-scheme` is `prefer-dark`.
    Dark,
}

impl Theme {
    /// Both themes, in the order they are shown to the user.
    pub const ALL: [Self; 2] = [Self::Light, Self::Dark];

    /// Classifies a raw `color-scheme` value. Only the exact dark sentinel maps to `Dark`.
    pub fn from_color_scheme(raw: &str) -> Self {
        if raw == PREFER_DARK { Self::Dark } else { Self::Light }
    }

    /// The persisted label of this theme.
    pub fn label(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A theme name other than `light` or `dark`.
#[derive(Error, Debug, PartialEq, Eq)]
#[error("Unknown theme '{0}'. Expected 'light' or 'dark'.")]
pub struct UnknownTheme(pub String);

impl FromStr for Theme {
    type Err = UnknownTheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            _ => Err(UnknownTheme(s.to_string())),
        }
    }
}

// --- PERSISTED COMMAND MODELS ---

/// A single shell command bound to a theme. Identity is its position in the list.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CommandEntry {
    /// Shell command line, run through `sh -c`.
    pub command: String,
    /// Disabled entries are kept but never run.
    pub enabled: bool,
}

impl CommandEntry {
    /// An enabled entry.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            enabled: true,
        }
    }
}

/// An entry as it may appear on disk: the legacy bare-string form, the record form, or anything
/// else (which is later dropped).
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(from = "Value")]
pub enum RawEntry {
    Bare(String),
    Record {
        command: Option<Value>,
        enabled: Option<Value>,
    },
    Other(Value),
}

impl From<Value> for RawEntry {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => Self::Bare(s),
            Value::Object(mut map) => Self::Record {
                command: map.remove("command"),
                enabled: map.remove("enabled"),
            },
            other => Self::Other(other),
        }
    }
}

impl RawEntry {
    /// Converts the on-disk shape into the canonical record, or `None` if it is malformed.
    pub fn normalize(self) -> Option<CommandEntry> {
        match self {
            Self::Bare(command) => {
                if command.is_empty() {
                    return None;
                }
                Some(CommandEntry::new(command))
            }
            Self::Record { command, enabled } => {
                let command = match command {
                    Some(Value::String(s)) if !s.is_empty() => s,
                    _ => return None,
                };
                let enabled = enabled.as_ref().is_none_or(is_truthy);
                Some(CommandEntry { command, enabled })
            }
            Self::Other(_) => None,
        }
    }
}

/// Loose truthiness for legacy `enabled` values that were not written as booleans.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// The two ordered command lists. Both keys are always present once serialized.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandSet {
    pub dark: Vec<CommandEntry>,
    pub light: Vec<CommandEntry>,
}

impl CommandSet {
    /// The entries of `theme`, in execution order.
    pub fn entries(&self, theme: Theme) -> &[CommandEntry] {
        match theme {
            Theme::Light => &self.light,
            Theme::Dark => &self.dark,
        }
    }

    /// Mutable access to the entries of `theme`.
    pub fn entries_mut(&mut self, theme: Theme) -> &mut Vec<CommandEntry> {
        match theme {
            Theme::Light => &mut self.light,
            Theme::Dark => &mut self.dark,
        }
    }

    /// Looks up an entry by its 1-based position, as shown to the user.
    pub fn get_mut(&mut self, theme: Theme, position: usize) -> Option<&mut CommandEntry> {
        let index = position.checked_sub(1)?;
        self.entries_mut(theme).get_mut(index)
    }

    /// Removes an entry by its 1-based position.
    pub fn remove(&mut self, theme: Theme, position: usize) -> Option<CommandEntry> {
        let entries = self.entries_mut(theme);
        let index = position.checked_sub(1)?;
        if index < entries.len() {
            Some(entries.remove(index))
        } else {
            None
        }
    }

    /// Whether both lists are empty.
    pub fn is_empty(&self) -> bool {
        self.light.is_empty() && self.dark.is_empty()
    }
}
