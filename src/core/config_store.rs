//! # Config Store
//!
//! Loads, normalizes and persists the two command lists and the constants map.
//!
//! Loading never fails: a missing file, unreadable file or corrupt JSON all yield the empty
//! structure, and malformed entries are dropped one by one. Every consumer downstream of this
//! module therefore only ever sees canonical [`CommandEntry`] records.
use crate::{
    constants::{COMMANDS_FILENAME, CONSTANTS_FILENAME},
    core::{expander, paths},
    models::{CommandEntry, CommandSet, Constants, RawEntry, Theme},
};
use serde::Serialize;
use serde_json::Value;
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Errors raised while locating or writing the configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration directory could not be resolved.
    #[error(transparent)]
    Path(#[from] paths::PathError),
    /// Reading or writing a file failed.
    #[error("Filesystem error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// The data could not be turned into JSON.
    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] serde_json::Error),
    /// The temporary file could not be moved over the target.
    #[error("Could not replace '{path}': {source}")]
    Persist {
        path: String,
        #[source]
        source: tempfile::PersistError,
    },
    /// A constant name is not a valid shell variable name.
    #[error("Invalid constant name '{0}'. Use letters, digits and underscores, not starting with a digit.")]
    InvalidConstantName(String),
}

/// Handle on the directory that holds `commands.json` and `constants.json`.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    dir: PathBuf,
}

impl ConfigStore {
    /// A store rooted at `dir`. Nothing is touched until the first load or save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Opens the store at the default configuration directory.
    pub fn open_default() -> Result<Self, ConfigError> {
        Ok(Self::new(paths::get_config_dir()?))
    }

    /// The configuration directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of `commands.json`.
    pub fn commands_path(&self) -> PathBuf {
        self.dir.join(COMMANDS_FILENAME)
    }

    /// Path of `constants.json`.
    pub fn constants_path(&self) -> PathBuf {
        self.dir.join(CONSTANTS_FILENAME)
    }

    /// Reads the current command lists. Always returns a well-formed set.
    pub fn load_commands(&self) -> CommandSet {
        read_json(&self.commands_path())
            .map(|raw| normalize_commands(&raw))
            .unwrap_or_default()
    }

    /// Normalizes and writes the command lists.
    pub fn save_commands(&self, commands: &CommandSet) -> Result<(), ConfigError> {
        // Round-trip through the normalizer so nothing malformed is ever persisted.
        let value = serde_json::to_value(commands)?;
        write_json(&self.dir, &self.commands_path(), &normalize_commands(&value))
    }

    /// Reads the current constants. Always returns a (possibly empty) map.
    pub fn load_constants(&self) -> Constants {
        read_json(&self.constants_path())
            .map(|raw| normalize_constants(&raw))
            .unwrap_or_default()
    }

    /// Validates every name and writes the constants.
    pub fn save_constants(&self, constants: &Constants) -> Result<(), ConfigError> {
        if let Some(bad) = constants.keys().find(|name| !expander::is_valid_constant_name(name)) {
            return Err(ConfigError::InvalidConstantName(bad.clone()));
        }
        write_json(&self.dir, &self.constants_path(), constants)
    }
}

/// Builds a canonical [`CommandSet`] out of whatever JSON was persisted.
///
/// Missing or non-list theme keys become empty lists; entries keep their relative order and
/// malformed ones are dropped. Normalizing an already-normalized set is the identity.
pub fn normalize_commands(raw: &Value) -> CommandSet {
    let mut normalized = CommandSet::default();
    let Some(object) = raw.as_object() else {
        return normalized;
    };

    for theme in Theme::ALL {
        if let Some(Value::Array(entries)) = object.get(theme.label()) {
            *normalized.entries_mut(theme) = entries
                .iter()
                .cloned()
                .map(RawEntry::from)
                .filter_map(RawEntry::normalize)
                .collect::<Vec<CommandEntry>>();
        }
    }
    normalized
}

/// Builds a constants map out of the persisted JSON, keeping only string values under valid names.
pub fn normalize_constants(raw: &Value) -> Constants {
    let Some(object) = raw.as_object() else {
        return Constants::new();
    };
    object
        .iter()
        .filter_map(|(name, value)| match value {
            Value::String(s) if expander::is_valid_constant_name(name) => {
                Some((name.clone(), s.clone()))
            }
            _ => {
                log::debug!("Ignoring malformed constant '{}'", name);
                None
            }
        })
        .collect()
}

fn read_json(path: &Path) -> Option<Value> {
    if !path.exists() {
        log::debug!("'{}' does not exist yet, using defaults.", path.display());
        return None;
    }
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            log::warn!("Could not read '{}': {}. Using defaults.", path.display(), e);
            return None;
        }
    };
    match serde_json::from_str(&content) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("'{}' is not valid JSON ({}). Using defaults.", path.display(), e);
            None
        }
    }
}

/// Writes pretty-printed JSON through a temporary file in the same directory, so readers
/// never observe a half-written file.
fn write_json<T: Serialize>(dir: &Path, path: &Path, data: &T) -> Result<(), ConfigError> {
    let io_err = |source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    };

    fs::create_dir_all(dir).map_err(io_err)?;
    let mut content = serde_json::to_string_pretty(data)?;
    content.push('\n');

    let mut temp = NamedTempFile::new_in(dir).map_err(io_err)?;
    temp.write_all(content.as_bytes()).map_err(io_err)?;
    temp.flush().map_err(io_err)?;
    temp.persist(path).map_err(|source| ConfigError::Persist {
        path: path.display().to_string(),
        source,
    })?;

    log::debug!("Saved '{}'", path.display());
    Ok(())
}
