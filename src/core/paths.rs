// src/core/paths.rs

use crate::constants::{CONFIG_DIR_ENV, CONFIG_DIR_NAME};
use lazy_static::lazy_static;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

lazy_static! {
    static ref CONFIG_DIR: Mutex<Option<PathBuf>> = Mutex::new(None);
}

/// Errors raised while resolving directories.
#[derive(Error, Debug)]
pub enum PathError {
    /// The platform has no config directory.
    #[error("Could not find system config directory.")]
    ConfigDirNotFound,
    /// `SWITCHCRAFT_CONFIG_DIR` references something that cannot be expanded.
    #[error("Could not expand config directory template '{template}': {reason}")]
    Expansion { template: String, reason: String },
    /// The directory did not exist and could not be created.
    #[error("Could not create config directory at '{path}': {source}")]
    ConfigDirCreation {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Returns the path to the switchcraft configuration directory (`~/.config/switchcraft`),
/// honouring `SWITCHCRAFT_CONFIG_DIR` when it is set. Creates it if it doesn't exist.
///
/// Memoized: the first call computes and caches the path, subsequent calls return the cached
/// value.
pub fn get_config_dir() -> Result<PathBuf, PathError> {
    let mut cached = CONFIG_DIR.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(path) = &*cached {
        return Ok(path.clone());
    }

    let config_path = match env::var(CONFIG_DIR_ENV) {
        Ok(template) if !template.trim().is_empty() => expand_dir_template(&template)?,
        _ => dirs::config_dir()
            .ok_or(PathError::ConfigDirNotFound)?
            .join(CONFIG_DIR_NAME),
    };

    if !config_path.exists() {
        fs::create_dir_all(&config_path).map_err(|e| PathError::ConfigDirCreation {
            path: config_path.display().to_string(),
            source: e,
        })?;
    }

    *cached = Some(config_path.clone());
    Ok(config_path)
}

/// Expands `~` and `$VAR`/`${VAR}` in a directory template.
pub fn expand_dir_template(template: &str) -> Result<PathBuf, PathError> {
    let expanded = shellexpand::full(template.trim()).map_err(|e| PathError::Expansion {
        template: template.to_string(),
        reason: e.to_string(),
    })?;
    Ok(PathBuf::from(expanded.into_owned()))
}

/// Returns the XDG autostart directory (`~/.config/autostart`). Does not create it.
pub fn get_autostart_dir() -> Result<PathBuf, PathError> {
    dirs::config_dir()
        .map(|dir| dir.join("autostart"))
        .ok_or(PathError::ConfigDirNotFound)
}
