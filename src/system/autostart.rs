// src/system/autostart.rs

use crate::constants::{APP_ID, BACKGROUND_FLAG};
use crate::core::paths::{self, PathError};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while managing the autostart entry.
#[derive(Error, Debug)]
pub enum AutostartError {
    /// The autostart directory could not be resolved.
    #[error(transparent)]
    Path(#[from] PathError),
    /// The path of this executable is unknown.
    #[error("Could not determine the path of the running executable: {0}")]
    CurrentExe(std::io::Error),
    /// Writing or removing the entry failed.
    #[error("Filesystem Error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Manages the XDG autostart entry that starts the monitor at login.
#[derive(Debug, Clone)]
pub struct Autostart {
    dir: PathBuf,
}

impl Autostart {
    /// Manages entries in `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Uses `~/.config/autostart`.
    pub fn open_default() -> Result<Self, AutostartError> {
        Ok(Self::new(paths::get_autostart_dir()?))
    }

    /// Path of the `.desktop` file.
    pub fn entry_path(&self) -> PathBuf {
        self.dir.join(format!("{}.desktop", APP_ID))
    }

    /// Whether the entry exists.
    pub fn is_enabled(&self) -> bool {
        self.entry_path().is_file()
    }

    /// Writes the desktop entry for the currently running executable.
    pub fn enable(&self) -> Result<PathBuf, AutostartError> {
        let exe = std::env::current_exe().map_err(AutostartError::CurrentExe)?;
        self.enable_for(&exe)
    }

    /// Writes the desktop entry so that `exe --background` runs at login.
    pub fn enable_for(&self, exe: &Path) -> Result<PathBuf, AutostartError> {
        let path = self.entry_path();
        let io_err = |source| AutostartError::Io {
            path: path.display().to_string(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(io_err)?;
        fs::write(&path, desktop_entry(exe)).map_err(io_err)?;
        log::debug!("Autostart entry written to '{}'", path.display());
        Ok(path)
    }

    /// Removes the desktop entry. Returns whether there was one.
    pub fn disable(&self) -> Result<bool, AutostartError> {
        let path = self.entry_path();
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path).map_err(|source| AutostartError::Io {
            path: path.display().to_string(),
            source,
        })?;
        log::debug!("Autostart entry '{}' removed", path.display());
        Ok(true)
    }
}

fn desktop_entry(exe: &Path) -> String {
    format!(
        "[Desktop Entry]\n\
         Type=Application\n\
         Name=Switchcraft\n\
         Comment=Run commands when the desktop switches between light and dark mode\n\
         Exec={} {}\n\
         Icon={}\n\
         Terminal=false\n\
         NoDisplay=true\n\
         X-GNOME-Autostart-enabled=true\n",
        quote_exec_arg(&exe.to_string_lossy()),
        BACKGROUND_FLAG,
        APP_ID
    )
}

/// Encodes one `Exec` argument for a desktop entry file.
///
/// Arguments with reserved characters are double-quoted with `"`, `` ` ``, `$` and `\` escaped.
/// The general string escaping of the file format is applied on top of that, so a literal
/// backslash ends up as four. A literal `%` is doubled so it is not read as a field code.
fn quote_exec_arg(arg: &str) -> String {
    const RESERVED: &[char] = &[
        ' ', '\t', '\n', '\r', '"', '\'', '\\', '>', '<', '~', '|', '&', ';', '$', '*', '?', '#',
        '(', ')', '`',
    ];
    let arg = arg.replace('%', "%%");
    if !arg.contains(RESERVED) {
        return arg;
    }
    let mut quoted = String::with_capacity(arg.len() + 2);
    quoted.push('"');
    for c in arg.chars() {
        if matches!(c, '"' | '`' | '$' | '\\') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    escape_string_value(&quoted)
}

/// The escaping every string value in a desktop entry goes through.
fn escape_string_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str(r"\\"),
            '\n' => escaped.push_str(r"\n"),
            '\t' => escaped.push_str(r"\t"),
            '\r' => escaped.push_str(r"\r"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_enable_writes_background_entry() {
        let dir = TempDir::new().unwrap();
        let autostart = Autostart::new(dir.path().join("autostart"));
        assert!(!autostart.is_enabled());

        let path = autostart.enable_for(Path::new("/usr/bin/switchcraft")).unwrap();
        assert!(autostart.is_enabled());

        let content = fs::read_to_string(path).unwrap();
        assert!(content.starts_with("[Desktop Entry]\n"));
        assert!(content.contains("\nExec=/usr/bin/switchcraft --background\n"));
    }

    #[test]
    fn test_disable_removes_entry_once() {
        let dir = TempDir::new().unwrap();
        let autostart = Autostart::new(dir.path());
        autostart.enable_for(Path::new("/opt/switchcraft")).unwrap();

        assert!(autostart.disable().unwrap());
        assert!(!autostart.is_enabled());
        assert!(!autostart.disable().unwrap());
    }

    #[test]
    fn test_exec_path_with_spaces_is_quoted() {
        assert_eq!(quote_exec_arg("/usr/bin/switchcraft"), "/usr/bin/switchcraft");
        assert_eq!(
            quote_exec_arg("/home/me/My Apps/switchcraft"),
            r#""/home/me/My Apps/switchcraft""#
        );
        assert_eq!(quote_exec_arg("/tmp/$x"), r#""/tmp/\\$x""#);
        assert_eq!(quote_exec_arg("/tmp/say \"hi\""), r#""/tmp/say \\"hi\\"""#);
    }

    #[test]
    fn test_exec_backslash_is_escaped_twice() {
        assert_eq!(quote_exec_arg(r"/tmp/a\b"), r#""/tmp/a\\\\b""#);
    }

    #[test]
    fn test_exec_percent_is_doubled() {
        assert_eq!(quote_exec_arg("/opt/100%/switchcraft"), "/opt/100%%/switchcraft");
    }
}
