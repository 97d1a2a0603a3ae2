//! Desktop settings access: reading the appearance preference and watching it for changes.
//!
//! The monitor only depends on the [`NotificationSource`] trait. [`GsettingsSource`] is the
//! production implementation and drives the `gsettings` command-line tool: `gsettings get` for
//! the current value and a long-running `gsettings monitor` for change events.

use crate::constants::INTERFACE_SCHEMA;
use std::ffi::OsString;
use std::io::{BufRead, BufReader};
use std::process::{Child, Command as StdCommand, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use thiserror::Error;

/// Errors raised by a [`NotificationSource`].
#[derive(Error, Debug)]
pub enum SettingsError {
    /// The settings tool could not be executed.
    #[error("Could not run '{program}': {source}")]
    Unavailable {
        program: String,
        #[source]
        source: std::io::Error,
    },
    /// The settings tool ran but reported an error.
    #[error("'{program}' failed while reading '{key}': {stderr}")]
    ReadFailed {
        program: String,
        key: String,
        stderr: String,
    },
    /// The printed value was not a string.
    #[error("Could not parse settings value '{0}'")]
    Parse(String),
    /// The listener thread could not be spawned.
    #[error("Could not start the settings listener thread: {0}")]
    Thread(std::io::Error),
}

/// Invoked with the new raw value each time the watched key changes.
pub type ChangeCallback = Box<dyn FnMut(&str) + Send + 'static>;

/// A push-based source of settings change events.
pub trait NotificationSource {
    /// Reads the current value of `key`.
    fn current(&self, key: &str) -> Result<String, SettingsError>;

    /// Starts delivering changes of `key` to `callback` until the returned handle is cancelled
    /// or dropped. Nothing is delivered for the value at subscription time.
    fn subscribe(&mut self, key: &str, callback: ChangeCallback) -> Result<Subscription, SettingsError>;
}

/// Handle to an active subscription. Dropping it stops delivery.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// A handle that runs `cancel` once, on [`cancel`](Self::cancel) or drop.
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Stops delivery and waits for the source to wind down.
    pub fn cancel(mut self) {
        self.run_cancel();
    }

    fn run_cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_cancel();
    }
}

// --- gsettings ---

const INITIAL_BACKOFF: Duration = Duration::from_millis(100);
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Reads and watches a GSettings schema through the `gsettings` tool.
#[derive(Debug, Clone)]
pub struct GsettingsSource {
    program: OsString,
    leading_args: Vec<OsString>,
    schema: String,
}

impl Default for GsettingsSource {
    fn default() -> Self {
        Self::new()
    }
}

impl GsettingsSource {
    /// Watches `org.gnome.desktop.interface` through the `gsettings` on `PATH`.
    pub fn new() -> Self {
        Self::with_program("gsettings", Vec::<OsString>::new(), INTERFACE_SCHEMA)
    }

    /// Uses a custom program. `leading_args` go before the `get`/`monitor` sub-command.
    pub fn with_program(
        program: impl Into<OsString>,
        leading_args: impl IntoIterator<Item = impl Into<OsString>>,
        schema: impl Into<String>,
    ) -> Self {
        Self {
            program: program.into(),
            leading_args: leading_args.into_iter().map(Into::into).collect(),
            schema: schema.into(),
        }
    }

    fn command(&self, action: &str, key: &str) -> StdCommand {
        let mut command = StdCommand::new(&self.program);
        command
            .args(&self.leading_args)
            .arg(action)
            .arg(&self.schema)
            .arg(key)
            .stdin(Stdio::null());
        command
    }

    fn program_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }

    fn spawn_monitor(&self, key: &str) -> Result<Child, SettingsError> {
        self.command("monitor", key)
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| SettingsError::Unavailable {
                program: self.program_name(),
                source,
            })
    }
}

impl NotificationSource for GsettingsSource {
    fn current(&self, key: &str) -> Result<String, SettingsError> {
        let output = self
            .command("get", key)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| SettingsError::Unavailable {
                program: self.program_name(),
                source,
            })?;

        if !output.status.success() {
            return Err(SettingsError::ReadFailed {
                program: self.program_name(),
                key: key.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_gvariant_string(&stdout).ok_or_else(|| SettingsError::Parse(stdout.trim().to_string()))
    }

    fn subscribe(&mut self, key: &str, callback: ChangeCallback) -> Result<Subscription, SettingsError> {
        // The first spawn happens here so that a missing tool is reported to the caller.
        let first_child = self.spawn_monitor(key)?;

        let shutdown = Arc::new(AtomicBool::new(false));
        let current_child = Arc::new(Mutex::new(None::<Child>));
        let listener = Listener {
            source: self.clone(),
            key: key.to_string(),
            shutdown: Arc::clone(&shutdown),
            current_child: Arc::clone(&current_child),
        };

        let thread = thread::Builder::new()
            .name("settings-listener".into())
            .spawn(move || listener.run(first_child, callback))
            .map_err(SettingsError::Thread)?;

        Ok(Subscription::new(move || {
            stop_listener(&shutdown, &current_child, thread);
        }))
    }
}

/// State shared between the listener thread and the subscription handle.
struct Listener {
    source: GsettingsSource,
    key: String,
    shutdown: Arc<AtomicBool>,
    current_child: Arc<Mutex<Option<Child>>>,
}

impl Listener {
    /// Reads change lines until shut down, restarting the monitor process with exponential
    /// backoff whenever it goes away.
    fn run(self, first_child: Child, mut callback: ChangeCallback) {
        let mut next_child = Some(first_child);
        let mut backoff = INITIAL_BACKOFF;

        while !self.is_shutdown() {
            let child = match next_child.take() {
                Some(child) => Ok(child),
                None => self.source.spawn_monitor(&self.key),
            };

            match child {
                Ok(child) => {
                    log::debug!("Watching '{}' (PID: {})", self.key, child.id());
                    if self.read_events(child, &mut callback) {
                        backoff = INITIAL_BACKOFF;
                    }
                    if !self.is_shutdown() {
                        log::warn!("Settings monitor for '{}' stopped, restarting...", self.key);
                    }
                }
                Err(e) => log::error!("{}. Retrying in {:?}", e, backoff),
            }

            self.sleep_unless_shutdown(backoff);
            backoff = (backoff * 2).min(MAX_BACKOFF);
        }

        log::debug!("Settings listener for '{}' stopped", self.key);
    }

    /// Processes one monitor process until its output ends. Returns whether any event arrived.
    fn read_events(&self, mut child: Child, callback: &mut ChangeCallback) -> bool {
        let Some(stdout) = child.stdout.take() else {
            let _ = child.kill();
            let _ = child.wait();
            return false;
        };
        *self.lock_child() = Some(child);

        // A cancel that raced with the store above would have found no child to kill.
        if self.is_shutdown() {
            self.reap_child();
            return false;
        }

        let mut received = false;
        for line in BufReader::new(stdout).lines() {
            if self.is_shutdown() {
                break;
            }
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    log::warn!("Read error on settings monitor: {}", e);
                    break;
                }
            };
            match parse_monitor_line(&line, &self.key) {
                Some(value) => {
                    received = true;
                    log::debug!("'{}' changed to '{}'", self.key, value);
                    callback(&value);
                }
                None => log::trace!("Ignoring monitor line: {}", line),
            }
        }

        self.reap_child();
        received
    }

    fn reap_child(&self) {
        if let Some(mut child) = self.lock_child().take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }

    fn lock_child(&self) -> std::sync::MutexGuard<'_, Option<Child>> {
        self.current_child.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Sleeps in short steps so a cancel is never held up by a long backoff.
    fn sleep_unless_shutdown(&self, duration: Duration) {
        let mut remaining = duration;
        while !self.is_shutdown() && !remaining.is_zero() {
            let step = remaining.min(INITIAL_BACKOFF);
            thread::sleep(step);
            remaining -= step;
        }
    }

    fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Relaxed)
    }
}

fn stop_listener(shutdown: &AtomicBool, current_child: &Mutex<Option<Child>>, thread: JoinHandle<()>) {
    shutdown.store(true, Ordering::Relaxed);
    if let Some(child) = current_child
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .as_mut()
    {
        // Killing the monitor closes its stdout, which unblocks the reader.
        if let Err(e) = child.kill() {
            log::debug!("Failed to kill settings monitor {}: {}", child.id(), e);
        }
    }
    if thread.join().is_err() {
        log::error!("Settings listener thread panicked.");
    }
}

// --- Output parsing ---

/// Parses a line of `gsettings monitor` output (`color-scheme: 'prefer-dark'`) for `key`.
pub fn parse_monitor_line(line: &str, key: &str) -> Option<String> {
    let (line_key, value) = line.trim().split_once(':')?;
    if line_key.trim() != key {
        return None;
    }
    parse_gvariant_string(value)
}

/// Unwraps a printed GVariant string (`'prefer-dark'`, `"it's"` or `@ms 'x'`).
pub fn parse_gvariant_string(text: &str) -> Option<String> {
    let mut text = text.trim();
    // Type annotations such as `@ms` or `@s` precede the literal.
    if text.starts_with('@') {
        text = text.split_once(char::is_whitespace)?.1.trim_start();
    }
    let quote = text.chars().next()?;
    if quote != '\'' && quote != '"' {
        // Unquoted values (e.g. `nothing`) are passed through as-is.
        return if text.is_empty() { None } else { Some(text.to_string()) };
    }
    let inner = text.strip_prefix(quote)?.strip_suffix(quote)?;

    let mut unescaped = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            unescaped.push(chars.next()?);
        } else {
            unescaped.push(c);
        }
    }
    Some(unescaped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_parse_monitor_line() {
        assert_eq!(
            parse_monitor_line("color-scheme: 'prefer-dark'", "color-scheme").as_deref(),
            Some("prefer-dark")
        );
        assert_eq!(
            parse_monitor_line("  color-scheme: 'default'\n", "color-scheme").as_deref(),
            Some("default")
        );
        assert_eq!(parse_monitor_line("gtk-theme: 'Adwaita'", "color-scheme"), None);
        assert_eq!(parse_monitor_line("garbage", "color-scheme"), None);
    }

    #[test]
    fn test_parse_gvariant_string() {
        assert_eq!(parse_gvariant_string("'prefer-light'\n").as_deref(), Some("prefer-light"));
        assert_eq!(parse_gvariant_string("\"it's\"").as_deref(), Some("it's"));
        assert_eq!(parse_gvariant_string(r"'it\'s'").as_deref(), Some("it's"));
        assert_eq!(parse_gvariant_string("@ms 'x'").as_deref(), Some("x"));
        assert_eq!(parse_gvariant_string("''").as_deref(), Some(""));
        assert_eq!(parse_gvariant_string("'unterminated"), None);
        assert_eq!(parse_gvariant_string("   "), None);
    }

    #[test]
    fn test_missing_program_is_unavailable() {
        let mut source = GsettingsSource::with_program(
            "switchcraft-no-such-gsettings",
            Vec::<OsString>::new(),
            INTERFACE_SCHEMA,
        );
        let result = source.subscribe("color-scheme", Box::new(|_| {}));
        assert!(matches!(result, Err(SettingsError::Unavailable { .. })));
        assert!(matches!(
            source.current("color-scheme"),
            Err(SettingsError::Unavailable { .. })
        ));
    }

    /// A stand-in for `gsettings` running `script`: `$1` is the action, `$2` the schema, `$3`
    /// the key.
    #[cfg(unix)]
    fn stand_in(script: &str) -> GsettingsSource {
        GsettingsSource::with_program("sh", ["-c", script, "fake-gsettings"], INTERFACE_SCHEMA)
    }

    #[cfg(unix)]
    fn fake_gsettings() -> GsettingsSource {
        stand_in(
            r#"
            if [ "$1" = monitor ]; then
                printf '%s\n' "gtk-theme: 'Adwaita'" "$3: 'prefer-dark'" "$3: 'default'"
                exec sleep 30
            elif [ "$1" = get ]; then
                echo "'prefer-dark'"
            else
                exit 1
            fi
        "#,
        )
    }

    #[cfg(unix)]
    #[test]
    fn test_current_reads_value() {
        let source = fake_gsettings();
        assert_eq!(source.current("color-scheme").unwrap(), "prefer-dark");
    }

    #[cfg(unix)]
    #[test]
    fn test_subscribe_delivers_changes_until_cancelled() {
        let mut source = fake_gsettings();
        let (tx, rx) = mpsc::channel();
        let subscription = source
            .subscribe(
                "color-scheme",
                Box::new(move |value| {
                    let _ = tx.send(value.to_string());
                }),
            )
            .unwrap();

        let timeout = Duration::from_secs(10);
        assert_eq!(rx.recv_timeout(timeout).unwrap(), "prefer-dark");
        assert_eq!(rx.recv_timeout(timeout).unwrap(), "default");

        subscription.cancel();
        // The callback (and with it the sender) is gone once the listener has stopped.
        assert!(matches!(
            rx.recv_timeout(timeout),
            Err(mpsc::RecvTimeoutError::Disconnected)
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_monitor_is_restarted_when_its_stream_ends() {
        // Every monitor run reports one change and exits straight away.
        let mut source = stand_in(
            r#"
            if [ "$1" = monitor ]; then
                printf '%s\n' "$3: 'prefer-dark'"
            fi
        "#,
        );
        let (tx, rx) = mpsc::channel();
        let subscription = source
            .subscribe(
                "color-scheme",
                Box::new(move |value| {
                    let _ = tx.send(value.to_string());
                }),
            )
            .unwrap();

        let timeout = Duration::from_secs(10);
        for _ in 0..3 {
            assert_eq!(rx.recv_timeout(timeout).unwrap(), "prefer-dark");
        }

        subscription.cancel();
        while let Ok(value) = rx.try_recv() {
            assert_eq!(value, "prefer-dark");
        }
        assert!(matches!(
            rx.recv_timeout(timeout),
            Err(mpsc::RecvTimeoutError::Disconnected)
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_silent_restarts_back_off_and_cancel_stays_prompt() {
        use std::fs;
        use std::time::Instant;

        // Every monitor run leaves a mark and exits without reporting anything.
        let dir = tempfile::TempDir::new().unwrap();
        let runs = dir.path().join("runs");
        let script = format!(
            r#"if [ "$1" = monitor ]; then echo run >> '{}'; fi"#,
            runs.display()
        );
        let mut source = stand_in(&script);
        let subscription = source.subscribe("color-scheme", Box::new(|_| {})).unwrap();

        // Sleeps of 100, 200, 400 and 800 ms put the listener in its 1.6 s backoff by now.
        thread::sleep(Duration::from_secs(2));
        let count = fs::read_to_string(&runs).unwrap_or_default().lines().count();
        assert!((3..=8).contains(&count), "monitor started {} times", count);

        let started = Instant::now();
        subscription.cancel();
        assert!(started.elapsed() < Duration::from_secs(1));

        let after_cancel = fs::read_to_string(&runs).unwrap_or_default().lines().count();
        thread::sleep(Duration::from_millis(500));
        assert_eq!(
            fs::read_to_string(&runs).unwrap_or_default().lines().count(),
            after_cancel
        );
    }
}
