//! # Theme Monitor
//!
//! Bridges desktop appearance notifications to command dispatch.
//!
//! Every notification is handled on its own: the raw `color-scheme` value is classified as
//! light or dark, the command lists and constants are read fresh from the [`ConfigStore`], and
//! each enabled command is expanded and handed to the [`Launcher`] in list order. Launches are
//! fire-and-forget; a command that cannot be started is logged and the rest still go out.
//!
//! There is no debounce and no memory of the previous theme. Two notifications in a row run the
//! list twice.
use crate::{
    constants::COLOR_SCHEME_KEY,
    core::{config_store::ConfigStore, expander, resolver},
    models::{Environment, Theme},
    system::{
        launcher::Launcher,
        settings::{NotificationSource, SettingsError, Subscription},
    },
};
use std::env;

/// What happened during one dispatch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSummary {
    /// The theme whose list was run.
    pub theme: Theme,
    /// Commands handed to the launcher successfully.
    pub launched: usize,
    /// Commands whose process could not be started.
    pub failed: usize,
}

/// Dispatches theme commands through a [`Launcher`].
#[derive(Debug)]
pub struct ThemeMonitor<L> {
    store: ConfigStore,
    launcher: L,
}

impl<L: Launcher> ThemeMonitor<L> {
    /// A monitor reading `store` and starting commands through `launcher`.
    pub fn new(store: ConfigStore, launcher: L) -> Self {
        Self { store, launcher }
    }

    /// The store read on every dispatch.
    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    /// Handles one raw `color-scheme` notification.
    pub fn handle_change(&self, raw_value: &str) -> DispatchSummary {
        let theme = Theme::from_color_scheme(raw_value);
        log::info!("Appearance changed ('{}'), switching to {}.", raw_value, theme);
        self.dispatch(theme)
    }

    /// Runs every enabled command of `theme` against the currently persisted configuration,
    /// with the environment of this process plus the constants.
    pub fn dispatch(&self, theme: Theme) -> DispatchSummary {
        self.dispatch_with_env(theme, &env::vars_os().collect())
    }

    /// Like [`dispatch`](Self::dispatch), on top of an explicit base environment.
    pub fn dispatch_with_env(&self, theme: Theme, base_env: &Environment) -> DispatchSummary {
        let commands = resolver::resolve(&self.store.load_commands(), theme);
        let constants = self.store.load_constants();

        let mut summary = DispatchSummary {
            theme,
            launched: 0,
            failed: 0,
        };
        if commands.is_empty() {
            log::debug!("No enabled {} commands.", theme);
            return summary;
        }

        let command_env = expander::build_environment(base_env, &constants);

        for command in &commands {
            let expanded = expander::expand(command, &constants);
            match self.launcher.launch(&expanded, &command_env) {
                Ok(()) => {
                    log::debug!("Dispatched: {}", expanded);
                    summary.launched += 1;
                }
                Err(e) => {
                    log::warn!("{}", e);
                    summary.failed += 1;
                }
            }
        }

        log::info!(
            "Dispatched {} {} command(s), {} failed to start.",
            summary.launched,
            theme,
            summary.failed
        );
        summary
    }
}

impl<L: Launcher + Send + 'static> ThemeMonitor<L> {
    /// Subscribes to `color-scheme` changes on `source`, handing the monitor over to the
    /// subscription. Nothing is dispatched for the value at subscription time.
    pub fn attach(self, source: &mut dyn NotificationSource) -> Result<Subscription, SettingsError> {
        log::info!(
            "Watching '{}' with configuration in '{}'",
            COLOR_SCHEME_KEY,
            self.store.dir().display()
        );
        source.subscribe(
            COLOR_SCHEME_KEY,
            Box::new(move |raw_value| {
                self.handle_change(raw_value);
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CommandEntry, CommandSet, Constants};
    use crate::system::launcher::LaunchError;
    use std::ffi::{OsStr, OsString};
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    type Launched = Arc<Mutex<Vec<(String, Environment)>>>;

    /// Records every launch; refuses commands that contain `fail_marker`.
    #[derive(Clone, Default)]
    struct RecordingLauncher {
        launched: Launched,
        fail_marker: Option<String>,
    }

    impl RecordingLauncher {
        fn failing_on(marker: &str) -> Self {
            Self {
                fail_marker: Some(marker.to_string()),
                ..Default::default()
            }
        }

        fn commands(&self) -> Vec<String> {
            self.launched.lock().unwrap().iter().map(|(c, _)| c.clone()).collect()
        }
    }

    impl Launcher for RecordingLauncher {
        fn launch(&self, command_line: &str, env: &Environment) -> Result<(), LaunchError> {
            if let Some(marker) = &self.fail_marker {
                if command_line.contains(marker.as_str()) {
                    return Err(LaunchError::SpawnFailed(
                        command_line.to_string(),
                        std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
                    ));
                }
            }
            self.launched
                .lock()
                .unwrap()
                .push((command_line.to_string(), env.clone()));
            Ok(())
        }
    }

    /// Collects callbacks so tests can emit changes by hand.
    #[derive(Default)]
    struct FakeSource {
        subscribers: Arc<Mutex<Vec<(String, crate::system::settings::ChangeCallback)>>>,
    }

    impl FakeSource {
        fn emit(&self, key: &str, value: &str) {
            for (subscribed_key, callback) in self.subscribers.lock().unwrap().iter_mut() {
                if subscribed_key == key {
                    callback(value);
                }
            }
        }
    }

    impl NotificationSource for FakeSource {
        fn current(&self, _key: &str) -> Result<String, SettingsError> {
            Ok("default".to_string())
        }

        fn subscribe(
            &mut self,
            key: &str,
            callback: crate::system::settings::ChangeCallback,
        ) -> Result<Subscription, SettingsError> {
            self.subscribers.lock().unwrap().push((key.to_string(), callback));
            let subscribers = Arc::clone(&self.subscribers);
            Ok(Subscription::new(move || subscribers.lock().unwrap().clear()))
        }
    }

    fn store_with(dark: &[&str], light: &[&str]) -> (TempDir, ConfigStore) {
        let dir = TempDir::new().unwrap();
        let store = ConfigStore::new(dir.path());
        let set = CommandSet {
            dark: dark.iter().map(|c| CommandEntry::new(*c)).collect(),
            light: light.iter().map(|c| CommandEntry::new(*c)).collect(),
        };
        store.save_commands(&set).unwrap();
        (dir, store)
    }

    #[test]
    fn test_dark_sentinel_runs_dark_list_everything_else_light() {
        let (_dir, store) = store_with(&["dark-cmd"], &["light-cmd"]);
        let launcher = RecordingLauncher::default();
        let monitor = ThemeMonitor::new(store, launcher.clone());

        assert_eq!(monitor.handle_change("prefer-dark").theme, Theme::Dark);
        assert_eq!(monitor.handle_change("default").theme, Theme::Light);
        assert_eq!(monitor.handle_change("").theme, Theme::Light);
        assert_eq!(monitor.handle_change("prefer-light").theme, Theme::Light);

        assert_eq!(
            launcher.commands(),
            vec!["dark-cmd", "light-cmd", "light-cmd", "light-cmd"]
        );
    }

    #[test]
    fn test_dispatch_follows_order_and_skips_disabled() {
        let (_dir, store) = store_with(&["one", "two", "three"], &[]);
        let mut set = store.load_commands();
        set.dark[1].enabled = false;
        store.save_commands(&set).unwrap();

        let launcher = RecordingLauncher::default();
        let summary = ThemeMonitor::new(store, launcher.clone()).dispatch(Theme::Dark);

        assert_eq!(launcher.commands(), vec!["one", "three"]);
        assert_eq!(summary.launched, 2);
        assert_eq!(summary.failed, 0);
    }

    #[test]
    fn test_failed_launch_does_not_stop_the_rest() {
        let (_dir, store) = store_with(
            &["notify-send first", "switchcraft-missing-binary", "notify-send third"],
            &[],
        );
        let launcher = RecordingLauncher::failing_on("missing-binary");
        let summary = ThemeMonitor::new(store, launcher.clone()).handle_change("prefer-dark");

        assert_eq!(launcher.commands(), vec!["notify-send first", "notify-send third"]);
        assert_eq!(
            summary,
            DispatchSummary {
                theme: Theme::Dark,
                launched: 2,
                failed: 1
            }
        );
    }

    #[test]
    fn test_constants_are_expanded_and_exported() {
        let (_dir, store) = store_with(&["set-wallpaper $WALLPAPER ${ACCENT}"], &[]);
        let mut constants = Constants::new();
        constants.insert("WALLPAPER".to_string(), "/tmp/night.png".to_string());
        constants.insert("ACCENT".to_string(), "purple".to_string());
        store.save_constants(&constants).unwrap();

        let launcher = RecordingLauncher::default();
        ThemeMonitor::new(store, launcher.clone()).dispatch(Theme::Dark);

        let launched = launcher.launched.lock().unwrap();
        let (command, env) = launched.first().unwrap();
        assert_eq!(command, "set-wallpaper /tmp/night.png purple");
        assert_eq!(env.get(OsStr::new("WALLPAPER")), Some(&OsString::from("/tmp/night.png")));
        assert_eq!(env.get(OsStr::new("ACCENT")), Some(&OsString::from("purple")));
        // The rest of the inherited environment is still there.
        if let Some(path) = env::var_os("PATH") {
            assert_eq!(env.get(OsStr::new("PATH")), Some(&path));
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_environment_still_dispatches() {
        use std::os::unix::ffi::OsStrExt;

        let (_dir, store) = store_with(&["dark-cmd $ACCENT"], &[]);
        let mut constants = Constants::new();
        constants.insert("ACCENT".to_string(), "purple".to_string());
        store.save_constants(&constants).unwrap();

        let raw = OsStr::from_bytes(b"\xff\xfe").to_os_string();
        let mut base_env: Environment = env::vars_os().collect();
        base_env.insert(OsStr::from_bytes(b"SWITCHCRAFT_\xff").to_os_string(), raw.clone());
        base_env.insert("SWITCHCRAFT_RAW".into(), raw.clone());

        let launcher = RecordingLauncher::default();
        let monitor = ThemeMonitor::new(store, launcher.clone());
        let summary = monitor.dispatch_with_env(Theme::Dark, &base_env);
        assert_eq!(summary.launched, 1);

        let launched = launcher.launched.lock().unwrap();
        let (command, env) = launched.first().unwrap();
        assert_eq!(command, "dark-cmd purple");
        assert_eq!(env.get(OsStr::new("SWITCHCRAFT_RAW")), Some(&raw));
        assert_eq!(env.get(OsStr::from_bytes(b"SWITCHCRAFT_\xff")), Some(&raw));
        assert_eq!(env.get(OsStr::new("ACCENT")), Some(&OsString::from("purple")));
    }

    #[test]
    fn test_config_is_read_fresh_on_every_notification() {
        let (_dir, store) = store_with(&["before"], &[]);
        let writer = store.clone();
        let launcher = RecordingLauncher::default();
        let monitor = ThemeMonitor::new(store, launcher.clone());

        monitor.handle_change("prefer-dark");
        let mut set = writer.load_commands();
        set.dark = vec![CommandEntry::new("after"), CommandEntry::new("and-another")];
        writer.save_commands(&set).unwrap();
        monitor.handle_change("prefer-dark");

        assert_eq!(launcher.commands(), vec!["before", "after", "and-another"]);
    }

    #[test]
    fn test_missing_config_dispatches_nothing() {
        let dir = TempDir::new().unwrap();
        let launcher = RecordingLauncher::default();
        let monitor = ThemeMonitor::new(ConfigStore::new(dir.path()), launcher.clone());
        let summary = monitor.handle_change("prefer-dark");
        assert_eq!(summary.launched, 0);
        assert!(launcher.commands().is_empty());
    }

    #[test]
    fn test_attach_reacts_only_to_notifications() {
        let (_dir, store) = store_with(&["dark-cmd"], &["light-cmd"]);
        let launcher = RecordingLauncher::default();
        let mut source = FakeSource::default();

        let subscription = ThemeMonitor::new(store, launcher.clone())
            .attach(&mut source)
            .unwrap();
        assert!(launcher.commands().is_empty(), "nothing runs at subscription time");

        source.emit(COLOR_SCHEME_KEY, "prefer-dark");
        source.emit(COLOR_SCHEME_KEY, "prefer-dark");
        source.emit("gtk-theme", "prefer-dark");
        source.emit(COLOR_SCHEME_KEY, "default");
        assert_eq!(launcher.commands(), vec!["dark-cmd", "dark-cmd", "light-cmd"]);

        subscription.cancel();
        source.emit(COLOR_SCHEME_KEY, "prefer-dark");
        assert_eq!(launcher.commands().len(), 3);
    }
}
