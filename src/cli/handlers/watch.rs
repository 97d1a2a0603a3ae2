// src/cli/handlers/watch.rs

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    cli::handlers::commons,
    core::monitor::ThemeMonitor,
    system::{launcher::ShellLauncher, settings::GsettingsSource},
};

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Runs the theme's commands every time the desktop appearance changes."
)]
struct WatchArgs {}

/// Entry point for `switchcraft watch` (and `switchcraft --background`).
///
/// Blocks until Ctrl+C or SIGTERM. Nothing is dispatched for the theme that is active at
/// startup; use `apply` for that.
pub fn handle(args: Vec<String>) -> Result<()> {
    WatchArgs::try_parse_from(&args)?;

    let store = commons::open_store()?;
    let monitor = ThemeMonitor::new(store, ShellLauncher::new());
    let mut source = GsettingsSource::new();

    let subscription = match monitor.attach(&mut source) {
        Ok(subscription) => subscription,
        Err(e) => {
            // Without a notification source the monitor simply never fires.
            log::error!("Theme notifications are unavailable: {}. No commands will run.", e);
            return Ok(());
        }
    };

    wait_for_shutdown().context("Could not listen for shutdown signals")?;
    log::info!("Shutting down.");
    subscription.cancel();
    Ok(())
}

/// Waits for Ctrl+C, or on Unix for SIGTERM/SIGHUP (sent on session logout).
fn wait_for_shutdown() -> std::io::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};
            let mut terminate = signal(SignalKind::terminate())?;
            let mut hangup = signal(SignalKind::hangup())?;
            tokio::select! {
                result = tokio::signal::ctrl_c() => result?,
                _ = terminate.recv() => log::debug!("Received SIGTERM"),
                _ = hangup.recv() => log::debug!("Received SIGHUP"),
            }
            Ok::<(), std::io::Error>(())
        }
        #[cfg(not(unix))]
        {
            tokio::signal::ctrl_c().await
        }
    })
}
