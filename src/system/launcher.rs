// src/system/launcher.rs

use crate::models::Environment;
use std::process::{Child, Command as StdCommand, Stdio};
use std::thread;
use thiserror::Error;

/// Why a command could not be started.
#[derive(Error, Debug)]
pub enum LaunchError {
    /// The command line was empty or only whitespace.
    #[error("No command specified to run.")]
    EmptyCommand,
    /// The shell itself could not be spawned.
    #[error("Command '{0}' could not be started: {1}")]
    SpawnFailed(String, std::io::Error),
}

/// Something that can start a command without waiting for it.
///
/// Implementations must return as soon as the process exists. Anything that happens after that
/// (a non-zero exit, a missing binary reported by the shell) is not the caller's concern.
pub trait Launcher {
    /// Starts `command_line` with exactly the variables in `env`.
    fn launch(&self, command_line: &str, env: &Environment) -> Result<(), LaunchError>;
}

/// Launches commands through the host shell (`sh -c` or `cmd /C`), detached from the caller.
#[derive(Debug, Clone, Default)]
pub struct ShellLauncher;

impl ShellLauncher {
    /// A launcher for the platform shell.
    pub fn new() -> Self {
        Self
    }

    /// The command that will interpret `command_line` exactly as a user would type it.
    fn shell_command(command_line: &str) -> StdCommand {
        if cfg!(target_os = "windows") {
            let mut command = StdCommand::new("cmd");
            command.arg("/C").arg(command_line);
            command
        } else {
            let mut command = StdCommand::new("sh");
            command.arg("-c").arg(command_line);
            command
        }
    }
}

impl Launcher for ShellLauncher {
    fn launch(&self, command_line: &str, env: &Environment) -> Result<(), LaunchError> {
        if command_line.trim().is_empty() {
            return Err(LaunchError::EmptyCommand);
        }

        let mut command = Self::shell_command(command_line);
        command
            .env_clear()
            .envs(env)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // Own process group, so a Ctrl+C aimed at the monitor does not reach the children.
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }

        let child = command
            .spawn()
            .map_err(|e| LaunchError::SpawnFailed(command_line.to_string(), e))?;
        log::debug!("Launched '{}' (PID: {})", command_line, child.id());

        reap_in_background(child, command_line.to_string());
        Ok(())
    }
}

/// Waits for the child on a throwaway thread so it never lingers as a zombie.
fn reap_in_background(mut child: Child, command_line: String) {
    let pid = child.id();
    let spawned = thread::Builder::new()
        .name(format!("reap-{}", pid))
        .spawn(move || match child.wait() {
            Ok(status) if status.success() => {
                log::debug!("'{}' (PID: {}) finished.", command_line, pid);
            }
            Ok(status) => {
                log::debug!("'{}' (PID: {}) exited with {}.", command_line, pid, status);
            }
            Err(e) => log::debug!("Could not wait on PID {}: {}", pid, e),
        });

    if let Err(e) = spawned {
        // The child keeps running either way; it is only left unreaped until we exit.
        log::warn!("Could not start reaper thread for PID {}: {}", pid, e);
    }
}
