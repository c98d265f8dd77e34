//! System module: subprocess execution and working-directory scoping.
//!
//! `CommandRunner` is the seam between the bootstrap steps and the external
//! tools. `SystemRunner` is the production implementation; tests swap in a
//! recording fake.

pub mod workdir;

pub use workdir::WorkdirGuard;

use crate::error::{BootstrapError, Result};
use crate::models::CommandSpec;
use std::process::{Command, ExitStatus, Output};

/// Synchronous subprocess execution.
///
/// Both methods block until the child exits and fail on a non-zero exit.
/// Children run in the process's current working directory.
pub trait CommandRunner {
    /// Run with inherited stdio; only the exit status is inspected.
    fn run(&self, command: &CommandSpec) -> Result<()>;

    /// Run and return stdout followed by stderr as text.
    fn run_capture(&self, command: &CommandSpec) -> Result<String>;
}

/// Production implementation of CommandRunner backed by `std::process`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        SystemRunner
    }

    fn command(spec: &CommandSpec) -> Command {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args);
        cmd
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, command: &CommandSpec) -> Result<()> {
        log::debug!("[System] Running: {}", command);

        let status = Self::command(command)
            .status()
            .map_err(|source| BootstrapError::Spawn {
                command: command.to_string(),
                source,
            })?;

        check_status(command, status)
    }

    fn run_capture(&self, command: &CommandSpec) -> Result<String> {
        log::debug!("[System] Capturing: {}", command);

        let output = Self::command(command)
            .output()
            .map_err(|source| BootstrapError::Spawn {
                command: command.to_string(),
                source,
            })?;

        check_status(command, output.status)?;
        Ok(combined_output(&output))
    }
}

/// Map a child's exit status to the runner's error type.
pub fn check_status(command: &CommandSpec, status: ExitStatus) -> Result<()> {
    if status.success() {
        Ok(())
    } else {
        Err(BootstrapError::CommandFailed {
            command: command.to_string(),
            code: status.code(),
        })
    }
}

fn combined_output(output: &Output) -> String {
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    text
}
