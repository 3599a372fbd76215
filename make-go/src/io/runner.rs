//! Command runner abstraction.
//!
//! The [`CommandRunner`] trait decouples sequencing from process spawning.
//! Tests use scripted runners that record calls without starting processes.

use std::io::{Stdout, Write};
use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result};
use tracing::instrument;

use crate::core::plan::ToolCommand;
use crate::io::process::{CommandOutput, run_command_with_tee};

/// Abstraction over command execution backends.
pub trait CommandRunner {
    /// Run `command` in `workdir` and return its captured stdout and exit code.
    ///
    /// A non-zero exit is reported through [`CommandOutput`]; `Err` means the
    /// command could not be run at all.
    fn run(&mut self, command: &ToolCommand, workdir: &Path) -> Result<CommandOutput>;
}

/// Runner that spawns real processes and tees their stdout to `console`.
pub struct ShellRunner<W> {
    console: W,
}

impl<W: Write> ShellRunner<W> {
    pub fn new(console: W) -> Self {
        Self { console }
    }

    #[cfg(test)]
    fn into_console(self) -> W {
        self.console
    }
}

impl ShellRunner<Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> CommandRunner for ShellRunner<W> {
    #[instrument(skip_all, fields(command = %command, workdir = %workdir.display()))]
    fn run(&mut self, command: &ToolCommand, workdir: &Path) -> Result<CommandOutput> {
        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args).current_dir(workdir);
        run_command_with_tee(cmd, &mut self.console).with_context(|| format!("run `{command}`"))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn shell_runner_uses_workdir() {
        let temp = tempfile::tempdir().expect("tempdir");
        let workdir = temp.path().canonicalize().expect("canonicalize");
        let mut runner = ShellRunner::new(Vec::new());

        let output = runner
            .run(&ToolCommand::new("pwd", ""), &workdir)
            .expect("run pwd");
        assert!(output.success());
        assert_eq!(output.stdout.trim(), workdir.display().to_string());

        let console = runner.into_console();
        assert_eq!(String::from_utf8_lossy(&console).trim(), workdir.display().to_string());
    }

    #[test]
    fn shell_runner_names_command_on_spawn_failure() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut runner = ShellRunner::new(Vec::new());

        let err = runner
            .run(&ToolCommand::new("make-go-missing-tool", "version"), temp.path())
            .unwrap_err();
        assert!(err.to_string().contains("run `make-go-missing-tool version`"));
    }
}
