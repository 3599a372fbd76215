//! Test-only helpers for building project trees and scripting command runs.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use tempfile::TempDir;

use crate::core::plan::ToolCommand;
use crate::io::process::CommandOutput;
use crate::io::runner::CommandRunner;

/// Create `depth` nested directories under `base` and return the deepest one.
pub fn nested_dirs(base: &Path, depth: usize) -> PathBuf {
    let mut dir = base.to_path_buf();
    for level in 1..=depth {
        dir.push(format!("d{level}"));
    }
    fs::create_dir_all(&dir).expect("create nested dirs");
    dir
}

/// Write an empty marker file into `dir`.
pub fn write_marker(dir: &Path, marker: &str) {
    fs::write(dir.join(marker), "module example.com/demo\n").expect("write marker");
}

/// Temp project with `go.mod` at its root and a working directory `depth` levels below.
pub fn go_project(depth: usize) -> Result<(TempDir, PathBuf)> {
    let temp = tempfile::tempdir()?;
    write_marker(temp.path(), "go.mod");
    let workdir = nested_dirs(temp.path(), depth);
    Ok((temp, workdir))
}

/// How a [`ScriptedRunner`] answers one particular command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptedFailure {
    /// Exit with code 1.
    ExitCode,
    /// Report that the command could not be started.
    Spawn,
    /// Report termination by a signal (no exit code).
    Signal,
}

/// Runner that records each call and answers with `out: <command>`.
///
/// The command whose display string equals the scripted one fails in the
/// scripted way; every other command succeeds.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    pub calls: Vec<(String, PathBuf)>,
    failing: Option<(String, ScriptedFailure)>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(command: &str) -> Self {
        Self::failing_with(command, ScriptedFailure::ExitCode)
    }

    pub fn failing_with(command: &str, failure: ScriptedFailure) -> Self {
        Self {
            calls: Vec::new(),
            failing: Some((command.to_string(), failure)),
        }
    }

    pub fn commands(&self) -> Vec<&str> {
        self.calls.iter().map(|(cmd, _)| cmd.as_str()).collect()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&mut self, command: &ToolCommand, workdir: &Path) -> Result<CommandOutput> {
        let display = command.to_string();
        self.calls.push((display.clone(), workdir.to_path_buf()));
        let failure = match &self.failing {
            Some((failing, failure)) if *failing == display => Some(*failure),
            _ => None,
        };
        let exit_code = match failure {
            None => Some(0),
            Some(ScriptedFailure::ExitCode) => Some(1),
            Some(ScriptedFailure::Signal) => None,
            Some(ScriptedFailure::Spawn) => bail!("run `{display}`: spawn command"),
        };
        Ok(CommandOutput {
            exit_code,
            stdout: format!("out: {display}"),
        })
    }
}
