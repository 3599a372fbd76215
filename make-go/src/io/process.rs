//! Helpers for running child processes while teeing their stdout.

use std::io::{BufRead, BufReader, Read, Write};
use std::process::{Command, Stdio};

use anyhow::{Context, Result, anyhow};
use tracing::{debug, error, instrument, warn};

/// Captured child process output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// `None` when the child was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Run a command to completion, copying each stdout line to `console` as it arrives.
///
/// Stdout is also collected and returned. Stderr is inherited so diagnostics
/// from the child reach the terminal unbuffered. There is no timeout.
#[instrument(skip_all, fields(program = ?cmd.get_program()))]
pub fn run_command_with_tee<W: Write>(mut cmd: Command, console: &mut W) -> Result<CommandOutput> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit());

    debug!("spawning child process");
    let mut child = match cmd.spawn() {
        Ok(c) => c,
        Err(e) => {
            error!(err = %e, "failed to spawn command");
            return Err(e).context("spawn command");
        }
    };

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| anyhow!("stdout was not piped"))?;

    let collected = match read_stream_with_tee(stdout, console) {
        Ok(collected) => collected,
        Err(e) => {
            warn!(err = %e, "reading stdout failed, killing");
            let _ = child.kill();
            let _ = child.wait();
            return Err(e);
        }
    };

    let status = child.wait().context("wait for command")?;
    debug!(exit_code = ?status.code(), "command finished");
    Ok(CommandOutput {
        exit_code: status.code(),
        stdout: String::from_utf8_lossy(&collected).into_owned(),
    })
}

/// Read a stream line by line, tee-ing each line to `tee` and flushing it.
///
/// A failing tee is logged and skipped; the collected bytes stay complete.
fn read_stream_with_tee<R: Read, W: Write>(reader: R, tee: &mut W) -> Result<Vec<u8>> {
    let mut buf_reader = BufReader::new(reader);
    let mut collected = Vec::new();

    loop {
        let mut line = Vec::new();
        let n = buf_reader
            .read_until(b'\n', &mut line)
            .context("read line")?;
        if n == 0 {
            break;
        }

        if let Err(e) = tee.write_all(&line) {
            warn!(err = %e, "failed to write to console");
        } else if let Err(e) = tee.flush() {
            warn!(err = %e, "failed to flush console");
        }

        collected.extend_from_slice(&line);
    }

    Ok(collected)
}
