//! Orchestration for one make-go run: locate the root, run the plan, print the report.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{info, instrument, warn};

use crate::core::args::resolve_test_args;
use crate::core::gotest::ReportFormatter;
use crate::core::plan::CommandPlan;
use crate::io::config::MakeGoConfig;
use crate::io::root::locate_project_root;
use crate::io::runner::CommandRunner;

/// Separator printed between streamed command output and the report.
pub const REPORT_SEPARATOR: &str = "----";

/// Everything a run needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Build version, injected at compile time.
    pub version: String,
    pub working_dir: PathBuf,
    /// Trailing invocation tokens destined for `go test`.
    pub test_args: Vec<String>,
    pub config: MakeGoConfig,
}

/// Run the full workflow for `invocation`.
#[instrument(skip_all, fields(version = %invocation.version))]
pub fn run_make_go<R, F, W>(
    invocation: &Invocation,
    runner: &mut R,
    formatter: &F,
    console: &mut W,
) -> Result<()>
where
    R: CommandRunner,
    F: ReportFormatter,
    W: Write,
{
    let config = &invocation.config;
    let test_args = resolve_test_args(&invocation.test_args, &config.default_test_args);
    let root = locate_project_root(
        &invocation.working_dir,
        &config.marker_file,
        config.max_search_steps,
    )?;
    info!(root = %root.path.display(), steps = root.steps, "project root located");

    let plan = CommandPlan::new(&config.tool, &test_args);
    let captured = run_sequence(runner, &root.path, &plan, console)?;
    write_report(formatter, &captured, console)
}

/// Run every command of `plan` in `root`, stopping at the first failure.
///
/// Returns the concatenated stdout of all commands, each followed by a newline.
#[instrument(skip_all, fields(root = %root.display(), commands = plan.commands.len()))]
pub fn run_sequence<R: CommandRunner, W: Write>(
    runner: &mut R,
    root: &Path,
    plan: &CommandPlan,
    console: &mut W,
) -> Result<String> {
    let mut captured = String::new();
    for command in &plan.commands {
        writeln!(console, "{command}").context("write console")?;
        console.flush().context("flush console")?;

        info!(%command, "running command");
        let output = runner.run(command, root)?;
        if !output.success() {
            warn!(%command, exit_code = ?output.exit_code, "command failed");
            match output.exit_code {
                Some(code) => bail!("`{command}` failed with exit code {code}"),
                None => bail!("`{command}` was terminated by a signal"),
            }
        }

        captured.push_str(&output.stdout);
        captured.push('\n');
    }
    Ok(captured)
}

/// Print the separator and the trimmed formatted report.
pub fn write_report<F: ReportFormatter, W: Write>(
    formatter: &F,
    captured: &str,
    console: &mut W,
) -> Result<()> {
    let report = formatter.format(captured);
    writeln!(console, "{REPORT_SEPARATOR}").context("write console")?;
    writeln!(console, "{}", report.trim()).context("write console")?;
    console.flush().context("flush console")
}
