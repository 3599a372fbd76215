//! `make-go`: tidy, format and test the enclosing Go module in one step.
//!
//! Walks up from the working directory to the nearest `go.mod`, runs
//! `go version`, `go mod tidy`, `go fmt ./...` and `go test` there, then
//! prints a condensed test report.

use anyhow::{Context, Result};
use clap::Parser;
use clap::error::ErrorKind;
use make_go::core::gotest::GoTestFormatter;
use make_go::exit_codes;
use make_go::io::config::load_config_from_env;
use make_go::io::runner::ShellRunner;
use make_go::logging;
use make_go::sequence::{Invocation, run_make_go};
use std::ffi::OsString;
use tracing::{debug, warn};

/// Build version; set `MAKE_GO_VERSION` at compile time to override.
const VERSION: &str = match option_env!("MAKE_GO_VERSION") {
    Some(version) => version,
    None => env!("CARGO_PKG_VERSION"),
};

const AFTER_HELP: &str = "\
Runs the following in the Go module root (the nearest directory with go.mod):

  go version
  go mod tidy
  go fmt ./...
  go test [GO_TEST_ARGS]...

GO_TEST_ARGS default to '-coverprofile=/tmp/coverage.out -short -timeout=10s ./...'.
Set MAKE_GO_CONFIG to a TOML file to change the tool, marker file, search depth or defaults.";

#[derive(Parser, Debug)]
#[command(
    name = "make-go",
    version = VERSION,
    about = "Tidy, format and test the enclosing Go module",
    after_help = AFTER_HELP
)]
struct Cli {
    /// Arguments appended verbatim to `go test`.
    #[arg(
        value_name = "GO_TEST_ARGS",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    go_test_args: Vec<String>,
}

fn main() {
    logging::init();
    let code = match parse_cli(std::env::args_os()) {
        Ok(cli) => match run(cli) {
            Ok(()) => exit_codes::OK,
            Err(err) => {
                eprintln!("make-go: {err:#}");
                exit_codes::FAILED
            }
        },
        Err(err) => usage_exit_code(&err),
    };
    std::process::exit(code);
}

/// Print a clap error or help text and pick the exit code for it.
///
/// Help counts as a usage error and exits non-zero; `--version` does not.
fn usage_exit_code(err: &clap::Error) -> i32 {
    if let Err(e) = err.print() {
        warn!(err = %e, "failed to print usage");
    }
    match err.kind() {
        ErrorKind::DisplayVersion => exit_codes::OK,
        _ => exit_codes::USAGE,
    }
}

/// Parse the invocation, keeping the trailing tokens exactly as typed.
///
/// clap handles help, version and invalid UTF-8, but drops a leading `--`;
/// `go test` receives every token after the program name unchanged.
fn parse_cli<I, T>(raw: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let raw: Vec<OsString> = raw.into_iter().map(Into::into).collect();
    let mut cli = Cli::try_parse_from(raw.iter().cloned())?;
    cli.go_test_args = raw
        .iter()
        .skip(1)
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();
    Ok(cli)
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config_from_env().context("load config")?;
    let working_dir = std::env::current_dir().context("read working directory")?;
    debug!(working_dir = %working_dir.display(), ?config, "starting");

    let invocation = Invocation {
        version: VERSION.to_string(),
        working_dir,
        test_args: cli.go_test_args,
        config,
    };
    let mut runner = ShellRunner::stdout();
    run_make_go(
        &invocation,
        &mut runner,
        &GoTestFormatter,
        &mut std::io::stdout(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_without_args() {
        let cli = parse_cli(["make-go"]).expect("parse");
        assert!(cli.go_test_args.is_empty());
    }

    #[test]
    fn parse_passes_go_flags_through() {
        let cli = parse_cli(["make-go", "-run", "TestFoo", "-count=1", "./..."])
            .expect("parse");
        assert_eq!(cli.go_test_args, vec!["-run", "TestFoo", "-count=1", "./..."]);
    }

    #[test]
    fn parse_keeps_short_flag_after_first_arg() {
        let cli = parse_cli(["make-go", "./...", "-short"]).expect("parse");
        assert_eq!(cli.go_test_args, vec!["./...", "-short"]);
    }

    #[test]
    fn parse_keeps_leading_double_dash() {
        let cli = parse_cli(["make-go", "--", "-run", "X"]).expect("parse");
        assert_eq!(cli.go_test_args, vec!["--", "-run", "X"]);
    }

    #[test]
    fn parse_keeps_inner_double_dash() {
        let cli = parse_cli(["make-go", "-run", "X", "--", "-args"]).expect("parse");
        assert_eq!(cli.go_test_args, vec!["-run", "X", "--", "-args"]);
    }

    #[test]
    fn help_is_a_usage_error() {
        let err = parse_cli(["make-go", "-h"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
        assert_eq!(usage_exit_code(&err), exit_codes::USAGE);
    }

    #[test]
    fn version_exits_cleanly() {
        let err = parse_cli(["make-go", "--version"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayVersion);
        assert_eq!(usage_exit_code(&err), exit_codes::OK);
    }
}
