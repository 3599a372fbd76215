//! Go workflow runner.
//!
//! Locates the enclosing Go module, then runs `go version`, `go mod tidy`,
//! `go fmt ./...` and `go test` there, streaming their output and printing a
//! condensed test report at the end. The crate keeps a strict split:
//!
//! - **[`core`]**: Pure logic (argument resolution, command plan, report
//!   formatting). No I/O.
//! - **[`io`]**: Side-effecting operations (config files, filesystem search,
//!   process execution). Behind traits where tests need to substitute them.
//!
//! [`sequence`] ties the two together for the CLI.

pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod sequence;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
