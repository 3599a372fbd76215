//! Stable exit codes for the make-go CLI.

/// Every command in the sequence succeeded.
pub const OK: i32 = 0;
/// Root not found, unreadable working directory, bad config, or a failed command.
pub const FAILED: i32 = 1;
/// Help was requested or the invocation could not be parsed.
pub const USAGE: i32 = 2;
