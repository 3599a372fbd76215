//! I/O helpers for make-go: config, filesystem search, process execution.

pub mod config;
pub mod process;
pub mod root;
pub mod runner;
