//! Pure, deterministic logic: no filesystem or process access.

pub mod args;
pub mod gotest;
pub mod plan;
