//! Core library for `pincopy`.
//!
//! Copies one regular file to a destination path without the classic
//! check-then-open race: each parent directory is pinned by descriptor and
//! the final component is opened relative to it, so swapping a directory (or
//! a symlink in the path) after validation cannot redirect the open.

pub mod cli;
pub mod config;
pub mod errors;
pub mod fs_ops;
pub mod output;
pub mod platform;

pub use config::{Config, DurabilityMode, LogLevel, ResolvePolicy};
pub use errors::CopyError;
pub use fs_ops::{CopyReport, copy_file};
