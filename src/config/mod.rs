//! Config module.
//! Runtime settings, their defaults, validation, and log-path helpers.
//! There is no config file: values come from defaults and CLI flags only.

pub mod paths;
pub mod types;
mod validate;

pub use paths::path_has_symlink_ancestor;
pub use types::{Config, DurabilityMode, LogLevel, ResolvePolicy};

/// Copy buffer size used when none is given.
pub const DEFAULT_BUFFER_SIZE: usize = 1024;
/// Longest path accepted for either argument, in bytes.
pub const DEFAULT_MAX_PATH_LEN: usize = libc::PATH_MAX as usize;
/// Permission bits for a newly created destination (before umask).
pub const DEFAULT_CREATE_MODE: u32 = 0o644;
