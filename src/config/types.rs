//! Core configuration types.
//! - Config holds runtime settings with sensible defaults.
//! - LogLevel, ResolvePolicy and DurabilityMode are small enums with parsing helpers.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::{DEFAULT_BUFFER_SIZE, DEFAULT_CREATE_MODE, DEFAULT_MAX_PATH_LEN};

/// Program-defined verbosity levels exposed to users.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Only errors
    Quiet,
    /// Informational output (default)
    #[default]
    Normal,
    /// More info (like verbose)
    Info,
    /// Debug/trace
    Debug,
}

impl LogLevel {
    /// Parse common string names into our LogLevel (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" => Some(LogLevel::Normal),
            "info" | "verbose" | "detailed" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// Extra constraints applied when the leaf name is resolved under its pinned parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolvePolicy {
    /// Ordinary resolution of the leaf (symlinks followed).
    #[default]
    Standard,
    /// The leaf may not resolve to anything outside the pinned parent.
    Beneath,
    /// The leaf may not be a symbolic link at all.
    NoSymlinks,
}

impl ResolvePolicy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "standard" | "default" => Some(ResolvePolicy::Standard),
            "beneath" => Some(ResolvePolicy::Beneath),
            "no-symlinks" | "nosymlinks" | "no_symlinks" => Some(ResolvePolicy::NoSymlinks),
            _ => None,
        }
    }
}

impl fmt::Display for ResolvePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResolvePolicy::Standard => "standard",
            ResolvePolicy::Beneath => "beneath",
            ResolvePolicy::NoSymlinks => "no-symlinks",
        };
        f.write_str(s)
    }
}

impl FromStr for ResolvePolicy {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            format!("invalid resolve policy: '{s}' (expected standard, beneath or no-symlinks)")
        })
    }
}

/// Durability mode controlling what happens to the destination after the last write.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DurabilityMode {
    /// Bytes are handed to the kernel; no disk barrier. Fastest.
    #[default]
    Data,
    /// Force data and metadata to stable storage (`sync_all`).
    Full,
}

/// Runtime configuration for one copy.
#[derive(Debug, Clone)]
pub struct Config {
    /// Transfer chunk size in bytes
    pub buffer_size: usize,
    /// Longest accepted path argument, in bytes
    pub max_path_len: usize,
    /// Mode bits for a newly created destination
    pub create_mode: u32,
    /// Constraint set for the leaf resolution step
    pub resolve: ResolvePolicy,
    pub durability: DurabilityMode,
    /// Console verbosity
    pub log_level: LogLevel,
    /// Optional path to a log file
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            max_path_len: DEFAULT_MAX_PATH_LEN,
            create_mode: DEFAULT_CREATE_MODE,
            resolve: ResolvePolicy::Standard,
            durability: DurabilityMode::Data,
            log_level: LogLevel::Normal,
            log_file: None,
        }
    }
}

impl Config {
    /// Default config with an explicit transfer chunk size.
    pub fn with_buffer_size(buffer_size: usize) -> Self {
        Self {
            buffer_size,
            ..Default::default()
        }
    }
}
