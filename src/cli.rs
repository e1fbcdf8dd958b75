//! CLI definition and parsing.
//! Defines Args and provides try_parse() for command-line handling.
//!
//! Notes:
//! - Exactly two positional paths are required; anything else is a usage error.
//! - --debug is a shorthand for --log-level debug.

use clap::{Parser, ValueHint};
use std::path::PathBuf;

use crate::config::types::{Config, DurabilityMode, LogLevel, ResolvePolicy};

/// Copy a regular file, pinning parent directories by descriptor so a
/// path swapped between check and open cannot redirect the copy.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Race-resistant single file copy")]
pub struct Args {
    /// File to copy (must be a regular file).
    #[arg(value_name = "SOURCE", value_hint = ValueHint::FilePath)]
    pub source: PathBuf,

    /// Destination file (created with --mode, or truncated if it exists).
    #[arg(value_name = "DESTINATION", value_hint = ValueHint::FilePath)]
    pub destination: PathBuf,

    /// Transfer chunk size in bytes.
    #[arg(long, value_name = "BYTES", help = "Transfer chunk size in bytes (default 1024)")]
    pub buffer_size: Option<usize>,

    /// Longest accepted path argument, in bytes.
    #[arg(long, value_name = "BYTES")]
    pub max_path_len: Option<usize>,

    /// Permission bits for a newly created destination, in octal.
    #[arg(long, value_name = "OCTAL", value_parser = parse_octal_mode)]
    pub mode: Option<u32>,

    /// Resolution constraint for the final path component.
    #[arg(
        long,
        value_name = "POLICY",
        help = "Leaf resolution: standard, beneath, no-symlinks"
    )]
    pub resolve: Option<ResolvePolicy>,

    /// fsync the destination before closing it.
    #[arg(long, help = "Flush destination data and metadata to stable storage")]
    pub sync: bool,

    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(
        short = 'd',
        long,
        help = "Enable debug logging (shorthand for --log-level debug)"
    )]
    pub debug: bool,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, help = "Set log level: quiet, normal, info, debug")]
    pub log_level: Option<String>,

    /// Also append logs to this file (refused if an ancestor is a symlink).
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,

    /// Emit logs in structured JSON (includes timestamp, level, and structured fields).
    #[arg(long, help = "Emit logs in structured JSON")]
    pub json: bool,
}

fn parse_octal_mode(s: &str) -> Result<u32, String> {
    let digits = s.trim_start_matches("0o");
    u32::from_str_radix(digits, 8).map_err(|_| format!("invalid octal mode: '{s}'"))
}

impl Args {
    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.as_deref().and_then(LogLevel::parse)
    }

    /// Apply CLI overrides to a Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(n) = self.buffer_size {
            cfg.buffer_size = n;
        }
        if let Some(n) = self.max_path_len {
            cfg.max_path_len = n;
        }
        if let Some(m) = self.mode {
            cfg.create_mode = m;
        }
        if let Some(r) = self.resolve {
            cfg.resolve = r;
        }
        if self.sync {
            cfg.durability = DurabilityMode::Full;
        }
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if let Some(p) = &self.log_file {
            cfg.log_file = Some(p.clone());
        }
    }
}

pub fn try_parse() -> Result<Args, clap::Error> {
    Args::try_parse()
}
