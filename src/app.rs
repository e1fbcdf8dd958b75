//! Application orchestrator.
//! Builds the config from CLI flags, initializes logging, runs the copy,
//! and logs a structured record of any failure.

use anyhow::Result;
use tracing::{debug, error};

use pincopy::cli::Args;
use pincopy::output as out;
use pincopy::{Config, CopyError, copy_file};

use crate::logging::init_tracing;

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    let mut cfg = Config::default();
    args.apply_overrides(&mut cfg);

    // Logging is best-effort: a broken log setup must not block the copy.
    let _guard = match init_tracing(&cfg.log_level, cfg.log_file.as_deref(), args.json) {
        Ok(g) => g,
        Err(e) => {
            out::print_warn(&format!("Failed to initialize logging: {e:#}"));
            None
        }
    };

    debug!("Starting pincopy: {:?}", args);
    cfg.validate()?;

    match copy_file(&cfg, &args.source, &args.destination) {
        Ok(report) => {
            debug!(
                buf_size = report.buf_size,
                durability = ?report.durability,
                warnings = report.warnings.len(),
                "copy report"
            );
            for w in &report.warnings {
                out::print_warn(&w.diagnostic());
            }
            Ok(())
        }
        Err(e) => {
            log_failure(&e);
            Err(e.into())
        }
    }
}

fn log_failure(e: &CopyError) {
    let code = e.exit_code();
    let kind = e.kind();
    match e {
        CopyError::SourceNotFound { path, .. } | CopyError::SourceNotRegularFile { path, .. } => {
            error!(code, kind, path = %path.display(), "Source rejected")
        }
        CopyError::SameFile { src, dst } => {
            error!(code, kind, source = %src.display(), dest = %dst.display(), "Copy refused")
        }
        CopyError::DestinationIsDirectory(path) => {
            error!(code, kind, path = %path.display(), "Destination rejected")
        }
        CopyError::DestinationDirectoryMissing { dir, .. } | CopyError::DirectoryOpenFailed { dir, .. } => {
            error!(code, kind, dir = %dir.display(), error = ?e.io_error(), "Directory unavailable")
        }
        CopyError::ReadError { path, .. } | CopyError::WriteError { path, .. } => {
            error!(code, kind, path = %path.display(), error = ?e.io_error(), "Transfer failed")
        }
        _ => error!(code, kind, error = %e, "Copy failed"),
    }
}
