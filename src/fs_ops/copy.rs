//! Race-resistant single-file copy: classify, pin + open both ends, transfer, close.
//!
//! The classifier checks paths by name; everything after that works through
//! descriptors. Once both files are open their identities are re-checked with
//! `fstat`, so a swap inside the check/open window is caught before a single
//! byte is written. The destination is only truncated after that check.

use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use crate::config::{Config, DurabilityMode};
use crate::errors::CopyError;
use crate::platform::{clear_nonblocking, close_checked};

use super::classify::{FileIdentity, FileKind, classify};
use super::io_copy::{CopyResult, copy_stream};
use super::pinned::{OpenIntent, resolve_pinned};
use super::split::{PathSpec, check_path};

/// What a successful copy did.
#[derive(Debug)]
pub struct CopyReport {
    pub source: PathBuf,
    pub destination: PathBuf,
    /// Bytes transferred.
    pub bytes: u64,
    /// Transfer buffer size actually used.
    pub buf_size: usize,
    /// True if the destination did not exist beforehand.
    pub created: bool,
    pub durability: DurabilityMode,
    /// Failures while releasing handles; they never change the outcome.
    pub warnings: Vec<CopyError>,
}

/// Copy the regular file `src` to `dst`.
pub fn copy_file(cfg: &Config, src: &Path, dst: &Path) -> Result<CopyReport, CopyError> {
    check_path(src, cfg.max_path_len)?;
    check_path(dst, cfg.max_path_len)?;

    let class = classify(src, dst)?;
    let created = class.destination.is_none();

    let src_spec = PathSpec::split(src);
    let dst_spec = PathSpec::split(dst);

    let src_file = resolve_pinned(src, &src_spec, OpenIntent::Read, cfg.resolve)?;
    verify_source(&src_file, src, &class.source)?;

    let intent = OpenIntent::Write {
        create: created,
        mode: cfg.create_mode,
    };
    let dst_file = resolve_pinned(dst, &dst_spec, intent, cfg.resolve)?;
    prepare_destination(&dst_file, src, dst, &class.source)?;

    let (outcome, warnings) = transfer_and_close(cfg, src_file, dst_file, src, dst);
    let result = outcome?;

    info!(
        source = %src.display(),
        dest = %dst.display(),
        bytes = result.bytes,
        created,
        "Copy completed"
    );
    Ok(CopyReport {
        source: src.to_path_buf(),
        destination: dst.to_path_buf(),
        bytes: result.bytes,
        buf_size: result.buf_size,
        created,
        durability: cfg.durability,
        warnings,
    })
}

/// The opened source must still be the regular file we classified.
fn verify_source(file: &File, src: &Path, expected: &FileIdentity) -> Result<(), CopyError> {
    let meta = file.metadata().map_err(|e| CopyError::FileOpenFailed {
        path: src.to_path_buf(),
        source: e,
    })?;
    let opened = FileIdentity::from_metadata(&meta);
    let kind = opened.kind();
    if kind != FileKind::Regular {
        return Err(CopyError::SourceNotRegularFile {
            path: src.to_path_buf(),
            kind,
        });
    }
    if !opened.same_file(expected) {
        warn!(
            path = %src.display(),
            expected_ino = expected.ino,
            opened_ino = opened.ino,
            "source identity changed after classification"
        );
        return Err(CopyError::SourceChanged(src.to_path_buf()));
    }
    Ok(())
}

/// Re-check the opened destination, then truncate it.
fn prepare_destination(
    file: &File,
    src: &Path,
    dst: &Path,
    source: &FileIdentity,
) -> Result<(), CopyError> {
    let open_err = |e: std::io::Error| CopyError::DestinationOpenFailed {
        path: dst.to_path_buf(),
        source: e,
    };
    let opened = FileIdentity::from_metadata(&file.metadata().map_err(open_err)?);
    if opened.same_file(source) {
        return Err(CopyError::SameFile {
            src: src.to_path_buf(),
            dst: dst.to_path_buf(),
        });
    }
    match opened.kind() {
        FileKind::Directory => Err(CopyError::DestinationIsDirectory(dst.to_path_buf())),
        FileKind::Regular => file.set_len(0).map_err(open_err),
        kind => {
            debug!(path = %dst.display(), %kind, "destination is not a regular file; writing without truncation");
            clear_nonblocking(file).map_err(open_err)
        }
    }
}

/// Run the transfer, then release both handles exactly once (destination first).
///
/// Close failures never change `outcome`. On success they are returned for the
/// caller to report; on failure they are logged here, since the caller only
/// sees the error.
fn transfer_and_close(
    cfg: &Config,
    mut src_file: File,
    mut dst_file: File,
    src: &Path,
    dst: &Path,
) -> (Result<CopyResult, CopyError>, Vec<CopyError>) {
    let mut outcome = copy_stream(&mut src_file, &mut dst_file, cfg.buffer_size, src, dst);

    if outcome.is_ok() && cfg.durability == DurabilityMode::Full {
        if let Err(e) = dst_file.sync_all() {
            outcome = Err(CopyError::WriteError {
                path: dst.to_path_buf(),
                source: e,
            });
        }
    }

    let mut warnings = Vec::new();
    for (file, path) in [(dst_file, dst), (src_file, src)] {
        if let Err(e) = close_checked(file) {
            let w = CopyError::CloseWarning {
                path: path.to_path_buf(),
                source: e,
            };
            if outcome.is_ok() {
                debug!(kind = w.kind(), "{}", w.diagnostic());
            } else {
                error!(kind = w.kind(), "{}", w.diagnostic());
            }
            warnings.push(w);
        }
    }
    (outcome, warnings)
}
