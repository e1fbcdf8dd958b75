//! Typed error definitions for pincopy.
//! One variant per failure kind; each maps to a stable process exit code.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::fs_ops::helpers::hint_for;
use crate::fs_ops::FileKind;

/// Exit code for success.
pub const EXIT_OK: u8 = 0;
/// Exit code for every failure without a dedicated code.
pub const EXIT_FAILURE: u8 = 1;
/// Exit code for a malformed command line (not exactly two paths).
pub const EXIT_USAGE: u8 = 3;
/// Exit code when the source cannot be stat'ed.
pub const EXIT_SOURCE_MISSING: u8 = 4;
/// Exit code when the source is not a regular file.
pub const EXIT_SOURCE_NOT_REGULAR: u8 = 5;
/// Exit code when the destination is an existing directory.
pub const EXIT_DEST_IS_DIR: u8 = 6;

#[derive(Debug, Error)]
pub enum CopyError {
    #[error("expected exactly two paths: <SOURCE> <DESTINATION>")]
    ArgumentCount,

    #[error("invalid path {0:?}: empty or contains a NUL byte")]
    InvalidPath(PathBuf),

    #[error("path is {len} bytes, longer than the configured limit of {max}: {path}")]
    PathTooLong { path: PathBuf, len: usize, max: usize },

    #[error("stat source '{path}': {source}")]
    SourceNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("source '{path}' is not a regular file ({kind})")]
    SourceNotRegularFile { path: PathBuf, kind: FileKind },

    #[error("source '{src}' and destination '{dst}' are the same file")]
    SameFile { src: PathBuf, dst: PathBuf },

    #[error("destination directory '{dir}' is not accessible: {source}")]
    DestinationDirectoryMissing {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("destination '{0}' is a directory")]
    DestinationIsDirectory(PathBuf),

    #[error("open directory '{dir}': {source}")]
    DirectoryOpenFailed {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("open source file '{path}': {source}")]
    FileOpenFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("open destination file '{path}': {source}")]
    DestinationOpenFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("source '{0}' changed between check and open")]
    SourceChanged(PathBuf),

    #[error("read from '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("write to '{path}': {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("close '{path}': {source}")]
    CloseWarning {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CopyError {
    /// Stable process exit code for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            CopyError::ArgumentCount => EXIT_USAGE,
            CopyError::SourceNotFound { .. } => EXIT_SOURCE_MISSING,
            CopyError::SourceNotRegularFile { .. } => EXIT_SOURCE_NOT_REGULAR,
            CopyError::DestinationIsDirectory(_) => EXIT_DEST_IS_DIR,
            _ => EXIT_FAILURE,
        }
    }

    /// Short machine-friendly label, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            CopyError::ArgumentCount => "argument_count",
            CopyError::InvalidPath(_) => "invalid_path",
            CopyError::PathTooLong { .. } => "path_too_long",
            CopyError::SourceNotFound { .. } => "source_not_found",
            CopyError::SourceNotRegularFile { .. } => "source_not_regular_file",
            CopyError::SameFile { .. } => "same_file",
            CopyError::DestinationDirectoryMissing { .. } => "destination_directory_missing",
            CopyError::DestinationIsDirectory(_) => "destination_is_directory",
            CopyError::DirectoryOpenFailed { .. } => "directory_open_failed",
            CopyError::FileOpenFailed { .. } => "file_open_failed",
            CopyError::DestinationOpenFailed { .. } => "destination_open_failed",
            CopyError::SourceChanged(_) => "source_changed",
            CopyError::ReadError { .. } => "read_error",
            CopyError::WriteError { .. } => "write_error",
            CopyError::CloseWarning { .. } => "close_warning",
        }
    }

    /// Underlying OS error, when the failure came from a system call.
    pub fn io_error(&self) -> Option<&io::Error> {
        match self {
            CopyError::SourceNotFound { source, .. }
            | CopyError::DestinationDirectoryMissing { source, .. }
            | CopyError::DirectoryOpenFailed { source, .. }
            | CopyError::FileOpenFailed { source, .. }
            | CopyError::DestinationOpenFailed { source, .. }
            | CopyError::ReadError { source, .. }
            | CopyError::WriteError { source, .. }
            | CopyError::CloseWarning { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Display message followed by an errno-aware hint, if one applies.
    pub fn diagnostic(&self) -> String {
        let mut msg = self.to_string();
        if let Some(hint) = self.io_error().and_then(hint_for) {
            msg.push_str(" - ");
            msg.push_str(hint);
        }
        msg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn dedicated_exit_codes_are_distinct() {
        let errs = [
            CopyError::ArgumentCount,
            CopyError::SourceNotFound {
                path: "a".into(),
                source: io::Error::from(io::ErrorKind::NotFound),
            },
            CopyError::SourceNotRegularFile {
                path: "a".into(),
                kind: FileKind::Directory,
            },
            CopyError::DestinationIsDirectory("b".into()),
            CopyError::SameFile {
                src: "a".into(),
                dst: "b".into(),
            },
        ];
        let codes: HashSet<u8> = errs.iter().map(CopyError::exit_code).collect();
        assert_eq!(codes.len(), errs.len());
        assert!(!codes.contains(&EXIT_OK));
    }

    #[test]
    fn diagnostic_appends_errno_hint() {
        let err = CopyError::FileOpenFailed {
            path: "/nope".into(),
            source: io::Error::from_raw_os_error(libc::EACCES),
        };
        let msg = err.diagnostic();
        assert!(msg.starts_with("open source file '/nope'"), "{msg}");
        assert!(msg.contains("permission denied"), "{msg}");
    }

    #[test]
    fn diagnostic_without_io_error_is_display() {
        let err = CopyError::DestinationIsDirectory("out".into());
        assert_eq!(err.diagnostic(), err.to_string());
        assert_eq!(err.kind(), "destination_is_directory");
    }
}
