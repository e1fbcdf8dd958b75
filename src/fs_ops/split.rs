//! Splitting a path into (parent directory, leaf name).
//!
//! Follows POSIX `dirname`/`basename` semantics on the raw bytes, but never
//! touches the caller's value: both halves are returned as new owned paths.

use std::ffi::{OsStr, OsString};
use std::os::unix::ffi::{OsStrExt, OsStringExt};
use std::path::{Path, PathBuf};

use crate::errors::CopyError;

/// A caller path decomposed into the directory to pin and the name to open under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSpec {
    /// Directory that will be pinned by descriptor (`.` for bare names).
    pub parent: PathBuf,
    /// Final component, opened relative to the pinned parent.
    pub leaf: OsString,
}

impl PathSpec {
    pub fn split(path: &Path) -> PathSpec {
        PathSpec {
            parent: PathBuf::from(OsString::from_vec(dirname(path.as_os_str().as_bytes()).to_vec())),
            leaf: OsString::from_vec(basename(path.as_os_str().as_bytes()).to_vec()),
        }
    }

    pub fn leaf(&self) -> &OsStr {
        &self.leaf
    }
}

const ROOT: &[u8] = b"/";
const DOT: &[u8] = b".";

fn trim_trailing_slashes(b: &[u8]) -> &[u8] {
    let mut end = b.len();
    while end > 1 && b[end - 1] == b'/' {
        end -= 1;
    }
    &b[..end]
}

fn dirname(b: &[u8]) -> &[u8] {
    if b.is_empty() {
        return DOT;
    }
    let trimmed = trim_trailing_slashes(b);
    if trimmed == ROOT {
        return ROOT;
    }
    match trimmed.iter().rposition(|&c| c == b'/') {
        None => DOT,
        Some(i) => {
            let head = trim_trailing_slashes(&trimmed[..i.max(1)]);
            if head.iter().all(|&c| c == b'/') { ROOT } else { head }
        }
    }
}

fn basename(b: &[u8]) -> &[u8] {
    if b.is_empty() {
        return DOT;
    }
    let trimmed = trim_trailing_slashes(b);
    if trimmed == ROOT {
        return ROOT;
    }
    match trimmed.iter().rposition(|&c| c == b'/') {
        None => trimmed,
        Some(i) => &trimmed[i + 1..],
    }
}

/// Reject paths that cannot be handed to the kernel or exceed the configured limit.
pub fn check_path(path: &Path, max_len: usize) -> Result<(), CopyError> {
    let bytes = path.as_os_str().as_bytes();
    if bytes.is_empty() || bytes.contains(&0) {
        return Err(CopyError::InvalidPath(path.to_path_buf()));
    }
    if bytes.len() > max_len {
        return Err(CopyError::PathTooLong {
            path: path.to_path_buf(),
            len: bytes.len(),
            max: max_len,
        });
    }
    Ok(())
}
