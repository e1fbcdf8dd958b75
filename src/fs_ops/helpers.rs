//! I/O helper utilities.
//!
//! Maps raw OS errors to short, actionable hints that are appended to the
//! user-facing diagnostic (see `CopyError::diagnostic`).

use std::io;

/// Hint for a raw OS error code, falling back to the error kind.
pub(crate) fn hint_for(e: &io::Error) -> Option<&'static str> {
    if let Some(code) = e.raw_os_error() {
        let hint = match code {
            libc::EACCES | libc::EPERM => "permission denied; check ownership and permissions.",
            libc::ENOENT => "path not found; verify it exists.",
            libc::ENOTDIR => "a path component is not a directory.",
            libc::EISDIR => "is a directory; expected a regular file.",
            libc::EEXIST => "already exists.",
            libc::ENOSPC => "insufficient space on device.",
            libc::EDQUOT => "disk quota exceeded.",
            libc::EROFS => "read-only filesystem; cannot write here.",
            libc::ELOOP => {
                "too many symbolic link levels, or a symlink refused by the resolve policy."
            }
            libc::EXDEV => "resolution would leave the pinned directory (refused by resolve policy).",
            libc::ENAMETOOLONG => "filename or path too long; shorten path segments.",
            libc::EMFILE => "process file descriptor limit reached; close files or raise limits.",
            libc::ENFILE => "system-wide file table overflow; reduce open files.",
            libc::EIO => "low-level I/O error; check the device.",
            libc::ENXIO => "no process has the FIFO or device open for reading.",
            libc::ETXTBSY => "file is busy (executing); cannot open for writing.",
            _ => return None,
        };
        return Some(hint);
    }
    match e.kind() {
        io::ErrorKind::PermissionDenied => Some("permission denied; check ownership and permissions."),
        io::ErrorKind::NotFound => Some("path not found; verify it exists."),
        io::ErrorKind::WriteZero => Some("destination accepted no bytes; device may be full."),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hints_by_errno() {
        let e = io::Error::from_raw_os_error(libc::ENOSPC);
        assert_eq!(hint_for(&e), Some("insufficient space on device."));
        let e = io::Error::from_raw_os_error(libc::EXDEV);
        assert!(hint_for(&e).unwrap().contains("resolve policy"));
    }

    #[test]
    fn hints_by_kind_without_errno() {
        let e = io::Error::new(io::ErrorKind::WriteZero, "zero");
        assert!(hint_for(&e).is_some());
        let e = io::Error::other("boom");
        assert_eq!(hint_for(&e), None);
    }
}
