//! Path classification before any directory is pinned.
//!
//! Order of checks (the first failure wins):
//! 1. source must stat, and must be a regular file
//! 2. an existing destination must not be the same (device, inode) as the source
//! 3. the destination's parent directory must stat
//! 4. an existing destination must not be a directory
//!
//! Only metadata queries happen here; nothing is opened.

use std::fmt;
use std::fs::{self, Metadata};
use std::io;
use std::os::unix::fs::MetadataExt;
use std::path::Path;
use tracing::debug;

use crate::errors::CopyError;

use super::split::PathSpec;

/// Coarse file type derived from the mode bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Regular,
    Directory,
    Symlink,
    Fifo,
    Socket,
    CharDevice,
    BlockDevice,
    Unknown,
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FileKind::Regular => "regular file",
            FileKind::Directory => "directory",
            FileKind::Symlink => "symbolic link",
            FileKind::Fifo => "fifo",
            FileKind::Socket => "socket",
            FileKind::CharDevice => "character device",
            FileKind::BlockDevice => "block device",
            FileKind::Unknown => "unknown type",
        };
        f.write_str(s)
    }
}

/// `(device, inode, mode)` of a file as seen by one metadata query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileIdentity {
    pub dev: u64,
    pub ino: u64,
    pub mode: u32,
}

impl FileIdentity {
    pub fn from_metadata(meta: &Metadata) -> Self {
        Self {
            dev: meta.dev(),
            ino: meta.ino(),
            mode: meta.mode(),
        }
    }

    pub fn kind(&self) -> FileKind {
        match self.mode & libc::S_IFMT as u32 {
            m if m == libc::S_IFREG as u32 => FileKind::Regular,
            m if m == libc::S_IFDIR as u32 => FileKind::Directory,
            m if m == libc::S_IFLNK as u32 => FileKind::Symlink,
            m if m == libc::S_IFIFO as u32 => FileKind::Fifo,
            m if m == libc::S_IFSOCK as u32 => FileKind::Socket,
            m if m == libc::S_IFCHR as u32 => FileKind::CharDevice,
            m if m == libc::S_IFBLK as u32 => FileKind::BlockDevice,
            _ => FileKind::Unknown,
        }
    }

    /// Same underlying file: device and inode match; mode is ignored.
    pub fn same_file(&self, other: &FileIdentity) -> bool {
        self.dev == other.dev && self.ino == other.ino
    }
}

/// Outcome of a successful classification.
#[derive(Debug, Clone, Copy)]
pub struct Classification {
    pub source: FileIdentity,
    /// Identity of the destination if it already existed.
    pub destination: Option<FileIdentity>,
}

/// Classify `src` and `dst` (both resolved by full path, symlinks followed).
pub fn classify(src: &Path, dst: &Path) -> Result<Classification, CopyError> {
    let source = fs::metadata(src)
        .map(|m| FileIdentity::from_metadata(&m))
        .map_err(|e| CopyError::SourceNotFound {
            path: src.to_path_buf(),
            source: e,
        })?;

    let kind = source.kind();
    if kind != FileKind::Regular {
        return Err(CopyError::SourceNotRegularFile {
            path: src.to_path_buf(),
            kind,
        });
    }
    debug!(path = %src.display(), dev = source.dev, ino = source.ino, "classified source");

    let destination = match fs::metadata(dst) {
        Ok(m) => Some(FileIdentity::from_metadata(&m)),
        Err(e) => {
            if e.kind() != io::ErrorKind::NotFound {
                debug!(path = %dst.display(), error = %e, "destination stat failed; treating as absent");
            }
            None
        }
    };

    if let Some(d) = destination.as_ref() {
        if d.same_file(&source) {
            return Err(CopyError::SameFile {
                src: src.to_path_buf(),
                dst: dst.to_path_buf(),
            });
        }
    }

    let parent = PathSpec::split(dst).parent;
    fs::metadata(&parent).map_err(|e| CopyError::DestinationDirectoryMissing {
        dir: parent.clone(),
        source: e,
    })?;

    if let Some(d) = destination.as_ref() {
        if d.kind() == FileKind::Directory {
            return Err(CopyError::DestinationIsDirectory(dst.to_path_buf()));
        }
        debug!(path = %dst.display(), kind = %d.kind(), "destination exists; will truncate");
    }

    Ok(Classification {
        source,
        destination,
    })
}
