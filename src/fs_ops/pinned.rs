//! Directory-pinning resolver.
//!
//! For one `(parent, leaf)` pair:
//! 1. open the process cwd afresh (`"."`) as the resolution anchor
//! 2. open `parent` relative to that anchor, pinning it by descriptor
//! 3. drop the anchor
//! 4. open `leaf` relative to the pinned parent with the relative-open primitive
//! 5. drop the pinned parent and hand back only the file
//!
//! Directory handles never outlive the call that opened them; each one is an
//! `OwnedFd` so every exit path releases it exactly once.

use std::fs::File;
use std::io;
use std::os::fd::{AsFd, OwnedFd};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::ResolvePolicy;
use crate::errors::CopyError;
use crate::platform::{LeafOpenOptions, open_dir_at, open_leaf_at};

use super::split::PathSpec;

/// What the caller intends to do with the resolved leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenIntent {
    /// Read an existing file.
    Read,
    /// Write to the leaf, creating it with `mode` when `create` is set.
    /// Truncation is applied by the caller once the opened file has been verified.
    Write { create: bool, mode: u32 },
}

impl OpenIntent {
    /// Build the options record handed to the relative-open primitive.
    pub fn options(self, resolve: ResolvePolicy) -> LeafOpenOptions {
        match self {
            OpenIntent::Read => LeafOpenOptions {
                // O_NONBLOCK: a leaf swapped to a FIFO must not hang the open.
                flags: libc::O_RDONLY | libc::O_NOCTTY | libc::O_NONBLOCK,
                mode: 0,
                resolve,
            },
            // O_NONBLOCK: a FIFO with no reader fails with ENXIO instead of hanging.
            OpenIntent::Write { create, mode } => LeafOpenOptions {
                flags: libc::O_WRONLY
                    | libc::O_NOCTTY
                    | libc::O_NONBLOCK
                    | if create { libc::O_CREAT } else { 0 },
                mode: if create { mode } else { 0 },
                resolve,
            },
        }
    }
}

/// An open descriptor pinning one directory.
#[derive(Debug)]
pub struct DirHandle {
    fd: OwnedFd,
    path: PathBuf,
}

impl DirHandle {
    /// Open the process's current directory explicitly (never a cached descriptor).
    pub fn current() -> io::Result<Self> {
        let fd = open_dir_at(None, Path::new("."))?;
        Ok(Self {
            fd,
            path: PathBuf::from("."),
        })
    }

    /// Open `path` as a directory relative to this one.
    pub fn open_dir(&self, path: &Path) -> io::Result<DirHandle> {
        let fd = open_dir_at(Some(self.fd.as_fd()), path)?;
        Ok(DirHandle {
            fd,
            path: path.to_path_buf(),
        })
    }

    /// Open a single name strictly under this directory.
    pub fn open_leaf(&self, leaf: &std::ffi::OsStr, opts: LeafOpenOptions) -> io::Result<File> {
        open_leaf_at(self.fd.as_fd(), leaf, opts)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Pin `spec.parent` and open `spec.leaf` under it.
///
/// `full` is the caller's original path, used only for error messages.
pub fn resolve_pinned(
    full: &Path,
    spec: &PathSpec,
    intent: OpenIntent,
    resolve: ResolvePolicy,
) -> Result<File, CopyError> {
    let dir_err = |e: io::Error| CopyError::DirectoryOpenFailed {
        dir: spec.parent.clone(),
        source: e,
    };

    let parent = {
        let anchor = DirHandle::current().map_err(|e| CopyError::DirectoryOpenFailed {
            dir: PathBuf::from("."),
            source: e,
        })?;
        anchor.open_dir(&spec.parent).map_err(dir_err)?
    };
    debug!(dir = %parent.path().display(), "pinned parent directory");

    let opts = intent.options(resolve);
    let file = parent.open_leaf(spec.leaf(), opts).map_err(|e| match intent {
        OpenIntent::Read => CopyError::FileOpenFailed {
            path: full.to_path_buf(),
            source: e,
        },
        OpenIntent::Write { .. } => CopyError::DestinationOpenFailed {
            path: full.to_path_buf(),
            source: e,
        },
    })?;
    drop(parent);

    debug!(
        path = %full.display(),
        leaf = %spec.leaf.to_string_lossy(),
        flags = %format!("{:#x}", opts.flags),
        %resolve,
        "opened leaf under pinned parent"
    );
    Ok(file)
}
