//! Filesystem operations: classification, directory pinning, transfer.

mod classify;
mod copy;
pub(crate) mod helpers;
mod io_copy;
mod pinned;
mod split;

pub use classify::{Classification, FileIdentity, FileKind, classify};
pub use copy::{CopyReport, copy_file};
pub use io_copy::{CopyResult, copy_stream};
pub use pinned::{DirHandle, OpenIntent, resolve_pinned};
pub use split::{PathSpec, check_path};
