//! Platform-specific helpers.
//! Holds the raw descriptor syscalls so the rest of the crate works with
//! `OwnedFd`/`File` only.

#[cfg(unix)]
mod unix;

#[cfg(not(unix))]
compile_error!("pincopy relies on descriptor-relative opens and only supports Unix targets");

#[cfg(unix)]
pub use unix::{
    LeafOpenOptions, clear_nonblocking, close_checked, open_dir_at, open_leaf_at, open_log_file_secure_append,
};
