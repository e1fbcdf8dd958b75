//! Unix implementations of the descriptor-relative open primitives.
//!
//! On Linux the leaf open goes through `openat2(2)`, which takes its flags,
//! mode and resolution constraints as one `open_how` record. Kernels older than
//! 5.6 answer `ENOSYS`; we then fall back to `openat(2)` and approximate any
//! non-standard resolution policy with `O_NOFOLLOW`.

use std::ffi::{CString, OsStr};
use std::fs::{self, File, OpenOptions};
use std::io;
use std::os::fd::{AsRawFd, BorrowedFd, FromRawFd, IntoRawFd, OwnedFd};
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
use std::path::Path;

use crate::config::ResolvePolicy;

/// Flags, creation mode and resolution constraints for one leaf open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeafOpenOptions {
    /// `O_*` access and creation flags (`O_CLOEXEC` is always added).
    pub flags: libc::c_int,
    /// Mode bits, only meaningful together with `O_CREAT`.
    pub mode: u32,
    pub resolve: ResolvePolicy,
}

fn c_path(p: &OsStr) -> io::Result<CString> {
    CString::new(p.as_bytes())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "path contains null byte"))
}

fn fd_from_ret(ret: libc::c_int) -> io::Result<OwnedFd> {
    if ret < 0 {
        return Err(io::Error::last_os_error());
    }
    // SAFETY: the kernel just handed us this descriptor and nothing else owns it.
    Ok(unsafe { OwnedFd::from_raw_fd(ret) })
}

/// Open `path` as a directory, relative to `dir` (or the process cwd when `dir` is None).
pub fn open_dir_at(dir: Option<BorrowedFd<'_>>, path: &Path) -> io::Result<OwnedFd> {
    let c = c_path(path.as_os_str())?;
    let dirfd = dir.map_or(libc::AT_FDCWD, |d| d.as_raw_fd());
    let flags = libc::O_RDONLY | libc::O_DIRECTORY | libc::O_CLOEXEC;
    // SAFETY: `c` is a valid NUL-terminated string for the duration of the call.
    let ret = unsafe { libc::openat(dirfd, c.as_ptr(), flags) };
    fd_from_ret(ret)
}

/// Open a single leaf name relative to an already pinned directory.
pub fn open_leaf_at(dir: BorrowedFd<'_>, leaf: &OsStr, opts: LeafOpenOptions) -> io::Result<File> {
    let c = c_path(leaf)?;
    let flags = opts.flags | libc::O_CLOEXEC;

    #[cfg(target_os = "linux")]
    {
        match openat2(dir, &c, flags, opts.mode, opts.resolve) {
            Err(e) if e.raw_os_error() == Some(libc::ENOSYS) => {
                tracing::debug!("openat2 unavailable; falling back to openat");
            }
            other => return other.map(File::from),
        }
    }

    let flags = match opts.resolve {
        ResolvePolicy::Standard => flags,
        ResolvePolicy::Beneath | ResolvePolicy::NoSymlinks => flags | libc::O_NOFOLLOW,
    };
    // SAFETY: `c` is NUL-terminated and `dir` is a live descriptor borrowed for this call.
    let ret = unsafe { libc::openat(dir.as_raw_fd(), c.as_ptr(), flags, opts.mode as libc::c_uint) };
    fd_from_ret(ret).map(File::from)
}

#[cfg(target_os = "linux")]
fn openat2(
    dir: BorrowedFd<'_>,
    leaf: &CString,
    flags: libc::c_int,
    mode: u32,
    policy: ResolvePolicy,
) -> io::Result<OwnedFd> {
    // SAFETY: open_how is plain old data; all-zero is its documented empty value.
    let mut how: libc::open_how = unsafe { std::mem::zeroed() };
    how.flags = flags as u64;
    if flags & libc::O_CREAT != 0 {
        how.mode = u64::from(mode);
    }
    how.resolve = match policy {
        ResolvePolicy::Standard => 0,
        ResolvePolicy::Beneath => libc::RESOLVE_BENEATH,
        ResolvePolicy::NoSymlinks => libc::RESOLVE_NO_SYMLINKS,
    };

    // SAFETY: all pointers are valid for the call and `size` matches the record we pass.
    let ret = unsafe {
        libc::syscall(
            libc::SYS_openat2,
            dir.as_raw_fd(),
            leaf.as_ptr(),
            &how as *const libc::open_how,
            std::mem::size_of::<libc::open_how>(),
        )
    };
    fd_from_ret(ret as libc::c_int)
}

/// Put a descriptor back into blocking mode.
pub fn clear_nonblocking(file: &File) -> io::Result<()> {
    let fd = file.as_raw_fd();
    // SAFETY: `fd` is live for the borrow of `file`; F_GETFL/F_SETFL take no pointers.
    let flags = unsafe { libc::fcntl(fd, libc::F_GETFL) };
    if flags == -1 {
        return Err(io::Error::last_os_error());
    }
    if flags & libc::O_NONBLOCK == 0 {
        return Ok(());
    }
    if unsafe { libc::fcntl(fd, libc::F_SETFL, flags & !libc::O_NONBLOCK) } == -1 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

/// Close a file and report the result instead of swallowing it like `Drop` does.
pub fn close_checked(file: File) -> io::Result<()> {
    let fd = file.into_raw_fd();
    // SAFETY: we own `fd` (taken from the File above) and close it exactly once.
    if unsafe { libc::close(fd) } == -1 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

/// Open log file for appending; set 0600 only when creating a new file.
/// If the file already exists, we preserve its existing permissions.
pub fn open_log_file_secure_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let existed = path.exists();
    let f = OpenOptions::new()
        .create(true)
        .append(true)
        .mode(0o600)
        .custom_flags(libc::O_NOFOLLOW)
        .open(path)?;
    if !existed {
        let _ = fs::set_permissions(path, fs::Permissions::from_mode(0o600));
    }
    Ok(f)
}
