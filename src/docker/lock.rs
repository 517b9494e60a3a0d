use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Exclusive advisory lock serializing image builds for one image name.
///
/// Held until dropped. Concurrent launchers for the same image block in
/// [`BuildLock::acquire`] until the current holder is done.
#[derive(Debug)]
pub struct BuildLock {
    file: File,
    path: PathBuf,
}

impl BuildLock {
    pub fn acquire(dir: &Path, image: &str) -> io::Result<Self> {
        let path = lock_path(dir, image);
        let file = open_lock_file(&path)?;
        debug!(path = %path.display(), "waiting for build lock");
        lock_exclusive(&file)?;
        debug!(path = %path.display(), "build lock acquired");
        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for BuildLock {
    fn drop(&mut self) {
        unlock(&self.file);
    }
}

/// Open or create the lock file. A file left by another user may not be
/// writable; `flock` only needs a descriptor, so fall back to read-only.
fn open_lock_file(path: &Path) -> io::Result<File> {
    match OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(path)
    {
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied && path.exists() => {
            debug!(path = %path.display(), "lock file not writable, opening read-only");
            File::open(path)
        }
        other => other,
    }
}

/// Lock file for `image`; characters outside `[A-Za-z0-9._-]` become `_`.
pub fn lock_path(dir: &Path, image: &str) -> PathBuf {
    let key: String = image
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    dir.join(format!("vertex-launch-{key}.lock"))
}

#[cfg(unix)]
fn lock_exclusive(file: &File) -> io::Result<()> {
    use std::os::unix::io::AsRawFd;
    loop {
        // SAFETY: flock is a standard POSIX call on a descriptor owned by `file`.
        let result = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX) };
        if result == 0 {
            return Ok(());
        }
        let err = io::Error::last_os_error();
        if err.kind() != io::ErrorKind::Interrupted {
            return Err(err);
        }
    }
}

#[cfg(unix)]
fn unlock(file: &File) {
    use std::os::unix::io::AsRawFd;
    // SAFETY: as above; the descriptor stays valid for the lifetime of `file`.
    unsafe {
        libc::flock(file.as_raw_fd(), libc::LOCK_UN);
    }
}

#[cfg(not(unix))]
fn lock_exclusive(file: &File) -> io::Result<()> {
    file.lock()
}

#[cfg(not(unix))]
fn unlock(file: &File) {
    let _ = file.unlock();
}
