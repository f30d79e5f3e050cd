//! File permissions
//!
//! Answers "could this process read/write the entry" the way `access(2)` does.

use std::path::Path;

#[cfg(unix)]
use nix::unistd::{AccessFlags, access};

/// Check if file is readable
#[cfg(unix)]
pub fn is_readable(path: &Path) -> bool {
    access(path, AccessFlags::R_OK).is_ok()
}

/// Check if file is writable
#[cfg(unix)]
pub fn is_writable(path: &Path) -> bool {
    access(path, AccessFlags::W_OK).is_ok()
}

#[cfg(not(unix))]
pub fn is_readable(path: &Path) -> bool {
    std::fs::metadata(path).is_ok()
}

#[cfg(not(unix))]
pub fn is_writable(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|meta| !meta.permissions().readonly())
        .unwrap_or(false)
}
