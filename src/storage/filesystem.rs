//! File system operations
//!
//! Low-level helpers the storage operations are built from.

use std::fs::{self, OpenOptions};
use std::io::{self, Result, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use walkdir::WalkDir;

/// Check if an entry exists without following a dangling symlink into an error
pub fn entry_exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Check if directory exists
pub fn directory_exists(path: &Path) -> bool {
    path.is_dir()
}

/// Recursively copy the directory `from` to the not yet existing `to`.
///
/// Symlinks are recreated, never followed.
pub fn copy_dir_recursive(from: &Path, to: &Path) -> Result<()> {
    for entry in WalkDir::new(from).follow_links(false) {
        let entry = entry.map_err(io::Error::from)?;
        let relative = entry.path().strip_prefix(from).map_err(io::Error::other)?;
        let target = to.join(relative);
        let file_type = entry.file_type();
        if file_type.is_dir() {
            fs::create_dir(&target)?;
        } else if file_type.is_symlink() {
            copy_symlink(entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

#[cfg(unix)]
fn copy_symlink(from: &Path, to: &Path) -> Result<()> {
    std::os::unix::fs::symlink(fs::read_link(from)?, to)
}

#[cfg(not(unix))]
fn copy_symlink(from: &Path, to: &Path) -> Result<()> {
    fs::copy(from, to).map(|_| ())
}

/// Write `data` to `path`, failing with `AlreadyExists` instead of
/// overwriting. A partially written file is removed again.
pub fn write_new_file(path: &Path, data: &[u8]) -> Result<()> {
    let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
    if let Err(e) = file.write_all(data).and_then(|_| file.sync_all()) {
        drop(file);
        let _ = fs::remove_file(path);
        return Err(e);
    }
    Ok(())
}

/// Replace the contents of `path` with `data` via a uniquely named sibling
/// temporary file and a rename, so readers never observe a half-written
/// file and concurrent saves never share a temporary.
pub fn replace_file(path: &Path, data: &[u8]) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no parent"))?;

    // Dropped without persisting, the temporary removes itself.
    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(data)?;
    temp.as_file().sync_all()?;

    // Keep the original permission bits on the replacement.
    if let Ok(meta) = fs::metadata(path) {
        let _ = fs::set_permissions(temp.path(), meta.permissions());
    }

    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
