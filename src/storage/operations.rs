//! Storage operations
//!
//! Filesystem mutations behind the connector's rename, move, copy, add
//! folder, save and delete operations. Every existence check here is best
//! effort: a concurrent request can still slip in between check and act.
//! Where the OS offers an atomic primitive (mkdir, exclusive create) its
//! own error is authoritative.

use log::{error, info};
use std::fs;

use crate::error::ConnectorError;
use crate::storage::filesystem::{copy_dir_recursive, directory_exists, entry_exists, replace_file};
use crate::storage::validation::{ConfinedPath, PathResolver, validate_name};

fn require_existing(path: &ConfinedPath) -> Result<(), ConnectorError> {
    if entry_exists(path.as_path()) {
        Ok(())
    } else {
        Err(ConnectorError::not_found(path.virtual_path()))
    }
}

fn require_directory(path: &ConfinedPath) -> Result<(), ConnectorError> {
    require_existing(path)?;
    if directory_exists(path.as_path()) {
        Ok(())
    } else {
        Err(ConnectorError::NotADirectory(path.virtual_path().to_string()))
    }
}

fn require_absent(path: &ConfinedPath) -> Result<(), ConnectorError> {
    if entry_exists(path.as_path()) {
        Err(ConnectorError::already_exists(path.virtual_path()))
    } else {
        Ok(())
    }
}

fn failed(action: &str, path: &ConfinedPath, e: std::io::Error) -> ConnectorError {
    error!(
        "Failed to {} {} (real: {}): {}",
        action,
        path.virtual_path(),
        path.as_path().display(),
        e
    );
    ConnectorError::from_io(e, path.virtual_path())
}

/// Destination of a move or copy: `target_dir/<source name>`.
fn destination(source: &ConfinedPath, target_dir: &ConfinedPath) -> Result<ConfinedPath, ConnectorError> {
    if source.is_root() {
        return Err(ConnectorError::InvalidPath("the root folder cannot be moved or copied".into()));
    }
    let target = target_dir.join_name(source.file_name())?;
    if target == *source {
        return Err(ConnectorError::already_exists(target.virtual_path()));
    }
    if target.as_path().starts_with(source.as_path()) {
        return Err(ConnectorError::InvalidPath(format!(
            "{} cannot be placed inside itself",
            source.virtual_path()
        )));
    }
    Ok(target)
}

/// Renames `old` in place to `new_name`.
pub fn rename_entry(
    resolver: &PathResolver,
    old: &ConfinedPath,
    new_name: &str,
) -> Result<ConfinedPath, ConnectorError> {
    if old.file_name() == new_name {
        return Err(ConnectorError::SameName);
    }
    validate_name(new_name)?;
    require_existing(old)?;

    let target = old.with_name(new_name, resolver)?;
    if entry_exists(target.as_path()) {
        return Err(ConnectorError::already_exists(new_name));
    }

    fs::rename(old.as_path(), target.as_path()).map_err(|e| failed("rename", old, e))?;
    info!(
        "Renamed {} to {} (real: {})",
        old.virtual_path(),
        target.virtual_path(),
        target.as_path().display()
    );
    Ok(target)
}

/// Moves `source` into the directory `target_dir`, keeping its name.
pub fn move_entry(source: &ConfinedPath, target_dir: &ConfinedPath) -> Result<ConfinedPath, ConnectorError> {
    let target = destination(source, target_dir)?;
    require_absent(&target)?;
    require_existing(source)?;
    require_directory(target_dir)?;

    fs::rename(source.as_path(), target.as_path()).map_err(|e| failed("move", source, e))?;
    info!(
        "Moved {} to {} (real: {})",
        source.virtual_path(),
        target.virtual_path(),
        target.as_path().display()
    );
    Ok(target)
}

/// Copies `source` (recursively for folders) into `target_dir`.
pub fn copy_entry(source: &ConfinedPath, target_dir: &ConfinedPath) -> Result<ConfinedPath, ConnectorError> {
    let target = destination(source, target_dir)?;
    require_absent(&target)?;
    require_existing(source)?;
    require_directory(target_dir)?;

    let result = if directory_exists(source.as_path()) {
        copy_dir_recursive(source.as_path(), target.as_path())
    } else {
        fs::copy(source.as_path(), target.as_path()).map(|_| ())
    };
    result.map_err(|e| failed("copy", source, e))?;

    info!(
        "Copied {} to {} (real: {})",
        source.virtual_path(),
        target.virtual_path(),
        target.as_path().display()
    );
    Ok(target)
}

/// Creates folder `name` inside `parent`. A single `mkdir` decides races:
/// exactly one concurrent caller wins, the rest see `AlreadyExists`.
pub fn create_folder(parent: &ConfinedPath, name: &str) -> Result<ConfinedPath, ConnectorError> {
    require_directory(parent)?;
    let target = parent.join_name(name)?;
    require_absent(&target)?;

    fs::create_dir(target.as_path()).map_err(|e| failed("create folder", &target, e))?;
    info!(
        "Created folder {} (real: {})",
        target.virtual_path(),
        target.as_path().display()
    );
    Ok(target)
}

/// Overwrites the file at `path` with `content`.
pub fn save_text(path: &ConfinedPath, content: &str) -> Result<(), ConnectorError> {
    require_existing(path)?;
    if directory_exists(path.as_path()) {
        return Err(ConnectorError::IsADirectory(path.virtual_path().to_string()));
    }

    // A failed replace never means the target already exists.
    replace_file(path.as_path(), content.as_bytes()).map_err(|e| {
        error!(
            "Failed to save {} (real: {}): {}",
            path.virtual_path(),
            path.as_path().display(),
            e
        );
        ConnectorError::OperationFailed(e.to_string())
    })?;
    info!(
        "Overwrote file {} (real: {})",
        path.virtual_path(),
        path.as_path().display()
    );
    Ok(())
}

/// Reads the whole file at `path` as UTF-8 text.
pub fn read_text(path: &ConfinedPath) -> Result<String, ConnectorError> {
    require_existing(path)?;
    if directory_exists(path.as_path()) {
        return Err(ConnectorError::IsADirectory(path.virtual_path().to_string()));
    }

    let bytes = fs::read(path.as_path()).map_err(|e| failed("read", path, e))?;
    String::from_utf8(bytes).map_err(|_| {
        ConnectorError::OperationFailed(format!("{} is not a UTF-8 text file", path.virtual_path()))
    })
}

/// Removes `path`, recursively for folders. The root can never be removed.
pub fn delete_entry(path: &ConfinedPath) -> Result<(), ConnectorError> {
    if path.is_root() {
        return Err(ConnectorError::RootProtected);
    }
    require_existing(path)?;

    if directory_exists(path.as_path()) {
        info!("Deleting directory: {}", path.as_path().display());
        fs::remove_dir_all(path.as_path()).map_err(|e| failed("delete directory", path, e))?;
    } else {
        info!("Deleting file: {}", path.as_path().display());
        fs::remove_file(path.as_path()).map_err(|e| failed("delete file", path, e))?;
    }
    Ok(())
}
