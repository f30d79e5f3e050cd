//! Descriptor builder
//!
//! Stats a confined entry and assembles the record the file manager renders.

use std::fs::{self, Metadata};
use std::time::{SystemTime, UNIX_EPOCH};

use log::warn;

use crate::error::ConnectorError;
use crate::storage::permissions::{is_readable, is_writable};
use crate::storage::results::{FileAttributes, FileDescriptor, FileKind, Timestamp};
use crate::storage::validation::ConfinedPath;
use crate::transfer::thumbnail::{image_dimensions, is_image_name};

/// Build the descriptor of `path`.
///
/// `userfiles_url` is the public URL prefix raw files are served from;
/// `content` is copied verbatim into the record (edit-file only).
pub fn describe(
    path: &ConfinedPath,
    userfiles_url: &str,
    content: Option<String>,
) -> Result<FileDescriptor, ConnectorError> {
    let metadata = fs::metadata(path.as_path())
        .map_err(|_| ConnectorError::not_found(path.virtual_path()))?;

    let kind = if metadata.is_dir() {
        FileKind::Folder
    } else {
        FileKind::File
    };

    let mut id = path.virtual_path().to_string();
    if kind == FileKind::Folder && !id.ends_with('/') {
        id.push('/');
    }

    let name = path.file_name().to_string();
    let (width, height) = if kind == FileKind::File && is_image_name(&name) {
        image_dimensions(path.as_path(), path.virtual_path()).unwrap_or_else(|e| {
            warn!("Reporting 0x0 for {}: {}", path.virtual_path(), e);
            (0, 0)
        })
    } else {
        (0, 0)
    };

    let modified = epoch_secs(metadata.modified().ok());
    let created = created_secs(&metadata).unwrap_or(modified);

    Ok(FileDescriptor {
        attributes: FileAttributes {
            name,
            path: format!("{}{}", userfiles_url, id.trim_start_matches('/')),
            readable: is_readable(path.as_path()),
            writable: is_writable(path.as_path()),
            created: Timestamp::from_epoch(created),
            modified: Timestamp::from_epoch(modified),
            timestamp: modified,
            width,
            height,
            size: if kind == FileKind::Folder { 0 } else { metadata.len() },
            content,
        },
        id,
        kind,
    })
}

fn epoch_secs(time: Option<SystemTime>) -> i64 {
    time.and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

fn created_secs(metadata: &Metadata) -> Option<i64> {
    metadata.created().ok().map(|t| epoch_secs(Some(t)))
}
