//! Module `file_ops`
//!
//! Whole-buffer uploads into the root and downloads out of it. Uploads use
//! exclusive creation so two clients racing for the same name cannot
//! overwrite each other.

use crate::error::ConnectorError;
use crate::storage::filesystem::{directory_exists, entry_exists, write_new_file};
use crate::storage::validation::ConfinedPath;
use crate::transfer::results::{Attachment, content_type_for};
use crate::transfer::thumbnail::make_thumbnail;
use log::{error, info};
use std::fs;

const THUMBNAIL_NAME: &str = "thumbnail.png";

/// Stores an uploaded file named `file_name` inside the folder `parent`.
pub fn store_upload(
    parent: &ConfinedPath,
    file_name: &str,
    data: &[u8],
    max_size: usize,
) -> Result<ConfinedPath, ConnectorError> {
    if !entry_exists(parent.as_path()) {
        return Err(ConnectorError::not_found(parent.virtual_path()));
    }
    if !directory_exists(parent.as_path()) {
        return Err(ConnectorError::NotADirectory(parent.virtual_path().to_string()));
    }

    let destination = parent.join_name(file_name)?;
    if entry_exists(destination.as_path()) {
        return Err(ConnectorError::AlreadyExists(format!(
            "Upload failed: file {} already exists",
            destination.virtual_path()
        )));
    }

    if data.len() > max_size {
        error!(
            "File size limit exceeded: {} bytes > {} bytes",
            data.len(),
            max_size
        );
        return Err(ConnectorError::OperationFailed(format!(
            "file too large ({} bytes, limit {} bytes)",
            data.len(),
            max_size
        )));
    }

    info!(
        "Uploading file to {} (real: {}, {} bytes)",
        destination.virtual_path(),
        destination.as_path().display(),
        data.len()
    );
    write_new_file(destination.as_path(), data).map_err(|e| {
        error!("Failed to store upload {}: {}", destination.virtual_path(), e);
        ConnectorError::from_io(e, destination.virtual_path())
    })?;

    Ok(destination)
}

fn read_file(path: &ConfinedPath) -> Result<Attachment, ConnectorError> {
    let data = fs::read(path.as_path()).map_err(|e| ConnectorError::from_io(e, path.virtual_path()))?;
    let file_name = path.file_name().to_string();
    Ok(Attachment {
        content_type: content_type_for(&file_name),
        file_name,
        data,
    })
}

/// Raw bytes of the file at `path`. Folders would need an archive, which
/// is not supported.
pub fn read_download(path: &ConfinedPath) -> Result<Attachment, ConnectorError> {
    if !entry_exists(path.as_path()) {
        return Err(ConnectorError::not_found(path.virtual_path()));
    }
    if directory_exists(path.as_path()) {
        return Err(ConnectorError::Unimplemented(
            "download of a folder as archive".into(),
        ));
    }

    let attachment = read_file(path)?;
    info!(
        "Serving download {} ({} bytes)",
        path.virtual_path(),
        attachment.data.len()
    );
    Ok(attachment)
}

/// The image at `path`, either as stored or as a 64x64 PNG thumbnail.
pub fn read_thumbnail(path: &ConfinedPath, thumbnail: bool) -> Result<Attachment, ConnectorError> {
    if !entry_exists(path.as_path()) {
        return Err(ConnectorError::not_found(path.virtual_path()));
    }
    if directory_exists(path.as_path()) {
        return Err(ConnectorError::IsADirectory(path.virtual_path().to_string()));
    }

    if !thumbnail {
        return read_file(path);
    }

    let data = make_thumbnail(path.as_path(), path.virtual_path())?;
    Ok(Attachment {
        file_name: THUMBNAIL_NAME.to_string(),
        content_type: "image/png",
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::validation::PathResolver;

    fn setup() -> (tempfile::TempDir, PathResolver) {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("docs")).unwrap();
        let resolver = PathResolver::new(dir.path()).unwrap();
        (dir, resolver)
    }

    #[test]
    fn upload_writes_bytes_once() {
        let (dir, resolver) = setup();
        let parent = resolver.resolve("/docs").unwrap();
        let stored = store_upload(&parent, "report.pdf", b"%PDF-1.4", 1024).unwrap();
        assert_eq!(stored.virtual_path(), "/docs/report.pdf");
        assert_eq!(fs::read(dir.path().join("docs/report.pdf")).unwrap(), b"%PDF-1.4");

        assert!(matches!(
            store_upload(&parent, "report.pdf", b"other", 1024),
            Err(ConnectorError::AlreadyExists(_))
        ));
        assert_eq!(fs::read(dir.path().join("docs/report.pdf")).unwrap(), b"%PDF-1.4");
    }

    #[test]
    fn upload_rejects_bad_names_and_parents() {
        let (_dir, resolver) = setup();
        let parent = resolver.resolve("/docs").unwrap();
        assert!(matches!(
            store_upload(&parent, "../escape.txt", b"x", 1024),
            Err(ConnectorError::InvalidPath(_))
        ));
        let missing = resolver.resolve("/missing").unwrap();
        assert!(matches!(
            store_upload(&missing, "a.txt", b"x", 1024),
            Err(ConnectorError::NotFound(_))
        ));
    }

    #[test]
    fn upload_respects_size_limit() {
        let (dir, resolver) = setup();
        let parent = resolver.resolve("/docs").unwrap();
        assert!(store_upload(&parent, "big.bin", &[0u8; 16], 8).is_err());
        assert!(!dir.path().join("docs/big.bin").exists());
    }

    #[test]
    fn folder_download_is_unimplemented() {
        let (_dir, resolver) = setup();
        assert!(matches!(
            read_download(&resolver.resolve("/docs").unwrap()),
            Err(ConnectorError::Unimplemented(_))
        ));
    }

    #[test]
    fn download_carries_name_and_type() {
        let (dir, resolver) = setup();
        fs::write(dir.path().join("docs/notes.txt"), "hi").unwrap();
        let attachment = read_download(&resolver.resolve("/docs/notes.txt").unwrap()).unwrap();
        assert_eq!(attachment.file_name, "notes.txt");
        assert_eq!(attachment.content_type, "text/plain; charset=utf-8");
        assert_eq!(attachment.data, b"hi");
    }

    #[test]
    fn image_of_a_folder_is_rejected() {
        let (_dir, resolver) = setup();
        assert!(matches!(
            read_thumbnail(&resolver.resolve("/docs").unwrap(), true),
            Err(ConnectorError::IsADirectory(_))
        ));
    }
}
