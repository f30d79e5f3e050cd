//! Navigation operations implementation

use std::fs;

use log::{info, warn};

use crate::error::ConnectorError;
use crate::navigate::results::Listing;
use crate::storage::validation::ConfinedPath;
use crate::storage::{FileDescriptor, describe};

/// Lists the immediate children of a directory.
///
/// Folders come first, then files; each group is ordered by lowercased
/// name. A child that vanishes or cannot be stat'ed while listing is skipped
/// with a warning instead of failing the whole folder.
pub fn list_folder(dir: &ConfinedPath, userfiles_url: &str) -> Result<Listing, ConnectorError> {
    let metadata = fs::metadata(dir.as_path())
        .map_err(|_| ConnectorError::not_found(dir.virtual_path()))?;
    if !metadata.is_dir() {
        return Err(ConnectorError::NotADirectory(dir.virtual_path().to_string()));
    }

    let mut names: Vec<String> = fs::read_dir(dir.as_path())
        .map_err(|e| {
            warn!("Failed to list directory {}: {}", dir.virtual_path(), e);
            ConnectorError::from(e)
        })?
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry.file_name().to_string_lossy().to_string()),
            Err(e) => {
                warn!("Skipping unreadable entry in {}: {}", dir.virtual_path(), e);
                None
            }
        })
        .collect();
    names.sort_by_key(|name| name.to_lowercase());

    let mut folders: Vec<FileDescriptor> = Vec::new();
    let mut files: Vec<FileDescriptor> = Vec::new();
    for name in &names {
        let child = match dir.join_name(name) {
            Ok(child) => child,
            Err(e) => {
                warn!("Skipping entry {:?} in {}: {}", name, dir.virtual_path(), e);
                continue;
            }
        };
        match describe(&child, userfiles_url, None) {
            Ok(descriptor) if descriptor.is_folder() => folders.push(descriptor),
            Ok(descriptor) => files.push(descriptor),
            Err(e) => warn!("Skipping entry {}: {}", child.virtual_path(), e),
        }
    }

    folders.extend(files);
    info!(
        "Listed directory {} (real: {}) - {} entries",
        dir.virtual_path(),
        dir.as_path().display(),
        folders.len()
    );

    Ok(Listing { entries: folders })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::validation::PathResolver;

    #[test]
    fn folders_first_then_case_insensitive_names() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        for folder in ["zeta", "Alpha", "beta"] {
            fs::create_dir(root.join(folder)).unwrap();
        }
        for file in ["b.txt", "A.txt", "c.txt", "Aardvark.md"] {
            fs::write(root.join(file), "x").unwrap();
        }

        let resolver = PathResolver::new(root).unwrap();
        let listing = list_folder(&resolver.resolve("/").unwrap(), "/fm/userfiles/").unwrap();
        let ids: Vec<&str> = listing.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["/Alpha/", "/beta/", "/zeta/", "/A.txt", "/Aardvark.md", "/b.txt", "/c.txt"]
        );
    }

    #[test]
    fn serialized_keys_keep_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("b")).unwrap();
        fs::write(dir.path().join("a.txt"), "x").unwrap();

        let resolver = PathResolver::new(dir.path()).unwrap();
        let listing = list_folder(&resolver.resolve("/").unwrap(), "/fm/userfiles/").unwrap();
        let json = serde_json::to_string(&listing).unwrap();
        let b = json.find("\"/b\"").unwrap();
        let a = json.find("\"/a.txt\"").unwrap();
        assert!(b < a);
    }

    #[test]
    fn listing_a_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "x").unwrap();
        let resolver = PathResolver::new(dir.path()).unwrap();
        assert!(matches!(
            list_folder(&resolver.resolve("/a.txt").unwrap(), "/fm/userfiles/"),
            Err(ConnectorError::NotADirectory(_))
        ));
    }
}
