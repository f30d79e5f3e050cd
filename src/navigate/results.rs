//! Result types for navigate operations

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::storage::FileDescriptor;

/// Children of a folder in display order: folders first, then files.
///
/// Serializes as a JSON object keyed by each child's virtual path, in that
/// order.
#[derive(Debug, Clone, Default)]
pub struct Listing {
    pub entries: Vec<FileDescriptor>,
}

impl Listing {
    pub fn iter(&self) -> impl Iterator<Item = &FileDescriptor> {
        self.entries.iter()
    }

    pub fn get(&self, id: &str) -> Option<&FileDescriptor> {
        self.entries.iter().find(|entry| entry.id == id)
    }
}

impl Serialize for Listing {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            let key = entry.id.strip_suffix('/').unwrap_or(&entry.id);
            map.serialize_entry(key, entry)?;
        }
        map.end()
    }
}
