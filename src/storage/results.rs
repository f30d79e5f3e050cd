//! Storage result types
//!
//! The descriptor record returned to the file manager for every entry.

use serde::{Serialize, Serializer};

/// Whether a descriptor names a regular file or a directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    File,
    Folder,
}

/// A point in time as both epoch seconds and a `ctime(3)`-style string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timestamp {
    pub epoch_secs: i64,
    pub display: String,
}

impl Timestamp {
    pub fn from_epoch(epoch_secs: i64) -> Self {
        let display = chrono::DateTime::from_timestamp(epoch_secs, 0)
            .map(|utc| {
                utc.with_timezone(&chrono::Local)
                    .format("%a %b %e %H:%M:%S %Y")
                    .to_string()
            })
            .unwrap_or_default();
        Self {
            epoch_secs,
            display,
        }
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.display)
    }
}

/// Snapshot of one filesystem entry, rebuilt from disk for every response.
#[derive(Debug, Clone, Serialize)]
pub struct FileDescriptor {
    /// Virtual path, with a trailing slash for folders
    pub id: String,
    #[serde(rename = "type")]
    pub kind: FileKind,
    pub attributes: FileAttributes,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileAttributes {
    pub name: String,
    /// Public URL of the raw file
    pub path: String,
    #[serde(serialize_with = "as_flag")]
    pub readable: bool,
    #[serde(rename = "writeable", serialize_with = "as_flag")]
    pub writable: bool,
    pub created: Timestamp,
    pub modified: Timestamp,
    /// Modification time in epoch seconds
    pub timestamp: i64,
    pub width: u32,
    pub height: u32,
    pub size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

fn as_flag<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u8(u8::from(*value))
}

impl FileDescriptor {
    pub fn is_folder(&self) -> bool {
        self.kind == FileKind::Folder
    }

    pub fn name(&self) -> &str {
        &self.attributes.name
    }

    pub fn size(&self) -> u64 {
        self.attributes.size
    }

    pub fn content(&self) -> Option<&str> {
        self.attributes.content.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_in_wire_shape() {
        let descriptor = FileDescriptor {
            id: "/docs/".into(),
            kind: FileKind::Folder,
            attributes: FileAttributes {
                name: "docs".into(),
                path: "/fm/userfiles/docs/".into(),
                readable: true,
                writable: false,
                created: Timestamp::from_epoch(0),
                modified: Timestamp::from_epoch(60),
                timestamp: 60,
                width: 0,
                height: 0,
                size: 0,
                content: None,
            },
        };

        let json = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(json["id"], "/docs/");
        assert_eq!(json["type"], "folder");
        assert_eq!(json["attributes"]["readable"], 1);
        assert_eq!(json["attributes"]["writeable"], 0);
        assert_eq!(json["attributes"]["timestamp"], 60);
        assert!(json["attributes"]["created"].is_string());
        assert!(json["attributes"].get("content").is_none());
    }

    #[test]
    fn ctime_style_display() {
        let ts = Timestamp::from_epoch(1_700_000_000);
        // e.g. "Tue Nov 14 22:13:20 2023", exact hour depends on local zone
        assert_eq!(ts.display.len(), 24);
        assert!(ts.display.ends_with("2023"));
    }
}
