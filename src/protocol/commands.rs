//! Module `commands`
//!
//! The closed set of connector operations and how `mode` strings map onto
//! them.

use crate::error::ConnectorError;

/// How the request reached the connector. Each mode is only valid on one
/// of the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Get,
    Post,
}

impl Transport {
    pub fn as_str(&self) -> &'static str {
        match self {
            Transport::Get => "GET",
            Transport::Post => "POST",
        }
    }
}

/// Represents a connector operation parsed from the `mode` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Initiate,
    GetFolder,
    GetFile,
    AddFolder,
    Rename,
    Move,
    Copy,
    EditFile,
    Delete,
    Download,
    GetImage,
    ReadFile,
    Summarize,
    Upload,
    SaveFile,
    Extract,
}

impl Operation {
    /// Parses the `mode` of a request arriving over `transport`.
    ///
    /// A missing mode, an unknown mode and a mode sent over the wrong
    /// transport all fail with `UnknownMode`.
    pub fn parse(mode: Option<&str>, transport: Transport) -> Result<Self, ConnectorError> {
        let raw = mode.unwrap_or_default();
        let operation = match (transport, raw) {
            (Transport::Get, "initiate") => Operation::Initiate,
            (Transport::Get, "getfolder") => Operation::GetFolder,
            (Transport::Get, "getfile") => Operation::GetFile,
            (Transport::Get, "addfolder") => Operation::AddFolder,
            (Transport::Get, "rename") => Operation::Rename,
            (Transport::Get, "move") => Operation::Move,
            (Transport::Get, "copy") => Operation::Copy,
            (Transport::Get, "editfile") => Operation::EditFile,
            (Transport::Get, "delete") => Operation::Delete,
            (Transport::Get, "download") => Operation::Download,
            (Transport::Get, "getimage") => Operation::GetImage,
            (Transport::Get, "readfile") => Operation::ReadFile,
            (Transport::Get, "summarize") => Operation::Summarize,
            (Transport::Post, "upload") => Operation::Upload,
            (Transport::Post, "savefile") => Operation::SaveFile,
            (Transport::Post, "extract") => Operation::Extract,
            _ => {
                return Err(ConnectorError::UnknownMode {
                    transport: transport.as_str(),
                    mode: raw.to_string(),
                });
            }
        };
        Ok(operation)
    }

    /// The `mode` string of this operation
    pub fn mode(&self) -> &'static str {
        match self {
            Operation::Initiate => "initiate",
            Operation::GetFolder => "getfolder",
            Operation::GetFile => "getfile",
            Operation::AddFolder => "addfolder",
            Operation::Rename => "rename",
            Operation::Move => "move",
            Operation::Copy => "copy",
            Operation::EditFile => "editfile",
            Operation::Delete => "delete",
            Operation::Download => "download",
            Operation::GetImage => "getimage",
            Operation::ReadFile => "readfile",
            Operation::Summarize => "summarize",
            Operation::Upload => "upload",
            Operation::SaveFile => "savefile",
            Operation::Extract => "extract",
        }
    }

    /// Operations that change the filesystem; refused in read-only mode.
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Operation::AddFolder
                | Operation::Rename
                | Operation::Move
                | Operation::Copy
                | Operation::Upload
                | Operation::SaveFile
                | Operation::Delete
                | Operation::Extract
        )
    }

    /// Operations whose success payload is raw bytes rather than JSON
    pub fn is_binary(&self) -> bool {
        matches!(self, Operation::Download | Operation::GetImage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_get_modes() {
        assert_eq!(
            Operation::parse(Some("getfolder"), Transport::Get).unwrap(),
            Operation::GetFolder
        );
        assert_eq!(
            Operation::parse(Some("getimage"), Transport::Get).unwrap(),
            Operation::GetImage
        );
    }

    #[test]
    fn post_only_modes_are_unknown_over_get() {
        assert!(matches!(
            Operation::parse(Some("upload"), Transport::Get),
            Err(ConnectorError::UnknownMode { transport: "GET", .. })
        ));
        assert!(matches!(
            Operation::parse(Some("rename"), Transport::Post),
            Err(ConnectorError::UnknownMode { transport: "POST", .. })
        ));
    }

    #[test]
    fn missing_mode_is_unknown() {
        let err = Operation::parse(None, Transport::Get).unwrap_err();
        assert_eq!(err.to_string(), "Unknown GET mode: ");
    }

    #[test]
    fn mode_round_trips_for_every_operation() {
        let all = [
            (Operation::Initiate, Transport::Get),
            (Operation::GetFolder, Transport::Get),
            (Operation::GetFile, Transport::Get),
            (Operation::AddFolder, Transport::Get),
            (Operation::Rename, Transport::Get),
            (Operation::Move, Transport::Get),
            (Operation::Copy, Transport::Get),
            (Operation::EditFile, Transport::Get),
            (Operation::Delete, Transport::Get),
            (Operation::Download, Transport::Get),
            (Operation::GetImage, Transport::Get),
            (Operation::ReadFile, Transport::Get),
            (Operation::Summarize, Transport::Get),
            (Operation::Upload, Transport::Post),
            (Operation::SaveFile, Transport::Post),
            (Operation::Extract, Transport::Post),
        ];
        for (operation, transport) in all {
            assert_eq!(Operation::parse(Some(operation.mode()), transport).unwrap(), operation);
        }
    }
}
