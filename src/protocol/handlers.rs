//! Operation handlers
//!
//! One handler per connector operation. Each pulls its parameters, confines
//! every path through the connector's resolver, performs the filesystem work
//! and describes the result from live disk state.

use crate::error::ConnectorError;
use crate::navigate::list_folder;
use crate::protocol::commands::Operation;
use crate::protocol::dispatcher::Connector;
use crate::protocol::parser::Params;
use crate::protocol::responses::{InitiateInfo, OperationResult, Outcome, Payload};
use crate::storage::operations::{
    copy_entry, create_folder, delete_entry, move_entry, read_text, rename_entry, save_text,
};
use crate::transfer::{read_download, read_thumbnail, store_upload};

impl Operation {
    /// Runs this operation against `connector`.
    pub fn execute(&self, params: &Params, connector: &Connector) -> OperationResult {
        if self.is_mutating() && connector.config().read_only {
            return Err(ConnectorError::ReadOnly);
        }

        match self {
            Operation::Initiate => handle_initiate(connector),
            Operation::GetFolder => handle_get_folder(params, connector),
            Operation::GetFile => handle_get_file(params, connector),
            Operation::EditFile => handle_edit_file(params, connector),
            Operation::AddFolder => handle_add_folder(params, connector),
            Operation::Rename => handle_rename(params, connector),
            Operation::Move => handle_move(params, connector),
            Operation::Copy => handle_copy(params, connector),
            Operation::Delete => handle_delete(params, connector),
            Operation::Download => handle_download(params, connector),
            Operation::GetImage => handle_get_image(params, connector),
            Operation::Upload => handle_upload(params, connector),
            Operation::SaveFile => handle_save_file(params, connector),
            Operation::ReadFile | Operation::Summarize | Operation::Extract => {
                Err(ConnectorError::Unimplemented(self.mode().to_string()))
            }
        }
    }
}

fn check_extension(connector: &Connector, name: &str) -> Result<(), ConnectorError> {
    match connector.config().is_extension_disallowed(name) {
        Some(extension) => Err(ConnectorError::ForbiddenExtension(extension)),
        None => Ok(()),
    }
}

fn handle_initiate(connector: &Connector) -> OperationResult {
    Ok(Outcome::Data(Payload::Initiate(InitiateInfo::from_config(
        connector.config(),
    ))))
}

fn handle_get_file(params: &Params, connector: &Connector) -> OperationResult {
    let path = connector.resolve(params.require("path", "No path in request")?)?;
    Ok(connector.describe(&path, None)?.into())
}

fn handle_edit_file(params: &Params, connector: &Connector) -> OperationResult {
    let path = connector.resolve(params.require("path", "No path in request")?)?;
    let content = read_text(&path)?;
    Ok(connector.describe(&path, Some(content))?.into())
}

fn handle_get_folder(params: &Params, connector: &Connector) -> OperationResult {
    let path = connector.resolve(params.require("path", "No path in request")?)?;
    let listing = list_folder(&path, &connector.config().userfiles_url())?;
    Ok(Outcome::Data(Payload::Folder(listing)))
}

fn handle_add_folder(params: &Params, connector: &Connector) -> OperationResult {
    let parent = connector.resolve(params.require("path", "No path specified")?)?;
    let name = params.require("name", "No name for new folder")?;

    let created = create_folder(&parent, name)?;
    Ok(connector.describe(&created, None)?.into())
}

fn handle_rename(params: &Params, connector: &Connector) -> OperationResult {
    let old = connector.resolve(params.require("old", "No old path specified")?)?;
    let new_name = params.require("new", "No new name specified")?;
    check_extension(connector, new_name)?;

    let renamed = rename_entry(connector.resolver(), &old, new_name)?;
    Ok(connector.describe(&renamed, None)?.into())
}

fn handle_move(params: &Params, connector: &Connector) -> OperationResult {
    let source = connector.resolve(params.require("old", "No old path specified")?)?;
    let target_dir = connector.resolve(params.require("new", "No new path specified")?)?;

    let moved = move_entry(&source, &target_dir)?;
    Ok(connector.describe(&moved, None)?.into())
}

fn handle_copy(params: &Params, connector: &Connector) -> OperationResult {
    let source = connector.resolve(params.require("source", "No source path specified")?)?;
    let target_dir = connector.resolve(params.require("target", "No target path specified")?)?;

    let copied = copy_entry(&source, &target_dir)?;
    Ok(connector.describe(&copied, None)?.into())
}

fn handle_delete(params: &Params, connector: &Connector) -> OperationResult {
    let path = connector.resolve(params.require("path", "No path in query")?)?;
    if path.is_root() {
        return Err(ConnectorError::RootProtected);
    }

    // Described up front: afterwards there is nothing left to stat.
    let snapshot = connector.describe(&path, None)?;
    delete_entry(&path)?;
    Ok(snapshot.into())
}

fn handle_download(params: &Params, connector: &Connector) -> OperationResult {
    let path = connector.resolve(params.require("path", "No path in request")?)?;

    // The file manager probes with an XHR before navigating to the file.
    if params.is_xhr() {
        return Ok(connector.describe(&path, None)?.into());
    }
    Ok(Outcome::Attachment(read_download(&path)?))
}

fn handle_get_image(params: &Params, connector: &Connector) -> OperationResult {
    let path = connector.resolve(params.require("path", "No path in request")?)?;
    Ok(Outcome::Attachment(read_thumbnail(&path, params.flag("thumbnail"))?))
}

fn handle_upload(params: &Params, connector: &Connector) -> OperationResult {
    let parent = connector.resolve(params.require("path", "No path in query")?)?;
    let upload = params
        .upload()
        .ok_or_else(|| ConnectorError::MissingParameter("No file in request".into()))?;
    check_extension(connector, &upload.file_name)?;

    let stored = store_upload(
        &parent,
        &upload.file_name,
        &upload.data,
        connector.config().max_upload_size_bytes(),
    )?;
    let descriptor = connector.describe(&stored, None)?;
    Ok(Outcome::Data(Payload::Files(vec![descriptor])))
}

fn handle_save_file(params: &Params, connector: &Connector) -> OperationResult {
    let path = connector.resolve(params.require("path", "No path in query")?)?;
    let content = params
        .get("content")
        .ok_or_else(|| ConnectorError::MissingParameter("No content".into()))?;

    save_text(&path, content)?;
    Ok(connector.describe(&path, None)?.into())
}
