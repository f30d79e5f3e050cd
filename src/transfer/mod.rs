//! Transfer module
//!
//! Moves whole files in and out of the root: uploads, downloads and
//! thumbnails.

pub mod file_ops;
pub mod results;
pub mod thumbnail;

// Re-export key types and functions
pub use file_ops::{read_download, read_thumbnail, store_upload};
pub use results::{Attachment, content_type_for};
