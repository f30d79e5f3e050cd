//! Navigate module
//!
//! Folder listings for the file manager's tree and grid views.

mod operations;
mod results;

// Re-export public types and functions
pub use operations::list_folder;
pub use results::Listing;
