//! File system storage management
//!
//! Path confinement, entry descriptors and the filesystem mutations behind
//! every connector operation.

pub mod descriptor;
pub mod filesystem;
pub mod operations;
pub mod permissions;
pub mod results;
pub mod validation;

// Re-export commonly used types and functions
pub use descriptor::describe;
pub use results::{FileAttributes, FileDescriptor, FileKind, Timestamp};
pub use validation::{ConfinedPath, PathResolver, validate_name};
