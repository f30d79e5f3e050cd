//! Path validation
//!
//! Maps client-supplied virtual paths onto the configured root and refuses
//! anything that would land outside of it.

use std::io;
use std::path::{Component, Path, PathBuf};

use crate::error::ConnectorError;

/// A filesystem location proven to lie inside the connector root.
///
/// Only [`PathResolver`] can build one, so holding a `ConfinedPath` means the
/// containment check already happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfinedPath {
    real: PathBuf,
    virtual_path: String,
}

impl ConfinedPath {
    /// Real, absolute location on disk
    pub fn as_path(&self) -> &Path {
        &self.real
    }

    /// Normalized virtual path: rooted at `/`, no trailing slash except for
    /// the root itself.
    pub fn virtual_path(&self) -> &str {
        &self.virtual_path
    }

    pub fn is_root(&self) -> bool {
        self.virtual_path == "/"
    }

    /// Last path component, empty for the root
    pub fn file_name(&self) -> &str {
        self.virtual_path
            .rsplit('/')
            .next()
            .unwrap_or_default()
    }

    /// Virtual path of the containing directory (`/` for top-level entries)
    pub fn parent_virtual(&self) -> &str {
        match self.virtual_path.rfind('/') {
            Some(0) | None => "/",
            Some(idx) => &self.virtual_path[..idx],
        }
    }

    /// Child entry `name` of this path; `name` must be a single component.
    pub fn join_name(&self, name: &str) -> Result<ConfinedPath, ConnectorError> {
        validate_name(name)?;
        let virtual_path = if self.is_root() {
            format!("/{name}")
        } else {
            format!("{}/{}", self.virtual_path, name)
        };
        Ok(ConfinedPath {
            real: self.real.join(name),
            virtual_path,
        })
    }

    /// Sibling entry `name`, i.e. same parent directory.
    pub fn with_name(&self, name: &str, resolver: &PathResolver) -> Result<ConfinedPath, ConnectorError> {
        if self.is_root() {
            return Err(ConnectorError::InvalidPath("the root has no siblings".into()));
        }
        resolver.resolve(self.parent_virtual())?.join_name(name)
    }
}

/// Validates a single client-supplied entry name (new folder, rename target,
/// uploaded file name).
pub fn validate_name(name: &str) -> Result<(), ConnectorError> {
    if name.is_empty() {
        return Err(ConnectorError::InvalidPath("empty name".into()));
    }
    if name == "." || name == ".." {
        return Err(ConnectorError::InvalidPath(format!("{name:?} is not a valid name")));
    }
    if name.contains(['/', '\\', '\0']) {
        return Err(ConnectorError::InvalidPath(format!(
            "{name:?} must be a single path component"
        )));
    }
    Ok(())
}

/// Resolves virtual paths against one root directory.
#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
}

impl PathResolver {
    /// Create a resolver for `root`, creating the directory when missing.
    /// The root is canonicalized so symlink checks compare like with like.
    pub fn new(root: &Path) -> io::Result<Self> {
        std::fs::create_dir_all(root)?;
        let root = root.canonicalize()?;
        if !root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("server root {} is not a directory", root.display()),
            ));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Convert a virtual path into a confined real path.
    ///
    /// `.` segments and repeated slashes are dropped, `..` pops a segment and
    /// fails once it would climb above the root. The result is then checked
    /// against the root on disk so symlinks cannot lead outside either.
    pub fn resolve(&self, virtual_path: &str) -> Result<ConfinedPath, ConnectorError> {
        if virtual_path.contains('\0') {
            return Err(ConnectorError::InvalidPath("path contains a NUL byte".into()));
        }

        let mut segments: Vec<&str> = Vec::new();
        for segment in virtual_path.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    if segments.pop().is_none() {
                        return Err(ConnectorError::InvalidPath(virtual_path.to_string()));
                    }
                }
                s if s.contains('\\') && cfg!(windows) => {
                    return Err(ConnectorError::InvalidPath(virtual_path.to_string()));
                }
                s => segments.push(s),
            }
        }

        let mut real = self.root.clone();
        for segment in &segments {
            real.push(segment);
        }

        // Lexical post-condition: only normal components were appended.
        let escapes = real
            .strip_prefix(&self.root)
            .map(|rest| rest.components().any(|c| !matches!(c, Component::Normal(_))))
            .unwrap_or(true);
        if escapes {
            return Err(ConnectorError::InvalidPath(virtual_path.to_string()));
        }

        self.check_symlinks(&real, virtual_path)?;

        Ok(ConfinedPath {
            real,
            virtual_path: format!("/{}", segments.join("/")),
        })
    }

    /// Inverse of [`resolve`](Self::resolve): the virtual path of a real
    /// location inside the root.
    pub fn to_virtual(&self, real: &Path) -> Result<String, ConnectorError> {
        let rest = real
            .strip_prefix(&self.root)
            .map_err(|_| ConnectorError::InvalidPath(real.display().to_string()))?;

        let mut segments = Vec::new();
        for component in rest.components() {
            match component {
                Component::Normal(part) => segments.push(part.to_string_lossy().to_string()),
                Component::CurDir => {}
                _ => return Err(ConnectorError::InvalidPath(real.display().to_string())),
            }
        }
        Ok(format!("/{}", segments.join("/")))
    }

    /// Canonicalizes the deepest existing ancestor of `real` and makes sure
    /// it is still under the root.
    fn check_symlinks(&self, real: &Path, virtual_path: &str) -> Result<(), ConnectorError> {
        let mut probe = real;
        loop {
            match probe.canonicalize() {
                Ok(canonical) => {
                    if canonical.starts_with(&self.root) {
                        return Ok(());
                    }
                    return Err(ConnectorError::InvalidPath(virtual_path.to_string()));
                }
                Err(_) => match probe.parent() {
                    Some(parent) if parent.starts_with(&self.root) => probe = parent,
                    _ => return Ok(()),
                },
            }
        }
    }
}
