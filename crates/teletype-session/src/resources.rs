//! Named text resources the operator can print by typing their name.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use tracing::debug;

/// Looks up a resource by name.
///
/// Names arrive trimmed and lower-cased. Any failure is reported as `None`;
/// the session treats a miss as a normal outcome.
pub trait ResourceLookup {
    fn lookup(&self, name: &str) -> Option<Bytes>;
}

impl<T: ResourceLookup + ?Sized> ResourceLookup for Box<T> {
    fn lookup(&self, name: &str) -> Option<Bytes> {
        (**self).lookup(name)
    }
}

/// A lookup that never finds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoResources;

impl ResourceLookup for NoResources {
    fn lookup(&self, _name: &str) -> Option<Bytes> {
        None
    }
}

/// Resources stored as `<root>/<name>.<extension>` files.
#[derive(Debug, Clone)]
pub struct DirectoryResources {
    root: PathBuf,
    extension: String,
}

impl DirectoryResources {
    /// Default file extension for resources.
    pub const DEFAULT_EXTENSION: &'static str = "txt";

    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_extension(root, Self::DEFAULT_EXTENSION)
    }

    pub fn with_extension(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File a name maps to, or `None` if the name could leave the root.
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        if name.is_empty()
            || name.contains(['/', '\\', '\0'])
            || name.contains("..")
        {
            return None;
        }
        Some(self.root.join(format!("{name}.{}", self.extension)))
    }
}

impl ResourceLookup for DirectoryResources {
    fn lookup(&self, name: &str) -> Option<Bytes> {
        let Some(path) = self.resolve(name) else {
            debug!(name, "resource name rejected");
            return None;
        };
        debug!(?path, "opening resource");
        match std::fs::read(&path) {
            Ok(content) => {
                debug!(?path, size = content.len(), "resource loaded");
                Some(Bytes::from(content))
            }
            Err(err) => {
                debug!(?path, error = %err, "resource not available");
                None
            }
        }
    }
}
