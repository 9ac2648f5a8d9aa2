//! Header references and resolved dependencies.

use std::fmt;
use std::path::{Path, PathBuf};

/// A raw header name taken from an `%INCLUDE` directive.
///
/// The name is kept exactly as written in the source; it may be relative or
/// absolute.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HeaderReference {
    name: String,
}

impl HeaderReference {
    /// Create a reference from the token following `%INCLUDE`.
    pub fn new(name: impl Into<String>) -> Self {
        HeaderReference { name: name.into() }
    }

    /// The header name as written.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The header name as a path.
    pub fn as_path(&self) -> &Path {
        Path::new(&self.name)
    }

    /// Whether the reference is an absolute path.
    pub fn is_absolute(&self) -> bool {
        self.as_path().is_absolute()
    }
}

impl fmt::Display for HeaderReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl From<&str> for HeaderReference {
    fn from(name: &str) -> Self {
        HeaderReference::new(name)
    }
}

/// A header reference mapped to a location on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDependency {
    /// The reference this dependency was resolved from
    pub reference: HeaderReference,

    /// Where the header lives. For headers assumed to be generated this is
    /// the unresolved reference itself.
    pub path: PathBuf,

    /// Whether the header is on the system header list
    pub is_system: bool,

    /// Set when the header could not be found and was kept anyway
    pub assumed_generated: bool,
}

impl ResolvedDependency {
    /// A dependency found on disk.
    pub fn found(reference: HeaderReference, path: PathBuf, is_system: bool) -> Self {
        ResolvedDependency {
            reference,
            path,
            is_system,
            assumed_generated: false,
        }
    }

    /// A dependency that was not found but is assumed to be produced by the
    /// build before it is needed.
    pub fn assumed_generated(reference: HeaderReference, is_system: bool) -> Self {
        let path = reference.as_path().to_path_buf();
        ResolvedDependency {
            reference,
            path,
            is_system,
            assumed_generated: true,
        }
    }

    /// The dependency path as it appears in a Make rule.
    pub fn display_path(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}
