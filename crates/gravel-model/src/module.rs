//! Path-based module identity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of one buildable module (one build-graph node).
///
/// A module is identified purely by its project path (e.g. `":features:home"`).
/// Equality, ordering, and hashing are all path-based, which keeps graph
/// algorithms operating on plain comparable values instead of object handles.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModulePath(String);

impl ModulePath {
    /// Create a module identity from its project path.
    pub fn new(path: &str) -> Self {
        Self(path.to_owned())
    }

    /// The full project path, e.g. `":features:home"`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The leaf name of the module: the last `:`/`/`-separated segment.
    ///
    /// `":features:home"` → `"home"`. A path without separators is its own
    /// leaf name.
    pub fn name(&self) -> &str {
        self.0.rsplit([':', '/']).next().unwrap_or(&self.0)
    }
}

impl fmt::Display for ModulePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModulePath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}
