//! Dependency reference shapes.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::module::ModulePath;

/// One declared dependency of a module variant.
///
/// A closed sum over the four reference shapes the build graph knows about.
/// The normalizer matches totally over this type, so adding a fifth shape is
/// a compile-time exhaustiveness error there rather than a runtime type test.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum DependencyReference {
    /// A project-internal module dependency. `name` is the (possibly
    /// variant-decorated) target name within the module.
    Module { path: ModulePath, name: String },
    /// An external Maven coordinate served from a named repository bucket.
    Maven {
        group: String,
        artifact: String,
        bucket: String,
    },
    /// An opaque, pre-rendered reference string passed through untouched.
    Raw(String),
    /// A file on disk (e.g. a local jar).
    File(PathBuf),
}

impl DependencyReference {
    /// Convenience constructor for a module reference whose target name is
    /// the module's own leaf name.
    pub fn module(path: &ModulePath) -> Self {
        Self::Module {
            path: path.clone(),
            name: path.name().to_owned(),
        }
    }

    /// Convenience constructor for a Maven reference.
    pub fn maven(group: &str, artifact: &str, bucket: &str) -> Self {
        Self::Maven {
            group: group.to_owned(),
            artifact: artifact.to_owned(),
            bucket: bucket.to_owned(),
        }
    }
}
