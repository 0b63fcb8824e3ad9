//! Maven coordinate resolution: mapping external coordinates to the mirrored
//! repository bucket that serves them for a given variant hierarchy.

pub mod error;
pub mod snapshot;
pub mod store;

pub use error::MavenError;
pub use snapshot::{DependencySnapshot, ExcludeRule, ResolvedArtifact};
pub use store::{BucketRef, MavenResolutionStore};
