//! Error types for gravel-maven.

/// Errors produced when loading the pre-resolved dependency snapshot.
#[derive(Debug, thiserror::Error)]
pub enum MavenError {
    /// The snapshot is not valid JSON or does not match the schema.
    #[error("invalid dependency snapshot: {source}")]
    SnapshotParse { source: serde_json::Error },
}
