//! Error types for gravel-engine.

/// Errors produced by the compression pass.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A graph operation failed (cycle detected, self-loop).
    #[error("{0}")]
    Graph(#[from] gravel_graph::GraphError),

    /// A compression-result invariant was violated.
    #[error("{0}")]
    Variant(#[from] gravel_variants::VariantError),
}
