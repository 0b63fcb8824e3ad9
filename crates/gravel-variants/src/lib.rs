//! Variant normalization, equivalence checking, and variant compression.
//!
//! This crate decides how many distinct output targets each module needs:
//! variants that produce identical output modulo variant-specific naming are
//! merged ("compressed") into a single target. Compression decisions
//! propagate through the dependency graph, so the compressor must run over
//! modules in topological order (gravel-graph provides it).

pub mod compress;
pub mod equivalence;
pub mod error;
pub mod normalize;
pub mod registry;
pub mod result;

pub use compress::{compress, CompressionDecision, CompressionOutcome, ExpansionReason};
pub use equivalence::equivalent;
pub use error::VariantError;
pub use normalize::Normalizer;
pub use registry::CompressionStore;
pub use result::CompressionResult;
