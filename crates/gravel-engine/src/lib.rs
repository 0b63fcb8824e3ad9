//! The ordered compression pass for one build operation.
//!
//! Ties the variant graph store, the topological sorter, and the variant
//! compressor together: modules are processed dependency-first so that every
//! module's compression decision can consult the already-published results
//! of its dependencies. The pass is single-threaded by design — the order is
//! a correctness precondition, not an optimization.

pub mod error;
pub mod pass;

pub use error::EngineError;
pub use pass::{run_compression_pass, ModuleVariantInput, PassReport};
