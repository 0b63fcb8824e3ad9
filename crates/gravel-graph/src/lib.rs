//! Per-variant dependency graphs, project-level aggregation, and the
//! topological module ordering for gravel.

pub mod error;
pub mod store;
pub mod topo;

pub use error::GraphError;
pub use store::{DependencyGraph, ProjectGraph, VariantGraphStore};
pub use topo::topo_sort;
