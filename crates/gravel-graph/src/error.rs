//! Error types for gravel-graph.

use std::collections::BTreeSet;

use gravel_model::ModulePath;

fn render_path(cycle: &[ModulePath]) -> String {
    cycle
        .iter()
        .map(ModulePath::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Errors produced by graph construction and ordering.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// A module was declared to depend on itself.
    #[error("module {module} declares a dependency on itself")]
    SelfLoop { module: ModulePath },

    /// The merged project graph contains a dependency cycle, so no safe
    /// processing order exists. Fatal: the enclosing operation must abort.
    #[error(
        "dependency cycle detected: {} ({} module(s) left unprocessed)",
        render_path(.cycle),
        .unprocessed.len()
    )]
    DependencyCycle {
        /// A closed cycle path: first and last element are the same module
        /// and every consecutive pair is an edge of the input graph.
        cycle: Vec<ModulePath>,
        /// All modules the sorter could not place. Some of these are merely
        /// blocked behind the cycle rather than part of it.
        unprocessed: BTreeSet<ModulePath>,
    },
}
