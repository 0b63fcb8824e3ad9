//! Single sequential pass: sort the project graph, compress each module in
//! order, publish each result before its dependents run.

use std::collections::BTreeMap;

use gravel_graph::store::VariantGraphStore;
use gravel_graph::topo::topo_sort;
use gravel_model::{ConfigurationCategory, ModuleBuildDescription, ModulePath};
use gravel_variants::compress::{compress, CompressionDecision};
use gravel_variants::normalize::Normalizer;
use gravel_variants::registry::CompressionStore;

use crate::error::EngineError;

/// One module's extracted variant data, handed in by the extraction
/// collaborator.
#[derive(Debug, Clone, Default)]
pub struct ModuleVariantInput {
    /// Variant name → extracted description.
    pub variants: BTreeMap<String, ModuleBuildDescription>,
    /// Variant name → declared build-type name. Variants missing here fall
    /// back to their own name as build type.
    pub build_types: BTreeMap<String, String>,
}

/// The outcome of one pass: the processing order plus the per-module
/// decision trails, in pass order.
#[derive(Debug)]
pub struct PassReport {
    /// Topological module order (dependencies first).
    pub order: Vec<ModulePath>,
    /// Per-module compression decisions, in the order modules were
    /// processed.
    pub decisions: Vec<(ModulePath, Vec<CompressionDecision>)>,
}

/// Run the compression pass over every module with extracted input.
///
/// The project graph is merged from the build-category variant graphs,
/// topologically sorted, and walked dependency-first; each module's result
/// is registered in `store` before any dependent is processed. Modules
/// without extracted input (pure dependency targets) are skipped.
///
/// # Errors
/// Returns [`EngineError::Graph`] when the project graph is cyclic — the
/// enclosing operation must abort rather than emit an ambiguous order —
/// and [`EngineError::Variant`] if a compression result violates its
/// structural invariant.
pub fn run_compression_pass(
    graphs: &VariantGraphStore,
    inputs: &BTreeMap<ModulePath, ModuleVariantInput>,
    store: &CompressionStore,
    normalizer: &Normalizer,
) -> Result<PassReport, EngineError> {
    let merged =
        graphs.merge_to_project_graph(|category| *category == ConfigurationCategory::Build);
    let order = topo_sort(&merged)?;

    let mut decisions: Vec<(ModulePath, Vec<CompressionDecision>)> = Vec::new();
    for module in &order {
        let Some(input) = inputs.get(module) else {
            continue;
        };
        let project_deps: Vec<ModulePath> = merged
            .get(module)
            .map(|deps| deps.iter().cloned().collect())
            .unwrap_or_default();
        let build_type_of = |variant: &str| -> String {
            input
                .build_types
                .get(variant)
                .cloned()
                .unwrap_or_else(|| variant.to_owned())
        };

        let outcome = compress(
            &input.variants,
            &build_type_of,
            &project_deps,
            store,
            normalizer,
        )?;
        store.register(module, outcome.result);
        decisions.push((module.clone(), outcome.decisions));
    }

    Ok(PassReport { order, decisions })
}
