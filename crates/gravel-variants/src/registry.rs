//! Process-scoped registry of per-module compression results.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use gravel_model::ModulePath;

use crate::result::CompressionResult;

/// Caller-owned lookup of published [`CompressionResult`]s, keyed by module.
///
/// Populated once per module during the ordered compression pass and read
/// (never mutated) by every later module that depends on it. Results are
/// immutable, so concurrent readers share them via `Arc` without further
/// locking. Lifecycle is tied to one build operation: the owner clears the
/// store when the operation ends.
#[derive(Debug, Default)]
pub struct CompressionStore {
    results: RwLock<HashMap<ModulePath, Arc<CompressionResult>>>,
}

impl CompressionStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a module's result. Idempotent: the first registration wins,
    /// so a concurrent duplicate registration is a harmless no-op.
    pub fn register(&self, module: &ModulePath, result: CompressionResult) {
        let mut results = self
            .results
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        results
            .entry(module.clone())
            .or_insert_with(|| Arc::new(result));
    }

    /// The published result for a module, if it was computed already.
    ///
    /// Absence is a legal open state during the ordered pass (the compressor
    /// treats it as "assume compressible"), never an error.
    pub fn get(&self, module: &ModulePath) -> Option<Arc<CompressionResult>> {
        let results = self
            .results
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        results.get(module).cloned()
    }

    /// True when a result has been published for the module.
    pub fn contains(&self, module: &ModulePath) -> bool {
        let results = self
            .results
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        results.contains_key(module)
    }

    /// Number of published results.
    pub fn len(&self) -> usize {
        let results = self
            .results
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        results.len()
    }

    /// True when no results have been published.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every published result. Called at the end of the enclosing
    /// build operation; nothing persists across invocations.
    pub fn clear(&self) {
        let mut results = self
            .results
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        results.clear();
    }
}
