//! Per-variant dependency graph store and project-level aggregation.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::sync::Arc;

use gravel_model::{ConfigurationCategory, ModulePath, VariantKey};

use crate::error::GraphError;

/// The flattened project-level successor map used only for ordering.
///
/// Maps each module to the set of modules it depends on, with all variant
/// information erased.
pub type ProjectGraph = BTreeMap<ModulePath, BTreeSet<ModulePath>>;

/// A directed dependency graph over module identities.
///
/// Edges run from a module to the modules it depends on and carry the
/// originating configuration bucket as a label (diagnostics only — the label
/// plays no part in graph semantics). Self-loops are rejected at insertion.
/// Acyclicity is not structurally enforced here; the topological sorter
/// detects and reports cycles.
///
/// Published graphs are immutable: the store hands out shared snapshots and
/// copies on write during construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    nodes: BTreeSet<ModulePath>,
    edges: BTreeMap<ModulePath, BTreeMap<ModulePath, String>>,
}

impl DependencyGraph {
    fn add_node(&mut self, module: &ModulePath) {
        self.nodes.insert(module.clone());
    }

    fn add_edge(
        &mut self,
        source: &ModulePath,
        target: &ModulePath,
        bucket: &str,
    ) -> Result<(), GraphError> {
        if source == target {
            return Err(GraphError::SelfLoop {
                module: source.clone(),
            });
        }
        self.nodes.insert(source.clone());
        self.nodes.insert(target.clone());
        self.edges
            .entry(source.clone())
            .or_default()
            .insert(target.clone(), bucket.to_owned());
        Ok(())
    }

    /// All nodes of the graph, in path order.
    pub fn nodes(&self) -> &BTreeSet<ModulePath> {
        &self.nodes
    }

    /// True when the module is a node of this graph.
    pub fn contains(&self, module: &ModulePath) -> bool {
        self.nodes.contains(module)
    }

    /// The modules `module` directly depends on, in path order.
    pub fn successors(&self, module: &ModulePath) -> impl Iterator<Item = &ModulePath> {
        self.edges.get(module).into_iter().flat_map(BTreeMap::keys)
    }

    /// The configuration bucket that declared the edge, if the edge exists.
    pub fn edge_label(&self, source: &ModulePath, target: &ModulePath) -> Option<&str> {
        self.edges
            .get(source)
            .and_then(|targets| targets.get(target))
            .map(String::as_str)
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(BTreeMap::len).sum()
    }

    /// True when the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// In-memory store of one [`DependencyGraph`] per [`VariantKey`].
///
/// Construction proceeds module-by-module, variant-by-variant; single-variant
/// (JVM-style) modules collapse into the category's default key instead of
/// being expanded per flavor. Queries never fail: an absent key behaves as an
/// empty graph.
#[derive(Debug, Default)]
pub struct VariantGraphStore {
    graphs: BTreeMap<VariantKey, Arc<DependencyGraph>>,
    empty: Arc<DependencyGraph>,
}

impl VariantGraphStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `module` as a node of the graph at `key`.
    pub fn add_node(&mut self, key: &VariantKey, module: &ModulePath) {
        let graph = self
            .graphs
            .entry(key.clone())
            .or_insert_with(|| Arc::new(DependencyGraph::default()));
        Arc::make_mut(graph).add_node(module);
    }

    /// Add an edge `source -> target` labeled with the originating
    /// configuration bucket to the graph at `key`.
    ///
    /// # Errors
    /// Returns [`GraphError::SelfLoop`] when `source == target`.
    pub fn put_edge(
        &mut self,
        key: &VariantKey,
        source: &ModulePath,
        target: &ModulePath,
        bucket: &str,
    ) -> Result<(), GraphError> {
        let graph = self
            .graphs
            .entry(key.clone())
            .or_insert_with(|| Arc::new(DependencyGraph::default()));
        Arc::make_mut(graph).add_edge(source, target, bucket)
    }

    /// Register one module's declared dependencies for one variant key:
    /// the module becomes a node, then one labeled edge is added per
    /// `(bucket, dependency)` pair.
    ///
    /// # Errors
    /// Returns [`GraphError::SelfLoop`] when a module declares itself as a
    /// dependency.
    pub fn add_declarations(
        &mut self,
        key: &VariantKey,
        module: &ModulePath,
        declarations: &[(String, ModulePath)],
    ) -> Result<(), GraphError> {
        self.add_node(key, module);
        for (bucket, target) in declarations {
            self.put_edge(key, module, target, bucket)?;
        }
        Ok(())
    }

    /// The published graph at `key`; absent keys yield a shared empty graph.
    pub fn graph_for(&self, key: &VariantKey) -> Arc<DependencyGraph> {
        self.graphs
            .get(key)
            .unwrap_or(&self.empty)
            .clone()
    }

    /// All keys that currently have a graph, in key order.
    pub fn keys(&self) -> impl Iterator<Item = &VariantKey> {
        self.graphs.keys()
    }

    /// Flatten every graph whose category passes `filter` into one plain
    /// successor map. The result is suitable only for ordering — variant
    /// accuracy is erased by the merge.
    pub fn merge_to_project_graph(
        &self,
        filter: impl Fn(&ConfigurationCategory) -> bool,
    ) -> ProjectGraph {
        let mut merged: ProjectGraph = BTreeMap::new();
        for (key, graph) in &self.graphs {
            if !filter(&key.category) {
                continue;
            }
            for node in graph.nodes() {
                let deps = merged.entry(node.clone()).or_default();
                deps.extend(graph.successors(node).cloned());
            }
        }
        merged
    }

    /// The modules `module` directly depends on under `key`.
    ///
    /// Falls back to the category's default key when no graph exists at the
    /// exact key (the collapsed single-variant case); a module absent from
    /// both graphs has no graph-relevant dependencies.
    pub fn direct_dependencies_by_variant(
        &self,
        module: &ModulePath,
        key: &VariantKey,
    ) -> BTreeSet<ModulePath> {
        self.lookup_graph(key)
            .successors(module)
            .cloned()
            .collect()
    }

    /// The subgraph of everything reachable from `module` under `key`,
    /// computed by breadth-first traversal over the unmerged graph.
    ///
    /// Returns an empty graph when the module is not a node of the variant's
    /// graph.
    pub fn dependencies_sub_graph_by_variant(
        &self,
        module: &ModulePath,
        key: &VariantKey,
    ) -> DependencyGraph {
        let graph = self.lookup_graph(key);
        let mut sub = DependencyGraph::default();
        if !graph.contains(module) {
            return sub;
        }

        let mut visited: BTreeSet<ModulePath> = BTreeSet::new();
        let mut queue: VecDeque<ModulePath> = VecDeque::new();
        visited.insert(module.clone());
        queue.push_back(module.clone());
        sub.add_node(module);

        while let Some(current) = queue.pop_front() {
            for target in graph.successors(&current) {
                let bucket = graph.edge_label(&current, target).unwrap_or("");
                // Self-loops cannot exist in the source graph.
                let _ = sub.add_edge(&current, target, bucket);
                if visited.insert(target.clone()) {
                    queue.push_back(target.clone());
                }
            }
        }
        sub
    }

    fn lookup_graph(&self, key: &VariantKey) -> &DependencyGraph {
        if let Some(graph) = self.graphs.get(key) {
            return graph;
        }
        let fallback = VariantKey::default_for(&key.module, key.category);
        self.graphs.get(&fallback).unwrap_or(&self.empty)
    }
}
