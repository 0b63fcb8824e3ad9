//! Extracted per-variant build descriptions.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::reference::DependencyReference;

/// A typed build-config field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum BuildConfigField {
    String(String),
    Boolean(bool),
    Int(i32),
    Long(i64),
}

/// The extracted, variant-specific description of one module variant.
///
/// Produced by the extraction collaborator outside this core and consumed
/// read-only by the equivalence checker and the compressor. The checker
/// compares a fixed subset of these fields; the fields listed under
/// "project-wide" below are deliberately excluded from comparison because
/// they do not vary between variants of one module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleBuildDescription {
    /// Source file globs/paths for this variant.
    pub sources: Vec<String>,
    /// Resource set directories, in overlay order.
    pub resource_sets: Vec<String>,
    /// Path to the manifest file, if the module has one.
    pub manifest_path: Option<PathBuf>,
    /// The package name declared for this variant.
    pub package_name: Option<String>,
    /// An explicit resource-package override, if declared.
    pub custom_package: Option<String>,
    /// Generated build-config fields, keyed by field name.
    pub build_config: BTreeMap<String, BuildConfigField>,
    /// Generated resource values, keyed by resource name.
    pub res_values: BTreeMap<String, String>,
    /// Declared dependencies of this variant.
    pub deps: Vec<DependencyReference>,

    // Project-wide fields: carried for emission, ignored by equivalence.
    /// Whether data binding is enabled.
    pub data_binding: bool,
    /// Whether Compose is enabled.
    pub compose: bool,
    /// Applied plugin identifiers.
    pub plugins: Vec<String>,
    /// Free-form tags attached by the host.
    pub tags: Vec<String>,
    /// Lint configuration blob, if any.
    pub lint_config: Option<String>,
}
