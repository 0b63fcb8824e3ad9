//! The per-module compression result.

use std::collections::{BTreeMap, BTreeSet};

use gravel_model::ModuleBuildDescription;

use crate::error::VariantError;

/// How one module's variants map onto emitted targets.
///
/// Immutable after construction; registered in the [`crate::CompressionStore`]
/// and read by every later module in topological order. The constructor
/// enforces the structural invariant that every referenced suffix has a
/// registered target description — a violation is a caller bug and is
/// rejected outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionResult {
    suffixes: BTreeSet<String>,
    descriptions: BTreeMap<String, ModuleBuildDescription>,
    variant_suffix: BTreeMap<String, String>,
    expanded_build_types: BTreeSet<String>,
}

impl CompressionResult {
    /// Validate and construct a result.
    ///
    /// # Errors
    /// Returns [`VariantError::SuffixNotRegistered`] when a variant maps to
    /// a suffix without a description, and [`VariantError::UndeclaredSuffix`]
    /// when the suffix set and the description keys disagree.
    pub fn new(
        suffixes: BTreeSet<String>,
        descriptions: BTreeMap<String, ModuleBuildDescription>,
        variant_suffix: BTreeMap<String, String>,
        expanded_build_types: BTreeSet<String>,
    ) -> Result<Self, VariantError> {
        for (variant, suffix) in &variant_suffix {
            if !descriptions.contains_key(suffix) {
                return Err(VariantError::SuffixNotRegistered {
                    variant: variant.clone(),
                    suffix: suffix.clone(),
                });
            }
        }
        for suffix in descriptions.keys() {
            if !suffixes.contains(suffix) {
                return Err(VariantError::UndeclaredSuffix {
                    suffix: suffix.clone(),
                });
            }
        }
        for suffix in &suffixes {
            if !descriptions.contains_key(suffix) {
                return Err(VariantError::UndeclaredSuffix {
                    suffix: suffix.clone(),
                });
            }
        }
        Ok(Self {
            suffixes,
            descriptions,
            variant_suffix,
            expanded_build_types,
        })
    }

    /// The target suffixes this module emits, one per output target. The
    /// empty string means "no suffix" (fully merged).
    pub fn suffixes(&self) -> &BTreeSet<String> {
        &self.suffixes
    }

    /// Number of output targets this module needs.
    pub fn target_count(&self) -> usize {
        self.suffixes.len()
    }

    /// The representative description emitted for a suffix.
    ///
    /// # Errors
    /// Returns [`VariantError::UnknownSuffix`] for a suffix that was never
    /// registered (a caller precondition violation).
    pub fn description_for(&self, suffix: &str) -> Result<&ModuleBuildDescription, VariantError> {
        self.descriptions
            .get(suffix)
            .ok_or_else(|| VariantError::UnknownSuffix {
                suffix: suffix.to_owned(),
            })
    }

    /// The suffix a variant was mapped to.
    ///
    /// # Errors
    /// Returns [`VariantError::UnknownVariant`] for a variant that was never
    /// registered (a caller precondition violation).
    pub fn suffix_for_variant(&self, variant: &str) -> Result<&str, VariantError> {
        self.variant_suffix
            .get(variant)
            .map(String::as_str)
            .ok_or_else(|| VariantError::UnknownVariant {
                variant: variant.to_owned(),
            })
    }

    /// Variant names known to this result, in name order.
    pub fn variants(&self) -> impl Iterator<Item = &str> {
        self.variant_suffix.keys().map(String::as_str)
    }

    /// Build types whose variants could not be compressed.
    pub fn expanded_build_types(&self) -> &BTreeSet<String> {
        &self.expanded_build_types
    }

    /// True when `build_type` was marked non-compressible. Dependents
    /// consult this to propagate expansion through the graph.
    pub fn is_expanded_for(&self, build_type: &str) -> bool {
        self.expanded_build_types.contains(build_type)
    }

    /// True when every variant collapsed into the single unsuffixed target.
    pub fn is_fully_compressed(&self) -> bool {
        self.suffixes.len() == 1 && self.suffixes.contains("")
    }
}
