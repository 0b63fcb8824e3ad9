//! The two-phase variant compression algorithm.
//!
//! Phase 1 works build-type by build-type: variants of one build type whose
//! descriptions are equivalent collapse into a single target carrying the
//! build-type suffix. A build type is blocked from compressing when any
//! dependency's published result marks that build type expanded — dependents
//! would otherwise point at targets that do not exist.
//!
//! Phase 2 attempts the full collapse: when phase 1 left several unexpanded
//! build-type targets and every dependency is itself fully compressed, the
//! remaining representatives are compared once more; if they all match, the
//! module needs exactly one unsuffixed target.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use gravel_model::{ModuleBuildDescription, ModulePath};

use crate::equivalence::equivalent;
use crate::error::VariantError;
use crate::normalize::{kebab, Normalizer};
use crate::registry::CompressionStore;
use crate::result::CompressionResult;

/// Why a build type could not be compressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpansionReason {
    /// Two variants in the group differ structurally.
    VariantsDiffer { first: String, second: String },
    /// A dependency already expanded this build type, so compressing here
    /// would reference merged targets the dependency does not emit.
    DependencyExpanded {
        dependency: ModulePath,
        build_type: String,
    },
}

impl fmt::Display for ExpansionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VariantsDiffer { first, second } => {
                write!(f, "variants {first} and {second} differ")
            }
            Self::DependencyExpanded {
                dependency,
                build_type,
            } => write!(f, "dependency {dependency} is expanded for {build_type}"),
        }
    }
}

/// One per-group decision, recorded in pass order for observability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompressionDecision {
    /// The build type had exactly one variant; it keeps its own suffix and
    /// never blocks compression.
    SingleVariant { build_type: String, variant: String },
    /// All variants of the build type collapsed into one target.
    Compressed {
        build_type: String,
        representative: String,
        variants: Vec<String>,
    },
    /// The build type could not be compressed; each variant keeps its own
    /// target.
    Expanded {
        build_type: String,
        reason: ExpansionReason,
    },
    /// Phase 2 collapsed every build-type target into one unsuffixed target.
    FullyCompressed { representative: String },
}

impl fmt::Display for CompressionDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SingleVariant {
                build_type,
                variant,
            } => write!(f, "{build_type}: single variant {variant}"),
            Self::Compressed {
                build_type,
                representative,
                variants,
            } => write!(
                f,
                "{build_type}: compressed {} variant(s) into {representative}",
                variants.len()
            ),
            Self::Expanded { build_type, reason } => {
                write!(f, "{build_type}: expanded ({reason})")
            }
            Self::FullyCompressed { representative } => {
                write!(f, "fully compressed into {representative}")
            }
        }
    }
}

/// A validated compression result plus the ordered decision trail.
#[derive(Debug, Clone)]
pub struct CompressionOutcome {
    pub result: CompressionResult,
    pub decisions: Vec<CompressionDecision>,
}

/// Compress one module's variants.
///
/// `variants` maps variant name to its extracted description;
/// `build_type_of` maps a variant name to its declared build type;
/// `project_deps` are the module's project dependencies, whose results are
/// consulted (never recomputed) through `store`. A dependency without a
/// published result is treated as "not yet known / assume compressible" —
/// topological ordering makes that case theoretical, and it must not block.
///
/// # Errors
/// Returns [`VariantError::SuffixCollision`] when two distinct targets
/// kebab-case to the same suffix (a variant named `freeDebug` next to a
/// literal `free-debug`), and a [`VariantError`] from result construction
/// only if the assembled result violates the suffix/description invariant,
/// which would be a bug in this algorithm.
pub fn compress(
    variants: &BTreeMap<String, ModuleBuildDescription>,
    build_type_of: &dyn Fn(&str) -> String,
    project_deps: &[ModulePath],
    store: &CompressionStore,
    normalizer: &Normalizer,
) -> Result<CompressionOutcome, VariantError> {
    // Group variants by declared build type; BTreeMap keeps both the group
    // order and the member order deterministic.
    let mut groups: BTreeMap<String, Vec<(&str, &ModuleBuildDescription)>> = BTreeMap::new();
    for (variant, description) in variants {
        groups
            .entry(build_type_of(variant))
            .or_default()
            .push((variant, description));
    }

    let mut suffixes: BTreeSet<String> = BTreeSet::new();
    let mut suffix_owner: BTreeMap<String, String> = BTreeMap::new();
    let mut descriptions: BTreeMap<String, ModuleBuildDescription> = BTreeMap::new();
    let mut variant_suffix: BTreeMap<String, String> = BTreeMap::new();
    let mut expanded: BTreeSet<String> = BTreeSet::new();
    let mut decisions: Vec<CompressionDecision> = Vec::new();

    for (build_type, members) in &groups {
        let Some((first_variant, first_description)) = members.first() else {
            continue;
        };

        if members.len() == 1 {
            // A lone variant keeps its own suffix but never poisons
            // compression for its build type.
            let suffix = variant_suffix_of(first_variant);
            claim_suffix(&mut suffix_owner, &suffix, first_variant)?;
            suffixes.insert(suffix.clone());
            descriptions.insert(suffix.clone(), (*first_description).clone());
            variant_suffix.insert((*first_variant).to_owned(), suffix);
            decisions.push(CompressionDecision::SingleVariant {
                build_type: build_type.clone(),
                variant: (*first_variant).to_owned(),
            });
            continue;
        }

        let blocked = blocking_dependency(build_type, project_deps, store);
        let differing = members
            .iter()
            .skip(1)
            .find(|(_, description)| !equivalent(first_description, description, normalizer));

        let reason = match (blocked, differing) {
            (Some(dependency), _) => Some(ExpansionReason::DependencyExpanded {
                dependency,
                build_type: build_type.clone(),
            }),
            (None, Some((second_variant, _))) => Some(ExpansionReason::VariantsDiffer {
                first: (*first_variant).to_owned(),
                second: (*second_variant).to_owned(),
            }),
            (None, None) => None,
        };

        if let Some(reason) = reason {
            expanded.insert(build_type.clone());
            for (variant, description) in members {
                let suffix = variant_suffix_of(variant);
                claim_suffix(&mut suffix_owner, &suffix, variant)?;
                suffixes.insert(suffix.clone());
                descriptions.insert(suffix.clone(), (*description).clone());
                variant_suffix.insert((*variant).to_owned(), suffix);
            }
            decisions.push(CompressionDecision::Expanded {
                build_type: build_type.clone(),
                reason,
            });
        } else {
            let suffix = format!("-{}", kebab(build_type));
            claim_suffix(&mut suffix_owner, &suffix, build_type)?;
            suffixes.insert(suffix.clone());
            descriptions.insert(suffix.clone(), (*first_description).clone());
            for (variant, _) in members {
                variant_suffix.insert((*variant).to_owned(), suffix.clone());
            }
            decisions.push(CompressionDecision::Compressed {
                build_type: build_type.clone(),
                representative: (*first_variant).to_owned(),
                variants: members.iter().map(|(v, _)| (*v).to_owned()).collect(),
            });
        }
    }

    // Phase 2: collapse across build types.
    if should_attempt_full_compression(&suffixes, &expanded, project_deps, store) {
        let mut candidates = descriptions.values();
        if let Some(reference) = candidates.next() {
            let all_match =
                candidates.all(|description| equivalent(reference, description, normalizer));
            if all_match {
                let representative = variant_suffix
                    .keys()
                    .next()
                    .cloned()
                    .unwrap_or_default();
                let merged = reference.clone();
                suffixes = [String::new()].into_iter().collect();
                descriptions = [(String::new(), merged)].into_iter().collect();
                for suffix in variant_suffix.values_mut() {
                    suffix.clear();
                }
                decisions.push(CompressionDecision::FullyCompressed { representative });
            }
        }
    }

    let result = CompressionResult::new(suffixes, descriptions, variant_suffix, expanded)?;
    Ok(CompressionOutcome { result, decisions })
}

/// Find the first project dependency whose published result expands
/// `build_type`. A missing result is an open state and never blocks.
fn blocking_dependency(
    build_type: &str,
    project_deps: &[ModulePath],
    store: &CompressionStore,
) -> Option<ModulePath> {
    project_deps.iter().find_map(|dep| {
        store
            .get(dep)
            .filter(|result| result.is_expanded_for(build_type))
            .map(|_| dep.clone())
    })
}

/// Phase 2 preconditions: several build-type targets, none expanded, and
/// every dependency with a known result fully compressed.
fn should_attempt_full_compression(
    suffixes: &BTreeSet<String>,
    expanded: &BTreeSet<String>,
    project_deps: &[ModulePath],
    store: &CompressionStore,
) -> bool {
    suffixes.len() > 1
        && expanded.is_empty()
        && project_deps
            .iter()
            .all(|dep| store.get(dep).map_or(true, |result| result.is_fully_compressed()))
}

fn variant_suffix_of(variant: &str) -> String {
    format!("-{}", kebab(variant))
}

/// Record `owner` (a variant or build-type name) as the producer of
/// `suffix`. Each phase-1 target claims its suffix exactly once, so an
/// occupied slot means two distinct targets collide after kebab-casing and
/// the later description would silently shadow the earlier one.
fn claim_suffix(
    owners: &mut BTreeMap<String, String>,
    suffix: &str,
    owner: &str,
) -> Result<(), VariantError> {
    match owners.entry(suffix.to_owned()) {
        Entry::Vacant(slot) => {
            slot.insert(owner.to_owned());
            Ok(())
        }
        Entry::Occupied(slot) => Err(VariantError::SuffixCollision {
            suffix: suffix.to_owned(),
            first: slot.get().clone(),
            second: owner.to_owned(),
        }),
    }
}
