//! The coordinate-to-bucket resolution store.

use std::collections::HashMap;
use std::sync::{OnceLock, RwLock};

use gravel_model::{VariantSettings, DEFAULT_VARIANT};

use crate::snapshot::DependencySnapshot;

/// A resolved repository bucket for one coordinate.
///
/// `fallback` is true when the coordinate was not found in any candidate
/// bucket and the reference degrades to the universal default bucket. That
/// is not an error: the coordinate may legitimately live in the default
/// bucket without having been discovered by the variant-specific pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketRef {
    /// Name of the bucket that will serve the coordinate.
    pub bucket: String,
    /// True when this is the synthesized default-bucket reference.
    pub fallback: bool,
}

type CoordinateKey = (String, String, String);

/// Process-scoped index from (bucket, group, artifact) to the bucket that
/// supplies the coordinate.
///
/// Populated exactly once from the pre-resolved snapshot; population is
/// idempotent and guarded against concurrent first access, so redundant
/// calls are no-ops. Queries never fail — an unknown coordinate degrades to
/// the default-bucket reference. Query results are memoized per candidate
/// chain (the transitive-closure cache).
#[derive(Debug)]
pub struct MavenResolutionStore {
    default_bucket: String,
    index: OnceLock<HashMap<CoordinateKey, String>>,
    cache: RwLock<HashMap<CoordinateKey, BucketRef>>,
}

impl MavenResolutionStore {
    /// An unpopulated store for the project's default bucket.
    pub fn new(settings: &VariantSettings) -> Self {
        Self {
            default_bucket: settings.default_bucket.clone(),
            index: OnceLock::new(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// The bucket name serving a variant's external dependencies:
    /// `paidDebug` → `"paid_debug_maven"`; the default variant (or an empty
    /// name) maps to the default bucket itself.
    pub fn bucket_name_for(&self, variant: &str) -> String {
        if variant.is_empty() || variant == DEFAULT_VARIANT {
            return self.default_bucket.clone();
        }
        format!("{}_{}", snake(variant), self.default_bucket)
    }

    /// Build the coordinate index from the snapshot. Idempotent: only the
    /// first call populates; concurrent and repeated calls are no-ops.
    pub fn populate(&self, snapshot: &DependencySnapshot) {
        self.index.get_or_init(|| {
            let mut index: HashMap<CoordinateKey, String> = HashMap::new();
            for (variant, artifacts) in &snapshot.variants {
                let variant_bucket = self.bucket_name_for(variant);
                for artifact in artifacts {
                    let supplier = if artifact.repository.is_empty() {
                        variant_bucket.clone()
                    } else {
                        artifact.repository.clone()
                    };
                    let key = (
                        variant_bucket.clone(),
                        artifact.group.clone(),
                        artifact.name.clone(),
                    );
                    index.entry(key).or_insert(supplier);
                }
            }
            index
        });
    }

    /// True once [`Self::populate`] has run.
    pub fn is_populated(&self) -> bool {
        self.index.get().is_some()
    }

    /// Resolve a coordinate against an ordered candidate-variant list, most
    /// specific first.
    ///
    /// Each candidate's bucket is probed in order; the first hit wins. A
    /// miss on every candidate probes the universal default bucket, and an
    /// absent coordinate degrades to the synthesized fallback reference
    /// rather than failing.
    pub fn resolve(&self, candidates: &[String], group: &str, artifact: &str) -> BucketRef {
        let cache_key = (candidates.join("|"), group.to_owned(), artifact.to_owned());
        if let Ok(cache) = self.cache.read() {
            if let Some(hit) = cache.get(&cache_key) {
                return hit.clone();
            }
        }

        let resolved = self.probe(candidates, group, artifact);

        let mut cache = self
            .cache
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        cache.entry(cache_key).or_insert_with(|| resolved.clone());
        resolved
    }

    fn probe(&self, candidates: &[String], group: &str, artifact: &str) -> BucketRef {
        let empty = HashMap::new();
        let index = self.index.get().unwrap_or(&empty);

        for candidate in candidates {
            let bucket = self.bucket_name_for(candidate);
            let key = (bucket, group.to_owned(), artifact.to_owned());
            if let Some(supplier) = index.get(&key) {
                return BucketRef {
                    bucket: supplier.clone(),
                    fallback: false,
                };
            }
        }

        let default_key = (
            self.default_bucket.clone(),
            group.to_owned(),
            artifact.to_owned(),
        );
        if let Some(supplier) = index.get(&default_key) {
            return BucketRef {
                bucket: supplier.clone(),
                fallback: false,
            };
        }

        BucketRef {
            bucket: self.default_bucket.clone(),
            fallback: true,
        }
    }
}

/// Lower-case a camelCase name with `_` separators: `paidDebug` → `paid_debug`.
fn snake(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn settings() -> VariantSettings {
        VariantSettings::with_build_types(&["debug", "release"]).with_flavors(&["v1", "v2"])
    }

    fn snapshot() -> DependencySnapshot {
        DependencySnapshot::from_json_str(
            r#"{
                "v2": [
                    {"group": "com.example", "name": "lib", "version": "1.0.0"}
                ],
                "default": [
                    {"group": "org.shared", "name": "base", "version": "2.0.0"}
                ],
                "paidDebug": [
                    {
                        "group": "com.example",
                        "name": "mirrored",
                        "version": "3.0.0",
                        "repository": "internal_maven"
                    }
                ]
            }"#,
        )
        .unwrap()
    }

    fn populated_store() -> MavenResolutionStore {
        let store = MavenResolutionStore::new(&settings());
        store.populate(&snapshot());
        store
    }

    #[test]
    fn bucket_names_derive_from_variant() {
        let store = MavenResolutionStore::new(&settings());
        assert_eq!(store.bucket_name_for("paidDebug"), "paid_debug_maven");
        assert_eq!(store.bucket_name_for("v2"), "v2_maven");
        assert_eq!(store.bucket_name_for("default"), "maven");
        assert_eq!(store.bucket_name_for(""), "maven");
    }

    #[test]
    fn first_candidate_hit_wins() {
        let store = populated_store();
        let candidates = vec!["v2".to_owned(), "v1".to_owned()];
        let bucket = store.resolve(&candidates, "com.example", "lib");
        assert_eq!(bucket.bucket, "v2_maven");
        assert!(!bucket.fallback);
    }

    #[test]
    fn candidate_order_is_priority_order() {
        let store = populated_store();
        // v1 first: no hit there, v2 still found second.
        let candidates = vec!["v1".to_owned(), "v2".to_owned()];
        let bucket = store.resolve(&candidates, "com.example", "lib");
        assert_eq!(bucket.bucket, "v2_maven");
    }

    #[test]
    fn default_bucket_is_probed_after_candidates() {
        let store = populated_store();
        let candidates = vec!["v1".to_owned()];
        let bucket = store.resolve(&candidates, "org.shared", "base");
        assert_eq!(bucket.bucket, "maven");
        assert!(!bucket.fallback);
    }

    #[test]
    fn unknown_coordinate_degrades_to_fallback() {
        let store = populated_store();
        let bucket = store.resolve(&[], "com.unknown", "ghost");
        assert_eq!(bucket.bucket, "maven");
        assert!(bucket.fallback);
    }

    #[test]
    fn declared_repository_overrides_variant_bucket() {
        let store = populated_store();
        let candidates = vec!["paidDebug".to_owned()];
        let bucket = store.resolve(&candidates, "com.example", "mirrored");
        assert_eq!(bucket.bucket, "internal_maven");
        assert!(!bucket.fallback);
    }

    #[test]
    fn populate_is_idempotent() {
        let store = populated_store();
        // A second snapshot must not overwrite the first population.
        let other = DependencySnapshot::from_json_str(
            r#"{"v1": [{"group": "com.example", "name": "lib", "version": "9"}]}"#,
        )
        .unwrap();
        store.populate(&other);

        // v1 was only in the second snapshot, so it must still miss.
        let miss = store.resolve(&["v1".to_owned()], "com.example", "lib");
        assert!(miss.fallback);
        // The first population is intact.
        let hit = store.resolve(&["v2".to_owned()], "com.example", "lib");
        assert_eq!(hit.bucket, "v2_maven");
    }

    #[test]
    fn unpopulated_store_always_falls_back() {
        let store = MavenResolutionStore::new(&settings());
        assert!(!store.is_populated());
        let bucket = store.resolve(&["v2".to_owned()], "com.example", "lib");
        assert!(bucket.fallback);
    }

    #[test]
    fn repeated_queries_are_cached_and_stable() {
        let store = populated_store();
        let candidates = vec!["v2".to_owned(), "v1".to_owned()];
        let first = store.resolve(&candidates, "com.example", "lib");
        let second = store.resolve(&candidates, "com.example", "lib");
        assert_eq!(first, second);
    }
}
