//! Canonicalization of dependency references for equality comparison.
//!
//! Two variants of a module usually differ in how their dependency targets
//! are *named* (variant-decorated target names, per-variant Maven buckets)
//! even when they depend on the same things. The normalizer strips that
//! decoration so the equivalence checker can compare dependency lists by
//! value. Normalized strings are identities for comparison only — they are
//! never emitted as actual build references.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use gravel_model::{DependencyReference, VariantSettings};

/// Prefix markers attached to derived targets (test/lint wrappers).
const PREFIX_MARKERS: &[&str] = &["test-", "android-test-", "lint-"];

/// Suffix markers attached by target-type rules, stripped before variant
/// suffixes so `-kt-free-debug` collapses in one pass.
const TYPE_MARKERS: &[&str] = &["-kt"];

/// Strips variant-specific decoration from dependency references.
///
/// Construction precomputes the strippable suffix set from the project's
/// declared flavor and build-type names. Results are memoized; the cache is
/// interior-mutable so a shared normalizer can serve concurrent readers.
#[derive(Debug)]
pub struct Normalizer {
    suffixes: Vec<String>,
    project_root: PathBuf,
    cache: RwLock<HashMap<DependencyReference, String>>,
}

impl Normalizer {
    /// Build a normalizer for the project's variant axes.
    ///
    /// `project_root` anchors relativization of file references.
    pub fn new(settings: &VariantSettings, project_root: &Path) -> Self {
        // Longest suffixes first so `-free-debug` wins over `-debug`.
        let mut suffixes: Vec<String> = Vec::new();
        for flavor in &settings.flavors {
            for build_type in &settings.build_types {
                suffixes.push(format!("-{}-{}", kebab(flavor), kebab(build_type)));
            }
        }
        for build_type in &settings.build_types {
            suffixes.push(format!("-{}", kebab(build_type)));
        }
        suffixes.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        Self {
            suffixes,
            project_root: project_root.to_path_buf(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Canonicalize a dependency reference to its variant-agnostic identity
    /// string. Total over all reference shapes; idempotent.
    pub fn normalize(&self, reference: &DependencyReference) -> String {
        if let Ok(cache) = self.cache.read() {
            if let Some(hit) = cache.get(reference) {
                return hit.clone();
            }
        }

        let normalized = self.compute(reference);

        let mut cache = self
            .cache
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        cache
            .entry(reference.clone())
            .or_insert_with(|| normalized.clone());
        normalized
    }

    fn compute(&self, reference: &DependencyReference) -> String {
        match reference {
            DependencyReference::Module { path, name } => {
                format!("{}:{}", path.as_str(), self.strip_target_name(name))
            }
            DependencyReference::Maven {
                group,
                artifact,
                bucket,
            } => format!("@{bucket}//:{}_{}", underscore(group), underscore(artifact)),
            DependencyReference::Raw(value) => value.trim().to_owned(),
            DependencyReference::File(path) => {
                let relative = path.strip_prefix(&self.project_root).unwrap_or(path);
                let file = relative
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let dir = relative
                    .parent()
                    .and_then(Path::file_name)
                    .map(|name| name.to_string_lossy().into_owned());
                match dir {
                    Some(dir) if !dir.is_empty() => format!("{dir}/{file}"),
                    _ => file,
                }
            }
        }
    }

    /// Strip prefix markers, type markers, and variant suffixes from a
    /// module target name, repeating until the name is stable so the result
    /// is a fixpoint (normalizing twice changes nothing).
    fn strip_target_name(&self, name: &str) -> String {
        let mut current = name.to_owned();
        loop {
            let mut next = current.clone();
            for prefix in PREFIX_MARKERS {
                if let Some(stripped) = next.strip_prefix(prefix) {
                    next = stripped.to_owned();
                }
            }
            for suffix in &self.suffixes {
                if let Some(stripped) = next.strip_suffix(suffix.as_str()) {
                    if !stripped.is_empty() {
                        next = stripped.to_owned();
                    }
                }
            }
            for marker in TYPE_MARKERS {
                if let Some(stripped) = next.strip_suffix(marker) {
                    if !stripped.is_empty() {
                        next = stripped.to_owned();
                    }
                }
            }
            if next == current {
                return next;
            }
            current = next;
        }
    }
}

/// Lower-case a camelCase name with `-` separators: `freeDebug` → `free-debug`.
pub(crate) fn kebab(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            if !out.is_empty() && !out.ends_with('-') {
                out.push('-');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn underscore(name: &str) -> String {
    name.replace(['.', '-'], "_")
}


#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod proptests {
    use proptest::prelude::proptest;

    use gravel_model::{DependencyReference, VariantSettings};

    use super::Normalizer;

    proptest! {
        /// Raw references normalize idempotently for arbitrary strings.
        #[test]
        fn raw_normalization_is_idempotent(value in ".{0,64}") {
            let settings = VariantSettings::with_build_types(&["debug", "release"]);
            let n = Normalizer::new(&settings, std::path::Path::new("/root"));
            let once = n.normalize(&DependencyReference::Raw(value));
            let twice = n.normalize(&DependencyReference::Raw(once.clone()));
            assert_eq!(once, twice);
        }

        /// Module names built from a clean stem plus any known variant
        /// suffix all collapse to the stem.
        #[test]
        fn variant_suffixes_collapse_to_stem(
            stem in "[a-z][a-z0-9]{0,12}",
            flavor in proptest::option::of(proptest::sample::select(vec!["free", "paid"])),
            build_type in proptest::sample::select(vec!["debug", "release"]),
        ) {
            let settings = VariantSettings::with_build_types(&["debug", "release"])
                .with_flavors(&["free", "paid"]);
            let n = Normalizer::new(&settings, std::path::Path::new("/root"));

            let decorated = match flavor {
                Some(flavor) => format!("{stem}-{flavor}-{build_type}"),
                None => format!("{stem}-{build_type}"),
            };
            let path = gravel_model::ModulePath::new(":m");
            let reference = DependencyReference::Module { path: path.clone(), name: decorated };
            let clean = DependencyReference::Module { path, name: stem.clone() };
            assert_eq!(n.normalize(&reference), n.normalize(&clean));
        }
    }
}
