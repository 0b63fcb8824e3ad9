//! Variant keys: the index type of the per-variant dependency graphs.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::module::ModulePath;

/// Variant name used for modules that have no flavor/build-type matrix
/// (plain JVM-style modules collapse to a single graph per category).
pub const DEFAULT_VARIANT: &str = "default";

/// The configuration axis a variant graph belongs to.
///
/// Adding a category is a compile-time change: every match over this enum is
/// total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigurationCategory {
    /// Main compilation classpath.
    Build,
    /// Host-side unit test classpath.
    UnitTest,
    /// Device test classpath.
    AndroidTest,
    /// Lint checking classpath.
    Lint,
}

impl fmt::Display for ConfigurationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Build => "build",
            Self::UnitTest => "unit_test",
            Self::AndroidTest => "android_test",
            Self::Lint => "lint",
        };
        f.write_str(name)
    }
}

/// Identity of one (module, variant, category) graph partition.
///
/// Immutable value type; used as the key of the variant graph store.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VariantKey {
    /// The module this key was declared for.
    pub module: ModulePath,
    /// The variant name (flavor + build-type combination, e.g. `"paidDebug"`),
    /// or [`DEFAULT_VARIANT`] for single-variant modules.
    pub variant: String,
    /// The configuration axis.
    pub category: ConfigurationCategory,
}

impl VariantKey {
    /// Key for one named variant of a module under a category.
    pub fn new(module: &ModulePath, variant: &str, category: ConfigurationCategory) -> Self {
        Self {
            module: module.clone(),
            variant: variant.to_owned(),
            category,
        }
    }

    /// The collapsed single-variant key used for modules without a
    /// flavor/build-type matrix.
    pub fn default_for(module: &ModulePath, category: ConfigurationCategory) -> Self {
        Self::new(module, DEFAULT_VARIANT, category)
    }

    /// True when this key is the collapsed default-variant key.
    pub fn is_default(&self) -> bool {
        self.variant == DEFAULT_VARIANT
    }
}

impl fmt::Display for VariantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}/{}]", self.module, self.variant, self.category)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_key_uses_default_variant() {
        let m = ModulePath::new(":core");
        let key = VariantKey::default_for(&m, ConfigurationCategory::Build);
        assert!(key.is_default());
        assert_eq!(key.variant, DEFAULT_VARIANT);
    }

    #[test]
    fn named_key_is_not_default() {
        let m = ModulePath::new(":app");
        let key = VariantKey::new(&m, "paidDebug", ConfigurationCategory::Build);
        assert!(!key.is_default());
    }

    #[test]
    fn keys_are_comparable_values() {
        let m = ModulePath::new(":app");
        let a = VariantKey::new(&m, "freeDebug", ConfigurationCategory::Build);
        let b = VariantKey::new(&m, "freeDebug", ConfigurationCategory::Build);
        let c = VariantKey::new(&m, "freeDebug", ConfigurationCategory::UnitTest);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn display_includes_variant_and_category() {
        let m = ModulePath::new(":app");
        let key = VariantKey::new(&m, "paidRelease", ConfigurationCategory::Lint);
        assert_eq!(key.to_string(), ":app[paidRelease/lint]");
    }
}
