//! Variant settings handed in by the host plugin.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

fn default_bucket() -> String {
    "maven".to_owned()
}

/// The host-declared variant axes of the project.
///
/// The normalizer needs the known flavor and build-type names to strip
/// variant decoration from module target names, and the Maven store derives
/// per-variant bucket names from the default bucket declared here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariantSettings {
    /// Known product-flavor names (e.g. `"free"`, `"paid"`).
    #[serde(default)]
    pub flavors: BTreeSet<String>,
    /// Known build-type names (e.g. `"debug"`, `"release"`).
    pub build_types: BTreeSet<String>,
    /// Name of the universal default Maven bucket.
    #[serde(default = "default_bucket")]
    pub default_bucket: String,
}

impl VariantSettings {
    /// Settings with the given build types, no flavors, and the default
    /// bucket name.
    pub fn with_build_types(build_types: &[&str]) -> Self {
        Self {
            flavors: BTreeSet::new(),
            build_types: build_types.iter().map(|s| (*s).to_owned()).collect(),
            default_bucket: default_bucket(),
        }
    }

    /// Builder method to add flavor names.
    pub fn with_flavors(mut self, flavors: &[&str]) -> Self {
        self.flavors
            .extend(flavors.iter().map(|s| (*s).to_owned()));
        self
    }

    /// Parse settings from a TOML string (the host owns all file I/O).
    ///
    /// # Errors
    /// Returns an error if the string is not valid TOML, declares unknown
    /// fields, or contains an empty flavor/build-type/bucket name.
    pub fn from_toml_str(content: &str) -> Result<Self, ModelError> {
        let settings: Self =
            toml::from_str(content).map_err(|e| ModelError::SettingsParse { source: e })?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ModelError> {
        if self.default_bucket.is_empty() {
            return Err(ModelError::InvalidSettings {
                reason: "default_bucket must not be empty".to_owned(),
            });
        }
        if self.build_types.iter().any(String::is_empty) {
            return Err(ModelError::InvalidSettings {
                reason: "build type names must not be empty".to_owned(),
            });
        }
        if self.flavors.iter().any(String::is_empty) {
            return Err(ModelError::InvalidSettings {
                reason: "flavor names must not be empty".to_owned(),
            });
        }
        Ok(())
    }
}
