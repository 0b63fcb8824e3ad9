//! The pre-resolved external-dependency snapshot.
//!
//! A separate resolution step (out of scope here) resolves every variant's
//! external dependencies against the mirrored repositories and serializes
//! the outcome. This core only deserializes that snapshot and feeds it to
//! the [`crate::MavenResolutionStore`] — no network or repository access
//! happens here.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::MavenError;

/// A coordinate exclusion declared on a resolved artifact.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExcludeRule {
    /// Group to exclude.
    pub group: String,
    /// Artifact to exclude, `"*"` for all artifacts of the group.
    pub artifact: String,
}

/// One resolved external coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolvedArtifact {
    /// Maven group identifier, e.g. `"com.squareup.okhttp3"`.
    pub group: String,
    /// Maven artifact identifier, e.g. `"okhttp"`.
    pub name: String,
    /// Resolved version.
    pub version: String,
    /// True when declared directly (not only pulled in transitively).
    #[serde(default)]
    pub direct: bool,
    /// Repository bucket the artifact was resolved from; empty means the
    /// variant's own bucket supplies it.
    #[serde(default)]
    pub repository: String,
    /// Exclusions declared on this dependency.
    #[serde(default)]
    pub exclude_rules: Vec<ExcludeRule>,
}

/// The serialized snapshot: variant name → resolved external coordinates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct DependencySnapshot {
    pub variants: BTreeMap<String, Vec<ResolvedArtifact>>,
}

impl DependencySnapshot {
    /// Parse a snapshot from its JSON serialization (the host owns all file
    /// I/O).
    ///
    /// # Errors
    /// Returns an error when the string is not valid JSON or does not match
    /// the snapshot schema.
    pub fn from_json_str(content: &str) -> Result<Self, MavenError> {
        serde_json::from_str(content).map_err(|e| MavenError::SnapshotParse { source: e })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal_snapshot() {
        let json = r#"{
            "freeDebug": [
                {"group": "com.squareup.okhttp3", "name": "okhttp", "version": "4.12.0"}
            ]
        }"#;
        let snapshot = DependencySnapshot::from_json_str(json).unwrap();
        let artifacts = snapshot.variants.get("freeDebug").unwrap();
        let artifact = artifacts.first().unwrap();
        assert_eq!(artifact.group, "com.squareup.okhttp3");
        assert!(!artifact.direct);
        assert!(artifact.repository.is_empty());
        assert!(artifact.exclude_rules.is_empty());
    }

    #[test]
    fn parse_full_artifact() {
        let json = r#"{
            "paidRelease": [
                {
                    "group": "com.example",
                    "name": "lib",
                    "version": "1.2.3",
                    "direct": true,
                    "repository": "internal_maven",
                    "exclude_rules": [{"group": "org.slow", "artifact": "*"}]
                }
            ]
        }"#;
        let snapshot = DependencySnapshot::from_json_str(json).unwrap();
        let artifact = snapshot
            .variants
            .get("paidRelease")
            .unwrap()
            .first()
            .unwrap();
        assert!(artifact.direct);
        assert_eq!(artifact.repository, "internal_maven");
        assert_eq!(
            artifact.exclude_rules.first().unwrap(),
            &ExcludeRule {
                group: "org.slow".to_owned(),
                artifact: "*".to_owned()
            }
        );
    }

    #[test]
    fn invalid_json_is_reported() {
        let result = DependencySnapshot::from_json_str("not json");
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("invalid dependency snapshot"), "error was: {err}");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let json = r#"{"v": [{"group": "g", "name": "n", "version": "1", "surprise": 1}]}"#;
        assert!(DependencySnapshot::from_json_str(json).is_err());
    }
}
