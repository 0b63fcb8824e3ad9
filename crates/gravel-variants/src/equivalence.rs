//! Variant equivalence: do two variants produce identical output?

use gravel_model::ModuleBuildDescription;

use crate::normalize::Normalizer;

/// Decide whether two variant descriptions of one module are behaviorally
/// identical modulo variant-specific naming.
///
/// Compared: source lists, resource sets, manifest path, package name,
/// custom package, build-config data, generated resource values, and the
/// dependency lists as multisets of normalized reference strings.
///
/// Deliberately ignored (project-wide, not variant-distinguishing):
/// data binding, Compose, plugins, tags, and lint configuration.
pub fn equivalent(
    a: &ModuleBuildDescription,
    b: &ModuleBuildDescription,
    normalizer: &Normalizer,
) -> bool {
    a.sources == b.sources
        && a.resource_sets == b.resource_sets
        && a.manifest_path == b.manifest_path
        && a.package_name == b.package_name
        && a.custom_package == b.custom_package
        && a.build_config == b.build_config
        && a.res_values == b.res_values
        && deps_equivalent(a, b, normalizer)
}

fn deps_equivalent(
    a: &ModuleBuildDescription,
    b: &ModuleBuildDescription,
    normalizer: &Normalizer,
) -> bool {
    if a.deps.len() != b.deps.len() {
        return false;
    }
    normalized_deps(a, normalizer) == normalized_deps(b, normalizer)
}

/// The variant's dependency list as sorted normalized identity strings.
pub(crate) fn normalized_deps(
    description: &ModuleBuildDescription,
    normalizer: &Normalizer,
) -> Vec<String> {
    let mut normalized: Vec<String> = description
        .deps
        .iter()
        .map(|dep| normalizer.normalize(dep))
        .collect();
    normalized.sort();
    normalized
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::Path;

    use gravel_model::{
        BuildConfigField, DependencyReference, ModulePath, VariantSettings,
    };

    use super::*;

    fn normalizer() -> Normalizer {
        let settings = VariantSettings::with_build_types(&["debug", "release"])
            .with_flavors(&["free", "paid"]);
        Normalizer::new(&settings, Path::new("/project"))
    }

    fn description() -> ModuleBuildDescription {
        ModuleBuildDescription {
            sources: vec!["src/main/java/**".to_owned()],
            package_name: Some("com.example.app".to_owned()),
            deps: vec![DependencyReference::module(&ModulePath::new(":core"))],
            ..ModuleBuildDescription::default()
        }
    }

    #[test]
    fn equivalence_is_reflexive() {
        let n = normalizer();
        let d = description();
        assert!(equivalent(&d, &d, &n));
    }

    #[test]
    fn equivalence_is_symmetric() {
        let n = normalizer();
        let a = description();
        let mut b = description();
        b.sources.push("src/extra/**".to_owned());
        assert_eq!(equivalent(&a, &b, &n), equivalent(&b, &a, &n));
        let c = description();
        assert_eq!(equivalent(&a, &c, &n), equivalent(&c, &a, &n));
    }

    #[test]
    fn build_config_differences_break_equivalence() {
        let n = normalizer();
        let a = description();
        let mut b = description();
        b.build_config
            .insert("FLAG".to_owned(), BuildConfigField::Boolean(true));
        assert!(!equivalent(&a, &b, &n));
    }

    #[test]
    fn project_wide_fields_are_ignored() {
        let n = normalizer();
        let a = description();
        let mut b = description();
        b.data_binding = true;
        b.compose = true;
        b.plugins.push("kotlin-android".to_owned());
        b.tags.push("manual".to_owned());
        b.lint_config = Some("lint.xml".to_owned());
        assert!(equivalent(&a, &b, &n));
    }

    #[test]
    fn variant_decorated_deps_compare_equal() {
        let n = normalizer();
        let mut a = description();
        let mut b = description();
        a.deps = vec![DependencyReference::Module {
            path: ModulePath::new(":core"),
            name: "core-free-debug".to_owned(),
        }];
        b.deps = vec![DependencyReference::Module {
            path: ModulePath::new(":core"),
            name: "core-paid-debug".to_owned(),
        }];
        assert!(equivalent(&a, &b, &n));
    }

    #[test]
    fn dep_count_mismatch_breaks_equivalence() {
        let n = normalizer();
        let a = description();
        let mut b = description();
        b.deps.push(DependencyReference::maven("com.example", "lib", "maven"));
        assert!(!equivalent(&a, &b, &n));
    }

    #[test]
    fn dep_order_does_not_matter() {
        let n = normalizer();
        let x = DependencyReference::module(&ModulePath::new(":core"));
        let y = DependencyReference::maven("com.example", "lib", "maven");
        let mut a = description();
        let mut b = description();
        a.deps = vec![x.clone(), y.clone()];
        b.deps = vec![y, x];
        assert!(equivalent(&a, &b, &n));
    }
}
