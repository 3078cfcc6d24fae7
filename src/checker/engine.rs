use super::index::AffectedIndex;
use super::version::versions_match;
use crate::model::{AffectedDataset, CheckReport, ManifestFragment, MatchResult};
use std::collections::{HashMap, HashSet};

/// How a declared package is matched against the affected index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchMode {
    /// Any declared name present in the index is a match, whatever its spec.
    #[default]
    Name,
    /// The name must be in the index and its spec (minus one leading `^`
    /// or `~`) must equal one of the affected versions.
    Exact,
}

impl MatchMode {
    fn is_hit(self, spec: &str, affected: &[String]) -> bool {
        match self {
            MatchMode::Name => true,
            MatchMode::Exact => affected.iter().any(|version| versions_match(spec, version)),
        }
    }
}

/// Cross-references a manifest against the affected index by package name.
pub fn check_packages(manifest: &ManifestFragment, index: &AffectedIndex) -> CheckReport {
    check_packages_with(manifest, index, MatchMode::Name)
}

/// Builds a fresh index from `dataset` and checks `manifest` against it.
pub fn check_against_dataset(manifest: &ManifestFragment, dataset: &AffectedDataset) -> CheckReport {
    check_packages(manifest, &AffectedIndex::from_dataset(dataset))
}

/// Cross-references a manifest against the affected index.
///
/// `dependencies` are visited before `devDependencies`, each in declaration
/// order. A package found in both buckets yields one result with both flags
/// set; its installed version and affected versions come from the first
/// bucket that matched.
pub fn check_packages_with(
    manifest: &ManifestFragment,
    index: &AffectedIndex,
    mode: MatchMode,
) -> CheckReport {
    let mut all_names: HashSet<&str> = HashSet::new();
    let mut matches: Vec<MatchResult> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for (name, spec) in manifest.runtime() {
        all_names.insert(name);
        let Some(affected) = index.get(name) else {
            continue;
        };
        if !mode.is_hit(spec, affected) {
            continue;
        }
        positions.insert(name, matches.len());
        matches.push(MatchResult {
            package_name: name.to_string(),
            installed_version: spec.to_string(),
            affected_versions: affected.to_vec(),
            is_dependency: true,
            is_dev_dependency: false,
        });
    }

    for (name, spec) in manifest.development() {
        all_names.insert(name);
        let Some(affected) = index.get(name) else {
            continue;
        };
        if !mode.is_hit(spec, affected) {
            continue;
        }
        if let Some(&position) = positions.get(name) {
            matches[position].is_dev_dependency = true;
            continue;
        }
        positions.insert(name, matches.len());
        matches.push(MatchResult {
            package_name: name.to_string(),
            installed_version: spec.to_string(),
            affected_versions: affected.to_vec(),
            is_dependency: false,
            is_dev_dependency: true,
        });
    }

    let total = all_names.len();
    tracing::debug!(
        total,
        affected = matches.len(),
        ?mode,
        "Cross-referenced manifest against affected index"
    );

    CheckReport {
        total_packages: total,
        safe_packages: total - matches.len(),
        affected_packages: matches,
    }
}
