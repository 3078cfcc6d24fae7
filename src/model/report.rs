use serde::{Deserialize, Serialize};

/// Which manifest buckets a matched package was declared in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyKind {
    Runtime,
    Development,
    Both,
}

impl DependencyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyKind::Runtime => "dependencies",
            DependencyKind::Development => "devDependencies",
            DependencyKind::Both => "both",
        }
    }
}

impl std::fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A declared package whose name is in the affected index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub package_name: String,
    /// Spec from the bucket that matched first (`dependencies` before
    /// `devDependencies`).
    pub installed_version: String,
    pub affected_versions: Vec<String>,
    pub is_dependency: bool,
    pub is_dev_dependency: bool,
}

impl MatchResult {
    pub fn kind(&self) -> DependencyKind {
        match (self.is_dependency, self.is_dev_dependency) {
            (true, true) => DependencyKind::Both,
            (false, true) => DependencyKind::Development,
            _ => DependencyKind::Runtime,
        }
    }
}

/// Outcome of checking one manifest.
///
/// `total_packages == safe_packages + affected_packages.len()` always holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckReport {
    pub total_packages: usize,
    pub affected_packages: Vec<MatchResult>,
    pub safe_packages: usize,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.affected_packages.is_empty()
    }

    /// Matches declared in `dependencies` (including those also in
    /// `devDependencies`).
    pub fn runtime_matches(&self) -> impl Iterator<Item = &MatchResult> {
        self.affected_packages.iter().filter(|m| m.is_dependency)
    }

    /// Matches declared in `devDependencies` (including those also in
    /// `dependencies`).
    pub fn development_matches(&self) -> impl Iterator<Item = &MatchResult> {
        self.affected_packages.iter().filter(|m| m.is_dev_dependency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(name: &str, dep: bool, dev: bool) -> MatchResult {
        MatchResult {
            package_name: name.to_string(),
            installed_version: "1.0.0".to_string(),
            affected_versions: vec!["1.0.0".to_string()],
            is_dependency: dep,
            is_dev_dependency: dev,
        }
    }

    #[test]
    fn test_match_kind() {
        assert_eq!(result("a", true, false).kind(), DependencyKind::Runtime);
        assert_eq!(result("a", false, true).kind(), DependencyKind::Development);
        assert_eq!(result("a", true, true).kind(), DependencyKind::Both);
        assert_eq!(DependencyKind::Both.to_string(), "both");
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let report = CheckReport {
            total_packages: 2,
            affected_packages: vec![result("left-pad", true, true)],
            safe_packages: 1,
        };

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["totalPackages"], 2);
        assert_eq!(value["safePackages"], 1);
        assert_eq!(value["affectedPackages"][0]["packageName"], "left-pad");
        assert_eq!(value["affectedPackages"][0]["installedVersion"], "1.0.0");
        assert_eq!(value["affectedPackages"][0]["isDevDependency"], true);
    }

    #[test]
    fn test_report_partitions() {
        let report = CheckReport {
            total_packages: 3,
            affected_packages: vec![
                result("a", true, false),
                result("b", false, true),
                result("c", true, true),
            ],
            safe_packages: 0,
        };

        assert!(!report.is_clean());
        assert_eq!(report.runtime_matches().count(), 2);
        assert_eq!(report.development_matches().count(), 2);
        assert!(CheckReport::default().is_clean());
    }
}
