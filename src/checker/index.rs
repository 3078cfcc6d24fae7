use crate::model::{AffectedDataset, AffectedEntry};
use std::collections::HashMap;

/// Lookup table from package name to every affected version recorded for it.
///
/// Versions keep dataset order, duplicates included.
#[derive(Debug, Clone, Default)]
pub struct AffectedIndex {
    versions: HashMap<String, Vec<String>>,
}

impl AffectedIndex {
    pub fn from_dataset(dataset: &AffectedDataset) -> Self {
        Self::from_entries(&dataset.packages)
    }

    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a AffectedEntry>) -> Self {
        let mut versions: HashMap<String, Vec<String>> = HashMap::new();
        for entry in entries {
            versions
                .entry(entry.package_name.clone())
                .or_default()
                .push(entry.version.clone());
        }
        Self { versions }
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.versions.get(name).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.versions.contains_key(name)
    }

    /// Number of distinct package names.
    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// Number of versions across all names; equals the entry count it was
    /// built from.
    pub fn total_versions(&self) -> usize {
        self.versions.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(entries: &[(&str, &str)]) -> AffectedDataset {
        AffectedDataset::new(
            entries
                .iter()
                .map(|(name, version)| AffectedEntry::new(*name, *version))
                .collect(),
        )
    }

    #[test]
    fn test_empty_dataset_gives_empty_index() {
        let index = AffectedIndex::from_dataset(&AffectedDataset::new(Vec::new()));
        assert!(index.is_empty());
        assert_eq!(index.total_versions(), 0);
        assert!(index.get("left-pad").is_none());
    }

    #[test]
    fn test_versions_accumulate_in_dataset_order() {
        let data = dataset(&[
            ("left-pad", "1.3.1"),
            ("chalk", "5.6.1"),
            ("left-pad", "1.3.0"),
            ("left-pad", "1.3.1"),
        ]);
        let index = AffectedIndex::from_dataset(&data);

        assert_eq!(index.len(), 2);
        assert_eq!(index.total_versions(), data.packages.len());
        assert_eq!(
            index.get("left-pad").unwrap(),
            &["1.3.1".to_string(), "1.3.0".to_string(), "1.3.1".to_string()]
        );
        assert_eq!(index.get("chalk").unwrap(), &["5.6.1".to_string()]);
    }

    #[test]
    fn test_key_count_never_exceeds_entries() {
        let data = dataset(&[("a", "1"), ("b", "1"), ("c", "1"), ("a", "2")]);
        let index = AffectedIndex::from_dataset(&data);

        assert!(index.len() <= data.packages.len());
        for name in ["a", "b", "c"] {
            let expected = data.packages.iter().filter(|e| e.package_name == name).count();
            assert_eq!(index.get(name).unwrap().len(), expected);
        }
    }

    #[test]
    fn test_build_does_not_touch_dataset() {
        let data = dataset(&[("a", "1")]);
        let before = data.clone();
        let _ = AffectedIndex::from_dataset(&data);
        assert_eq!(data, before);
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let index = AffectedIndex::from_dataset(&dataset(&[("React", "1.0.0")]));
        assert!(index.contains("React"));
        assert!(!index.contains("react"));
    }
}
