use crate::error::CheckError;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Keys accepted by the strict shape check.
const SHAPE_KEYS: [&str; 2] = ["dependencies", "devDependencies"];

/// Insertion-ordered mapping of package name to version spec.
///
/// Names are unique. Inserting an existing name replaces its spec but keeps
/// its original position, which is how a repeated key behaves when a JSON
/// object is decoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyMap {
    entries: Vec<(String, String)>,
    positions: HashMap<String, usize>,
}

impl DependencyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a name, returning the spec it replaced.
    pub fn insert(&mut self, name: impl Into<String>, spec: impl Into<String>) -> Option<String> {
        let name = name.into();
        let spec = spec.into();

        if let Some(&position) = self.positions.get(&name) {
            return Some(std::mem::replace(&mut self.entries[position].1, spec));
        }
        self.positions.insert(name.clone(), self.entries.len());
        self.entries.push((name, spec));
        None
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.positions
            .get(name)
            .map(|&position| self.entries[position].1.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates `(name, spec)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, spec)| (name.as_str(), spec.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for DependencyMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = DependencyMap::new();
        for (name, spec) in iter {
            map.insert(name, spec);
        }
        map
    }
}

impl Serialize for DependencyMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, spec) in &self.entries {
            map.serialize_entry(name, spec)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for DependencyMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DependencyMapVisitor;

        impl<'de> Visitor<'de> for DependencyMapVisitor {
            type Value = DependencyMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of package names to version specs")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut map = DependencyMap::new();
                while let Some((name, spec)) = access.next_entry::<String, String>()? {
                    map.insert(name, spec);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(DependencyMapVisitor)
    }
}

/// The dependency-declaring part of a `package.json`.
///
/// Any top-level field other than the ones below is accepted and dropped.
/// Version specs are kept verbatim, range prefixes included.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestFragment {
    #[serde(
        default,
        deserialize_with = "string_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,
    #[serde(
        default,
        deserialize_with = "string_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<DependencyMap>,
    #[serde(
        default,
        rename = "devDependencies",
        skip_serializing_if = "Option::is_none"
    )]
    pub dev_dependencies: Option<DependencyMap>,
}

/// Keeps a metadata field only when it is a string; any other JSON value
/// is accepted and dropped.
fn string_or_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(value) => Ok(Some(value)),
        _ => Ok(None),
    }
}

impl ManifestFragment {
    /// Decodes manifest text.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::MalformedManifest`] if the text is not JSON, the
    /// top-level value is not an object, or a bucket holds non-string specs.
    pub fn from_json(text: &str) -> Result<Self, CheckError> {
        if !text.trim_start().starts_with('{') {
            return Err(CheckError::MalformedManifest(
                "top-level value must be a JSON object".to_string(),
            ));
        }
        Ok(serde_json::from_str(text)?)
    }

    /// Runtime dependencies in declaration order; empty when absent.
    pub fn runtime(&self) -> impl Iterator<Item = (&str, &str)> {
        self.dependencies.iter().flat_map(DependencyMap::iter)
    }

    /// Development dependencies in declaration order; empty when absent.
    pub fn development(&self) -> impl Iterator<Item = (&str, &str)> {
        self.dev_dependencies.iter().flat_map(DependencyMap::iter)
    }
}

/// Parses manifest text, yielding `None` instead of an error.
///
/// Callers use the `None` case to show a message and skip the check.
pub fn parse_manifest(text: &str) -> Option<ManifestFragment> {
    match ManifestFragment::from_json(text) {
        Ok(manifest) => Some(manifest),
        Err(err) => {
            tracing::debug!("Failed to parse manifest: {}", err);
            None
        }
    }
}

/// Checks that the text is an object with exactly the keys `dependencies`
/// and `devDependencies`, each holding an object.
///
/// This is an input policy for callers that want to refuse whole
/// `package.json` files; [`ManifestFragment::from_json`] never applies it.
pub fn validate_shape(text: &str) -> Result<(), CheckError> {
    let value: serde_json::Value = serde_json::from_str(text.trim())?;

    let Some(object) = value.as_object() else {
        return Err(CheckError::InvalidShape(
            "Top-level JSON must be an object containing only 'dependencies' and 'devDependencies'."
                .to_string(),
        ));
    };

    let exact = object.len() == SHAPE_KEYS.len()
        && SHAPE_KEYS.iter().all(|key| object.contains_key(*key));
    if !exact {
        let found: Vec<&str> = object.keys().map(String::as_str).collect();
        let found = if found.is_empty() {
            "(none)".to_string()
        } else {
            found.join(", ")
        };
        return Err(CheckError::InvalidShape(format!(
            "Invalid fields: expected only 'dependencies' and 'devDependencies', found: {}",
            found
        )));
    }

    for key in SHAPE_KEYS {
        if !object.get(key).is_some_and(serde_json::Value::is_object) {
            return Err(CheckError::InvalidShape(format!(
                "'{}' must be an object (or empty object).",
                key
            )));
        }
    }

    Ok(())
}

/// A small manifest that passes [`validate_shape`].
pub fn sample_manifest() -> ManifestFragment {
    ManifestFragment {
        name: None,
        version: None,
        dependencies: Some([("next", "15.0.1"), ("react", "18.3.1")].into_iter().collect()),
        dev_dependencies: Some(
            [("eslint", "^8"), ("typescript", "^5")]
                .into_iter()
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_malformed_returns_none() {
        assert!(parse_manifest("{not json").is_none());
        assert!(parse_manifest("").is_none());
        assert!(parse_manifest("[]").is_none());
        assert!(parse_manifest("\"package.json\"").is_none());
    }

    #[test]
    fn test_parse_non_string_spec_is_malformed() {
        let err = ManifestFragment::from_json(r#"{"dependencies": {"react": 18}}"#).unwrap_err();
        assert!(matches!(err, CheckError::MalformedManifest(_)));
    }

    #[test]
    fn test_parse_keeps_declaration_order() {
        let manifest = ManifestFragment::from_json(
            r#"{"dependencies": {"zod": "3.0.0", "axios": "1.6.0", "lodash": "4.17.21"}}"#,
        )
        .unwrap();

        let names: Vec<&str> = manifest.runtime().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["zod", "axios", "lodash"]);
    }

    #[test]
    fn test_parse_preserves_range_prefixes() {
        let manifest = ManifestFragment::from_json(
            r#"{"devDependencies": {"eslint": "^8", "typescript": "~5.4.0"}}"#,
        )
        .unwrap();

        let dev = manifest.dev_dependencies.as_ref().unwrap();
        assert_eq!(dev.get("eslint"), Some("^8"));
        assert_eq!(dev.get("typescript"), Some("~5.4.0"));
        assert!(manifest.dependencies.is_none());
    }

    #[test]
    fn test_parse_full_package_json_ignores_extra_fields() {
        let manifest = ManifestFragment::from_json(
            r#"{
                "name": "my-app",
                "version": "0.1.0",
                "private": true,
                "scripts": {"build": "next build"},
                "dependencies": {"next": "15.0.1"}
            }"#,
        )
        .unwrap();

        assert_eq!(manifest.name.as_deref(), Some("my-app"));
        assert_eq!(manifest.version.as_deref(), Some("0.1.0"));
        assert_eq!(manifest.runtime().count(), 1);
        assert_eq!(manifest.development().count(), 0);
    }

    #[test]
    fn test_parse_non_string_metadata_is_dropped() {
        let manifest = ManifestFragment::from_json(
            r#"{"name": "app", "version": 1, "dependencies": {"left-pad": "1.3.0"}}"#,
        )
        .unwrap();

        assert_eq!(manifest.name.as_deref(), Some("app"));
        assert!(manifest.version.is_none());
        assert_eq!(manifest.runtime().count(), 1);

        let manifest =
            ManifestFragment::from_json(r#"{"name": {"scope": "x"}, "version": null}"#).unwrap();
        assert!(manifest.name.is_none());
        assert!(manifest.version.is_none());
    }

    #[test]
    fn test_parse_null_bucket_is_absent() {
        let manifest =
            ManifestFragment::from_json(r#"{"dependencies": null, "devDependencies": {}}"#)
                .unwrap();
        assert!(manifest.dependencies.is_none());
        assert_eq!(manifest.dev_dependencies, Some(DependencyMap::new()));
    }

    #[test]
    fn test_repeated_key_keeps_position_and_last_value() {
        let manifest = ManifestFragment::from_json(
            r#"{"dependencies": {"a": "1.0.0", "b": "2.0.0", "a": "3.0.0"}}"#,
        )
        .unwrap();

        let entries: Vec<(&str, &str)> = manifest.runtime().collect();
        assert_eq!(entries, vec![("a", "3.0.0"), ("b", "2.0.0")]);
    }

    #[test]
    fn test_large_map_keeps_order_and_lookups() {
        let mut map: DependencyMap = (0..5000)
            .map(|i| (format!("pkg-{}", i), format!("{}.0.0", i)))
            .collect();

        assert_eq!(map.len(), 5000);
        assert_eq!(map.get("pkg-4999"), Some("4999.0.0"));
        assert_eq!(map.get("pkg-5000"), None);

        assert_eq!(map.insert("pkg-0", "9.9.9"), Some("0.0.0".to_string()));
        assert_eq!(map.len(), 5000);
        assert_eq!(map.iter().next(), Some(("pkg-0", "9.9.9")));
        assert_eq!(map.iter().last(), Some(("pkg-4999", "4999.0.0")));
    }

    #[test]
    fn test_validate_shape_accepts_exact_keys() {
        assert!(validate_shape(r#"{"dependencies": {}, "devDependencies": {}}"#).is_ok());
    }

    #[test]
    fn test_validate_shape_rejects_extra_or_missing_keys() {
        let err = validate_shape(r#"{"name": "x", "dependencies": {}}"#).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid manifest shape: Invalid fields: expected only 'dependencies' and 'devDependencies', found: name, dependencies"
        );

        let err = validate_shape("{}").unwrap_err();
        assert!(err.to_string().ends_with("found: (none)"));
    }

    #[test]
    fn test_validate_shape_rejects_non_object_buckets() {
        let err = validate_shape(r#"{"dependencies": null, "devDependencies": {}}"#).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid manifest shape: 'dependencies' must be an object (or empty object)."
        );

        let err = validate_shape(r#"{"dependencies": [], "devDependencies": "x"}"#).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid manifest shape: 'dependencies' must be an object (or empty object)."
        );

        let err = validate_shape(r#"{"dependencies": {}, "devDependencies": "x"}"#).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid manifest shape: 'devDependencies' must be an object (or empty object)."
        );
    }

    #[test]
    fn test_validate_shape_rejects_non_object() {
        assert!(matches!(
            validate_shape("[1, 2]"),
            Err(CheckError::InvalidShape(_))
        ));
        assert!(matches!(
            validate_shape("{oops"),
            Err(CheckError::MalformedManifest(_))
        ));
    }

    #[test]
    fn test_sample_manifest_passes_shape_check() {
        let json = serde_json::to_string_pretty(&sample_manifest()).unwrap();
        assert!(validate_shape(&json).is_ok());

        let reparsed = ManifestFragment::from_json(&json).unwrap();
        assert_eq!(reparsed, sample_manifest());
    }
}
