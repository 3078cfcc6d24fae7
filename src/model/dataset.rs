use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// A package version known to be compromised or vulnerable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffectedEntry {
    pub package_name: String,
    pub version: String,
}

impl AffectedEntry {
    pub fn new(package_name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            version: version.into(),
        }
    }
}

/// A snapshot of an advisory feed listing affected packages.
///
/// The same package may appear many times with different (or identical)
/// versions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffectedDataset {
    #[serde(default)]
    pub crawled_at: String,
    #[serde(default)]
    pub total_packages: u64,
    #[serde(default)]
    pub source_url: String,
    pub packages: Vec<AffectedEntry>,
}

impl AffectedDataset {
    pub fn new(packages: Vec<AffectedEntry>) -> Self {
        Self {
            crawled_at: String::new(),
            total_packages: packages.len() as u64,
            source_url: String::new(),
            packages,
        }
    }

    /// Parses `crawled_at` as RFC 3339, or as a naive ISO-8601 timestamp
    /// taken to be UTC.
    pub fn crawled_at_utc(&self) -> Option<DateTime<Utc>> {
        let raw = self.crawled_at.trim();
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Some(parsed.with_timezone(&Utc));
        }
        ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y%m%d_%H%M%S"]
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
            .map(|naive| naive.and_utc())
    }
}
