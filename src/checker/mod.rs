//! Cross-referencing manifests against affected packages.
//!
//! # Example
//!
//! ```
//! use pkgguard::checker::{check_packages, AffectedIndex};
//! use pkgguard::model::{parse_manifest, AffectedDataset, AffectedEntry};
//!
//! let dataset = AffectedDataset::new(vec![
//!     AffectedEntry::new("left-pad", "1.3.0"),
//!     AffectedEntry::new("left-pad", "1.3.1"),
//! ]);
//! let index = AffectedIndex::from_dataset(&dataset);
//!
//! let manifest = parse_manifest(r#"{
//!     "dependencies": {"left-pad": "^1.3.0", "react": "18.0.0"},
//!     "devDependencies": {"left-pad": "^1.3.0", "eslint": "8.0.0"}
//! }"#).unwrap();
//!
//! let report = check_packages(&manifest, &index);
//! assert_eq!(report.total_packages, 3);
//! assert_eq!(report.safe_packages, 2);
//! assert!(report.affected_packages[0].is_dev_dependency);
//! ```

mod engine;
mod index;
mod version;

pub use engine::{check_against_dataset, check_packages, check_packages_with, MatchMode};
pub use index::AffectedIndex;
pub use version::{strip_range_prefix, versions_match};
