//! Core data types for manifests, affected datasets and check reports.
//!
//! - [`ManifestFragment`] - The dependency buckets of a `package.json`
//! - [`AffectedDataset`] - A snapshot of affected package versions
//! - [`CheckReport`] - The outcome of checking one manifest
//!
//! # Example
//!
//! ```
//! use pkgguard::model::{parse_manifest, AffectedDataset, AffectedEntry};
//!
//! let manifest = parse_manifest(r#"{"dependencies": {"left-pad": "^1.3.0"}}"#).unwrap();
//! let dataset = AffectedDataset::new(vec![AffectedEntry::new("left-pad", "1.3.0")]);
//!
//! println!("{} declared, {} affected entries", manifest.runtime().count(), dataset.packages.len());
//! ```

mod dataset;
mod manifest;
mod report;

pub use dataset::*;
pub use manifest::*;
pub use report::*;
