pub mod cache;
pub mod checker;
pub mod config;
pub mod error;
pub mod loader;
pub mod model;
pub mod output;
pub mod platform;

pub use cache::Cache;
pub use checker::{check_packages, AffectedIndex, MatchMode};
pub use config::Config;
pub use error::CheckError;
pub use model::{AffectedDataset, AffectedEntry, CheckReport, ManifestFragment, MatchResult};
