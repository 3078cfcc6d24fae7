//! Loading the affected packages dataset.
//!
//! The dataset is read once per run and handed to the checker; nothing in
//! the checker performs I/O.
//!
//! | Source | Location |
//! |--------|----------|
//! | [`FileSource`] | Local JSON file |
//! | [`HttpSource`] | `http://` or `https://` URL, cached on disk |
//!
//! # Example
//!
//! ```no_run
//! use pkgguard::loader::source_for;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let source = source_for("affected_packages.json", None);
//!     let dataset = source.load().await?;
//!     println!("{} affected entries", dataset.packages.len());
//!     Ok(())
//! }
//! ```

mod file;
mod http;

pub use file::FileSource;
pub use http::HttpSource;

use crate::cache::Cache;
use crate::error::CheckError;
use crate::model::AffectedDataset;
use async_trait::async_trait;

/// A place the affected packages dataset can be loaded from.
#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// Returns the human-readable name of this source kind.
    fn name(&self) -> &'static str;

    /// Returns the path or URL being loaded.
    fn location(&self) -> String;

    /// Loads and decodes the dataset.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::DatasetUnavailable`] if the dataset cannot be
    /// read, fetched or decoded.
    async fn load(&self) -> Result<AffectedDataset, CheckError>;
}

/// Returns true if `location` should be fetched over HTTP.
pub fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Picks the source for a dataset location.
///
/// URLs are fetched over HTTP and cached in `cache` when one is given;
/// anything else is read as a file path.
pub fn source_for(location: &str, cache: Option<Cache>) -> Box<dyn DatasetSource> {
    if is_remote(location) {
        let source = HttpSource::new(location);
        match cache {
            Some(cache) => Box::new(source.with_cache(cache)),
            None => Box::new(source),
        }
    } else {
        Box::new(FileSource::new(location))
    }
}
