use crate::cache::Cache;
use crate::error::CheckError;
use crate::model::AffectedDataset;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Cache entry for a fetched dataset. Cache keys are sanitized file names,
/// so the URL is stored alongside the data and checked on read.
#[derive(Serialize, Deserialize)]
struct CachedDataset {
    url: String,
    dataset: AffectedDataset,
}

/// Fetches the dataset from a URL, optionally through the on-disk cache.
pub struct HttpSource {
    client: reqwest::Client,
    url: String,
    cache: Option<Cache>,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            cache: None,
        }
    }

    pub fn with_cache(mut self, cache: Cache) -> Self {
        self.cache = Some(cache);
        self
    }

    fn cache_key(&self) -> String {
        format!("dataset_{}", self.url)
    }

    async fn fetch(&self) -> Result<AffectedDataset, CheckError> {
        tracing::debug!("Fetching affected packages from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| CheckError::dataset(&self.url, e))?;

        if !response.status().is_success() {
            return Err(CheckError::dataset(
                &self.url,
                format!("Failed to fetch affected packages data ({})", response.status()),
            ));
        }

        response
            .json::<AffectedDataset>()
            .await
            .map_err(|e| CheckError::dataset(&self.url, e))
    }
}

#[async_trait]
impl super::DatasetSource for HttpSource {
    fn name(&self) -> &'static str {
        "http"
    }

    fn location(&self) -> String {
        self.url.clone()
    }

    async fn load(&self) -> Result<AffectedDataset, CheckError> {
        let key = self.cache_key();

        // Check cache first
        if let Some(cached) = self
            .cache
            .as_ref()
            .and_then(|cache| cache.get::<CachedDataset>(&key))
        {
            if cached.url == self.url {
                tracing::debug!("Using cached dataset for {}", self.url);
                return Ok(cached.dataset);
            }
            tracing::debug!("Cache entry for {} belongs to {}", self.url, cached.url);
        }

        let dataset = self.fetch().await?;

        if let Some(cache) = &self.cache {
            let entry = CachedDataset {
                url: self.url.clone(),
                dataset,
            };
            if let Err(err) = cache.set(&key, &entry) {
                tracing::warn!("Failed to cache dataset from {}: {}", self.url, err);
            }
            return Ok(entry.dataset);
        }

        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::DatasetSource;
    use crate::model::AffectedEntry;
    use std::time::Duration;

    #[tokio::test]
    async fn test_cached_dataset_skips_network() {
        let dir = tempfile::tempdir().unwrap();
        let cache = Cache::at(dir.path(), Duration::from_secs(3600));
        // Nothing listens here; a cache miss would fail the load.
        let source = HttpSource::new("http://127.0.0.1:9/affected.json").with_cache(cache.clone());

        let dataset = AffectedDataset::new(vec![AffectedEntry::new("left-pad", "1.3.0")]);
        let entry = CachedDataset {
            url: source.location(),
            dataset: dataset.clone(),
        };
        cache.set(&source.cache_key(), &entry).unwrap();

        assert_eq!(source.load().await.unwrap(), dataset);
    }

    #[tokio::test]
    async fn test_colliding_cache_key_is_not_reused() {
        let dir = tempfile::tempdir().unwrap();
        let cache = Cache::at(dir.path(), Duration::from_secs(3600));
        let first = HttpSource::new("http://127.0.0.1:9/a.json").with_cache(cache.clone());
        let second = HttpSource::new("http://127.0.0.1:9/a_json").with_cache(cache.clone());
        assert_eq!(
            cache.cache_path(&first.cache_key()),
            cache.cache_path(&second.cache_key())
        );

        let entry = CachedDataset {
            url: first.location(),
            dataset: AffectedDataset::new(vec![AffectedEntry::new("left-pad", "1.3.0")]),
        };
        cache.set(&first.cache_key(), &entry).unwrap();

        assert!(first.load().await.is_ok());
        let err = second.load().await.unwrap_err();
        assert!(matches!(err, CheckError::DatasetUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_unreachable_url_is_unavailable() {
        let source = HttpSource::new("http://127.0.0.1:9/affected.json");
        let err = source.load().await.unwrap_err();
        assert!(matches!(err, CheckError::DatasetUnavailable { .. }));
    }
}
