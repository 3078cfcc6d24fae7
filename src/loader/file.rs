use crate::error::CheckError;
use crate::model::AffectedDataset;
use async_trait::async_trait;
use std::path::PathBuf;

/// Reads the dataset from a local JSON file.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl super::DatasetSource for FileSource {
    fn name(&self) -> &'static str {
        "file"
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }

    async fn load(&self) -> Result<AffectedDataset, CheckError> {
        let location = self.location();
        tracing::debug!("Reading affected packages from {}", location);

        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| CheckError::dataset(&location, e))?;

        let dataset: AffectedDataset =
            serde_json::from_str(&content).map_err(|e| CheckError::dataset(&location, e))?;

        tracing::debug!("Loaded {} affected entries", dataset.packages.len());
        Ok(dataset)
    }
}
