//! Error types for manifest parsing and dataset loading.
//!
//! The index builder and the cross-reference engine never fail; every
//! variant here is a precondition failure that stops a check before the
//! engine runs.

use thiserror::Error;

/// Errors raised while preparing the inputs of a check.
#[derive(Debug, Error)]
pub enum CheckError {
    /// The manifest text is not a JSON object with string-valued buckets.
    #[error("malformed manifest: {0}")]
    MalformedManifest(String),

    /// The manifest is valid JSON but fails the strict shape check.
    #[error("invalid manifest shape: {0}")]
    InvalidShape(String),

    /// The affected packages dataset could not be read, fetched or decoded.
    #[error("affected packages dataset unavailable at {location}: {reason}")]
    DatasetUnavailable { location: String, reason: String },
}

impl CheckError {
    pub(crate) fn dataset(location: impl Into<String>, reason: impl ToString) -> Self {
        CheckError::DatasetUnavailable {
            location: location.into(),
            reason: reason.to_string(),
        }
    }

    /// Message shown to the user when a check is refused.
    pub fn user_message(&self) -> &'static str {
        match self {
            CheckError::MalformedManifest(_) => "Invalid JSON format. Please check your input.",
            CheckError::InvalidShape(_) => {
                "Manifest must contain only 'dependencies' and 'devDependencies'."
            }
            CheckError::DatasetUnavailable { .. } => "Failed to load affected packages database",
        }
    }
}

impl From<serde_json::Error> for CheckError {
    fn from(err: serde_json::Error) -> Self {
        CheckError::MalformedManifest(err.to_string())
    }
}
