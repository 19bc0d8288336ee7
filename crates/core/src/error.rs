use std::path::PathBuf;

use thiserror::Error;

/// Mock server error types
#[derive(Debug, Error)]
pub enum FhirError {
    #[error("Failed to read mock data file {path}: {source}")]
    DataRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse mock data file {path}: {source}")]
    DataParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Upstream FHIR server credentials not configured")]
    CredentialsNotConfigured,
}
