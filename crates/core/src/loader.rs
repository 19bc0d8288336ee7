//! Mock-data bundle loading
//!
//! Bundles are read and parsed on every call; edits to the files on disk
//! show up on the next request.

use std::path::{Path, PathBuf};

use crate::bundle::Bundle;
use crate::error::FhirError;
use crate::resource::SearchableResource;

/// Reads resource bundles from the mock-data directory
#[derive(Debug, Clone)]
pub struct BundleLoader {
    data_dir: PathBuf,
}

impl BundleLoader {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn bundle_path(&self, resource: &SearchableResource) -> PathBuf {
        self.data_dir.join(resource.file_name)
    }

    /// Read and parse the bundle file for `resource`
    pub fn load(&self, resource: &SearchableResource) -> Result<Bundle, FhirError> {
        let path = self.bundle_path(resource);
        let data = std::fs::read_to_string(&path).map_err(|source| FhirError::DataRead {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&data).map_err(|source| FhirError::DataParse { path, source })
    }
}
