//! Server configuration

use fhir_mock_core::UpstreamAuth;

/// Server configuration loaded from environment variables
pub struct Config {
    pub bind_address: String,
    /// Directory holding the `csv-*-bundle.json` files
    pub data_dir: String,
    pub cors_origins: Vec<String>,
    pub upstream: UpstreamAuth,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            bind_address: std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            data_dir: std::env::var("MOCK_DATA_DIR").unwrap_or_else(|_| "test/mocks".into()),
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".into())
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect(),
            upstream: UpstreamAuth::from_env(),
        }
    }
}
