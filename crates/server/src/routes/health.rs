//! Health check endpoint

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use fhir_mock_core::BundleLoader;
use serde::Serialize;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

/// GET /health - Check that the mock-data directory is reachable
pub async fn check(State(loader): State<BundleLoader>) -> impl IntoResponse {
    match tokio::fs::metadata(loader.data_dir()).await {
        Ok(meta) if meta.is_dir() => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy".to_string(),
                reason: None,
            }),
        ),
        Ok(_) => {
            tracing::error!(data_dir = %loader.data_dir().display(), "Mock data path is not a directory");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "unhealthy".to_string(),
                    reason: Some("Mock data path is not a directory".to_string()),
                }),
            )
        }
        Err(e) => {
            tracing::error!(error = %e, data_dir = %loader.data_dir().display(), "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "unhealthy".to_string(),
                    reason: Some(format!("Mock data directory unavailable: {}", e)),
                }),
            )
        }
    }
}
