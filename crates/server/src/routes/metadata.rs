//! Metadata endpoint handler

use axum::response::IntoResponse;
use fhir_mock_core::CapabilityStatement;

use super::fhir_json;

/// GET /metadata - Return server capability statement
pub async fn get() -> impl IntoResponse {
    fhir_json(CapabilityStatement::new())
}
