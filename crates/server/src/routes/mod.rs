pub mod health;
pub mod metadata;
pub mod metrics;
mod resource;

use axum::{Json, Router, http::header, response::IntoResponse};
use fhir_mock_core::{BundleLoader, RESOURCES};
use serde::Serialize;

/// Media type of every FHIR response body
pub const FHIR_JSON: &str = "application/fhir+json";

/// Build FHIR routes: search, `_search` and read for every served resource type
pub fn fhir_routes() -> Router<BundleLoader> {
    RESOURCES.iter().fold(Router::new(), |router, &resource| {
        router.nest(
            &format!("/{}", resource.resource_type),
            resource::routes(resource),
        )
    })
}

/// Successful FHIR response with the mock server's fixed headers
pub(crate) fn fhir_json<T: Serialize>(body: T) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, FHIR_JSON),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        Json(body),
    )
}
