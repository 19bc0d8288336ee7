//! Prometheus metrics collection middleware
//!
//! Records `http_requests_total` (counter) and `http_request_duration_seconds`
//! (histogram) for every request, with method/path/status labels.

use axum::{extract::Request, middleware::Next, response::Response};
use fhir_mock_core::RESOURCES;
use std::time::Instant;

/// Normalize request paths to avoid high-cardinality labels.
/// The segment after a resource type is replaced with `:id` unless it is
/// `_search`, so all reads of one type share one label.
fn normalize_path(path: &str) -> String {
    let mut previous: Option<&str> = None;
    path.split('/')
        .map(|seg| {
            let after_type = previous.is_some_and(|prev| {
                RESOURCES.iter().any(|resource| resource.resource_type == prev)
            });
            previous = Some(seg);
            if after_type && !seg.is_empty() && seg != "_search" {
                ":id"
            } else {
                seg
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Middleware that records request count and duration metrics.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let path = normalize_path(request.uri().path());

    let start = Instant::now();
    let response = next.run(request).await;
    let duration = start.elapsed().as_secs_f64();

    let status = response.status().as_u16().to_string();

    metrics::counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status
    )
    .increment(1);

    metrics::histogram!(
        "http_request_duration_seconds",
        "method" => method,
        "path" => path
    )
    .record(duration);

    response
}

#[cfg(test)]
mod tests {
    use super::normalize_path;

    #[test]
    fn collapses_resource_ids() {
        assert_eq!(normalize_path("/fhir/Patient/p-123"), "/fhir/Patient/:id");
        assert_eq!(normalize_path("/fhir/Encounter/e1"), "/fhir/Encounter/:id");
    }

    #[test]
    fn keeps_search_paths() {
        assert_eq!(normalize_path("/fhir/Patient"), "/fhir/Patient");
        assert_eq!(normalize_path("/fhir/Practitioner/_search"), "/fhir/Practitioner/_search");
        assert_eq!(normalize_path("/metadata"), "/metadata");
    }
}
