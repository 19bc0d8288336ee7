//! Search and read handlers shared by every mock resource type
//!
//! Each nested router carries its `SearchableResource` as an extension, so
//! Patient, Practitioner and Encounter run the same handlers over different
//! bundle files and search parameters.

use axum::{
    Extension, Form, Router,
    body::Bytes,
    extract::{FromRequest, Path, Query, Request, State, rejection::QueryRejection},
    http::header,
    response::IntoResponse,
    routing::{get, post},
};
use fhir_mock_core::search::filter_entries;
use fhir_mock_core::{Bundle, BundleLoader, SearchParams, SearchableResource};

use super::fhir_json;
use crate::error::AppError;

/// Routes for one resource type, to be nested under `/<ResourceType>`
pub fn routes(resource: &'static SearchableResource) -> Router<BundleLoader> {
    Router::new()
        .route("/", get(search))
        .route("/_search", get(read_search_segment).post(search_post))
        .route("/{id}", get(read))
        .layer(Extension(resource))
}

/// Search parameters sent in a `POST _search` body, either form-encoded or JSON.
/// Any other (or missing) content type contributes no parameters.
pub struct SearchBody(pub SearchParams);

impl<S> FromRequest<S> for SearchBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(params) = Form::<SearchParams>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            return Ok(Self(params));
        }

        if content_type.contains("json") {
            let bytes = Bytes::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            if bytes.is_empty() {
                return Ok(Self(SearchParams::default()));
            }
            let params = serde_json::from_slice(&bytes)
                .map_err(|e| AppError::BadRequest(format!("Invalid search body: {}", e)))?;
            return Ok(Self(params));
        }

        Ok(Self(SearchParams::default()))
    }
}

fn query_params(query: Result<Query<SearchParams>, QueryRejection>) -> Result<SearchParams, AppError> {
    query
        .map(|Query(params)| params)
        .map_err(|e| AppError::BadRequest(e.body_text()))
}

/// Load the resource's bundle on the blocking pool and run `f` over it.
///
/// Read failures, parse failures and panics inside `f` all become a 500 with
/// the resource's load-failure diagnostics; the cause is only logged.
async fn with_bundle<T, F>(
    loader: BundleLoader,
    resource: &'static SearchableResource,
    f: F,
) -> Result<T, AppError>
where
    F: FnOnce(Bundle) -> T + Send + 'static,
    T: Send + 'static,
{
    let task = tokio::task::spawn_blocking(move || loader.load(resource).map(f));

    match task.await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => {
            tracing::error!(
                error = %e,
                resource_type = resource.resource_type,
                "Failed to load mock bundle"
            );
            Err(AppError::Internal(resource.load_failure_message()))
        }
        Err(e) => {
            tracing::error!(
                error = %e,
                resource_type = resource.resource_type,
                "Mock bundle task failed"
            );
            Err(AppError::Internal(resource.load_failure_message()))
        }
    }
}

async fn run_search(
    loader: BundleLoader,
    resource: &'static SearchableResource,
    params: SearchParams,
) -> Result<impl IntoResponse, AppError> {
    tracing::debug!(resource_type = resource.resource_type, params = ?params, "Search");

    let bundle = with_bundle(loader, resource, move |mut bundle| {
        let entries = filter_entries(resource, std::mem::take(&mut bundle.entry), &params);
        bundle.with_entries(entries)
    })
    .await?;

    Ok(fhir_json(bundle))
}

/// GET /fhir/{type} - Search resources by query parameters
pub async fn search(
    State(loader): State<BundleLoader>,
    Extension(resource): Extension<&'static SearchableResource>,
    query: Result<Query<SearchParams>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    run_search(loader, resource, query_params(query)?).await
}

/// POST /fhir/{type}/_search - Search with parameters in the body; query
/// string values take precedence
pub async fn search_post(
    State(loader): State<BundleLoader>,
    Extension(resource): Extension<&'static SearchableResource>,
    query: Result<Query<SearchParams>, QueryRejection>,
    SearchBody(body): SearchBody,
) -> Result<impl IntoResponse, AppError> {
    let params = query_params(query)?.or(body);
    run_search(loader, resource, params).await
}

/// GET /fhir/{type}/{id} - Read one resource by id (or identifier value)
pub async fn read(
    State(loader): State<BundleLoader>,
    Extension(resource): Extension<&'static SearchableResource>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    read_resource(loader, resource, id).await
}

/// GET /fhir/{type}/_search - `_search` is only special for POST; a GET is a
/// read of a resource with that id
pub async fn read_search_segment(
    State(loader): State<BundleLoader>,
    Extension(resource): Extension<&'static SearchableResource>,
) -> Result<impl IntoResponse, AppError> {
    read_resource(loader, resource, "_search".to_string()).await
}

async fn read_resource(
    loader: BundleLoader,
    resource: &'static SearchableResource,
    id: String,
) -> Result<impl IntoResponse, AppError> {
    let lookup_id = id.clone();
    let found = with_bundle(loader, resource, move |bundle| {
        resource.find(&bundle.entry, &lookup_id).cloned()
    })
    .await?;

    match found {
        Some(data) => Ok(fhir_json(data)),
        None => Err(AppError::NotFound(resource.not_found_message(&id))),
    }
}
