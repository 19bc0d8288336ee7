//! Application error handling

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use fhir_mock_core::OperationOutcome;

use crate::routes::FHIR_JSON;

/// Application error type
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, outcome) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, OperationOutcome::not_found(&msg)),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, OperationOutcome::invalid(&msg)),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                OperationOutcome::exception(&msg),
            ),
        };

        (status, [(header::CONTENT_TYPE, FHIR_JSON)], Json(outcome)).into_response()
    }
}
