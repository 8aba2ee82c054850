use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};

use super::adapters::NormalizedRubric;
use super::domain::RubricDocument;
use super::repository::{JobId, RepositoryError, RubricRepository};
use super::service::{RubricService, RubricServiceError};
use super::shape::PayloadKind;
use super::RubricError;

/// Router builder exposing normalization, preview, and save endpoints.
pub fn rubric_router<R>(service: Arc<RubricService<R>>) -> Router
where
    R: RubricRepository + 'static,
{
    Router::new()
        .route("/api/v1/rubrics/normalize", post(normalize_handler::<R>))
        .route("/api/v1/rubrics/preview", post(preview_handler::<R>))
        .route(
            "/api/v1/jobs/:job_id/rubric",
            get(fetch_handler::<R>).put(save_handler::<R>),
        )
        .with_state(service)
}

/// HTTP status for a rubric failure.
pub fn status_for(error: &RubricError) -> StatusCode {
    match error {
        RubricError::ShapeDetection { .. } | RubricError::MalformedPayload { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        RubricError::WeightInvariantViolation { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_REQUEST,
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct NormalizeResponse {
    source: PayloadKind,
    awaiting_generation: bool,
    document: RubricDocument,
}

impl From<NormalizedRubric> for NormalizeResponse {
    fn from(normalized: NormalizedRubric) -> Self {
        Self {
            source: normalized.source,
            awaiting_generation: normalized.awaiting_generation(),
            document: normalized.document,
        }
    }
}

fn error_response(error: RubricServiceError) -> Response {
    let status = match &error {
        RubricServiceError::Rubric(inner) => status_for(inner),
        RubricServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        RubricServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
    };
    let payload = json!({ "error": error.to_string() });
    (status, Json(payload)).into_response()
}

pub(crate) async fn normalize_handler<R>(
    State(service): State<Arc<RubricService<R>>>,
    Json(payload): Json<Value>,
) -> Response
where
    R: RubricRepository + 'static,
{
    match service.normalize(payload) {
        Ok(normalized) => {
            (StatusCode::OK, Json(NormalizeResponse::from(normalized))).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn preview_handler<R>(
    State(service): State<Arc<RubricService<R>>>,
    Json(document): Json<RubricDocument>,
) -> Response
where
    R: RubricRepository + 'static,
{
    match service.preview(document) {
        Ok(document) => (StatusCode::OK, Json(document)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn save_handler<R>(
    State(service): State<Arc<RubricService<R>>>,
    Path(job_id): Path<String>,
    Json(document): Json<RubricDocument>,
) -> Response
where
    R: RubricRepository + 'static,
{
    match service.save(JobId(job_id), document) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn fetch_handler<R>(
    State(service): State<Arc<RubricService<R>>>,
    Path(job_id): Path<String>,
) -> Response
where
    R: RubricRepository + 'static,
{
    match service.get(&JobId(job_id)) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}
