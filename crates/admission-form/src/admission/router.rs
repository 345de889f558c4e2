use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use super::domain::{ApplicantRecord, SectionUpdate};
use super::gate::FormStep;
use super::repository::{SessionId, SessionRepository, SessionRepositoryError};
use super::service::{AdmissionService, AdmissionServiceError};

/// Body of the stateless evaluation endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct EvaluateRequest {
    pub record: ApplicantRecord,
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

/// Query string of the step navigation endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StepQuery {
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

/// Router builder exposing the form session endpoints.
pub fn admission_router<R>(service: Arc<AdmissionService<R>>) -> Router
where
    R: SessionRepository + 'static,
{
    Router::new()
        .route("/api/v1/admissions", post(start_handler::<R>))
        .route("/api/v1/admissions/evaluate", post(evaluate_handler::<R>))
        .route(
            "/api/v1/admissions/:session_id",
            get(session_handler::<R>).delete(discard_handler::<R>),
        )
        .route(
            "/api/v1/admissions/:session_id/sections",
            patch(update_handler::<R>),
        )
        .route(
            "/api/v1/admissions/:session_id/steps/:step/next",
            get(next_step_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn start_handler<R>(State(service): State<Arc<AdmissionService<R>>>) -> Response
where
    R: SessionRepository + 'static,
{
    match service.start() {
        Ok(snapshot) => (StatusCode::CREATED, axum::Json(snapshot)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn session_handler<R>(
    State(service): State<Arc<AdmissionService<R>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
{
    match service.get(&SessionId(session_id)) {
        Ok(snapshot) => (StatusCode::OK, axum::Json(snapshot)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_handler<R>(
    State(service): State<Arc<AdmissionService<R>>>,
    Path(session_id): Path<String>,
    axum::Json(update): axum::Json<SectionUpdate>,
) -> Response
where
    R: SessionRepository + 'static,
{
    match service.update(&SessionId(session_id), update) {
        Ok(snapshot) => (StatusCode::OK, axum::Json(snapshot)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn discard_handler<R>(
    State(service): State<Arc<AdmissionService<R>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
{
    match service.discard(&SessionId(session_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn next_step_handler<R>(
    State(service): State<Arc<AdmissionService<R>>>,
    Path((session_id, step)): Path<(String, String)>,
    Query(query): Query<StepQuery>,
) -> Response
where
    R: SessionRepository + 'static,
{
    let Some(step) = FormStep::parse(&step) else {
        let payload = json!({
            "error": format!("unknown step `{step}`"),
        });
        return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
    };

    match service.next_step(&SessionId(session_id), step, query.as_of) {
        Ok(decision) => (StatusCode::OK, axum::Json(decision)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn evaluate_handler<R>(
    State(service): State<Arc<AdmissionService<R>>>,
    axum::Json(request): axum::Json<EvaluateRequest>,
) -> Response
where
    R: SessionRepository + 'static,
{
    let evaluation = service.evaluate_record(&request.record, request.as_of);
    (StatusCode::OK, axum::Json(evaluation)).into_response()
}

fn error_response(error: AdmissionServiceError) -> Response {
    let status = match &error {
        AdmissionServiceError::Repository(SessionRepositoryError::NotFound) => {
            StatusCode::NOT_FOUND
        }
        AdmissionServiceError::Repository(SessionRepositoryError::Conflict) => StatusCode::CONFLICT,
        AdmissionServiceError::Repository(SessionRepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
