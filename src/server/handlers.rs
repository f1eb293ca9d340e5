use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, MutexGuard};
use std::time::Instant;
use tracing::{info, warn};

use crate::location::StoreError;
use crate::workflow::{
    EntityKind, EventEntity, FieldInstruction, FormSubmission, SelectOption, SubmitOutcome,
    WorkflowError,
};

use super::state::{AppState, AppWorkflow};

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<String>,
}

pub(super) struct ApiError {
    status: StatusCode,
    message: String,
    field: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.message,
            code: self.status.as_u16(),
            field: self.field,
        };
        (self.status, Json(body)).into_response()
    }
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    ApiError {
        status,
        message: msg.into(),
        field: None,
    }
}

impl From<WorkflowError> for ApiError {
    fn from(e: WorkflowError) -> Self {
        match e {
            WorkflowError::Validation(v) => ApiError {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                message: v.message,
                field: Some(v.field),
            },
            WorkflowError::Store(StoreError::NotFound(id)) => {
                api_error(StatusCode::NOT_FOUND, format!("Location not found: '{}'", id))
            }
            WorkflowError::Format(f) => api_error(StatusCode::UNPROCESSABLE_ENTITY, f.to_string()),
            WorkflowError::Store(s) => {
                warn!(error = %s, "location store failure");
                api_error(StatusCode::INTERNAL_SERVER_ERROR, s.to_string())
            }
        }
    }
}

fn lock(state: &AppState) -> Result<MutexGuard<'_, AppWorkflow>, ApiError> {
    state
        .workflow
        .lock()
        .map_err(|_| api_error(StatusCode::INTERNAL_SERVER_ERROR, "Workflow state is poisoned"))
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

// ─── GET /api/locations ──────────────────────────────────────────

pub async fn list_locations(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<SelectOption>>, ApiError> {
    let start = Instant::now();
    let options = lock(&state)?.saved_location_options()?.unwrap_or_default();
    info!(count = options.len(), ms = elapsed_ms(start), "GET /api/locations");
    Ok(Json(options))
}

// ─── GET /api/locations/select ───────────────────────────────────

#[derive(Deserialize)]
pub struct SelectQuery {
    #[serde(default)]
    pub kind: EntityKind,
    pub value: Option<String>,
}

pub async fn select_location(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SelectQuery>,
) -> Result<Json<Vec<FieldInstruction>>, ApiError> {
    let start = Instant::now();
    let value = params.value.as_deref().unwrap_or("").trim();
    if value.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "Missing 'value' parameter"));
    }

    let instructions = lock(&state)?.resolve_selection(params.kind, value)?;
    info!(kind = %params.kind, value, ms = elapsed_ms(start), "GET /api/locations/select");
    Ok(Json(instructions))
}

// ─── POST /api/events/validate ───────────────────────────────────

/// Body of the validate and refill endpoints.
#[derive(Deserialize)]
pub struct ValidateRequest {
    #[serde(default)]
    pub kind: EntityKind,
    pub submission: FormSubmission,
}

pub async fn validate_event(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ValidateRequest>,
) -> Result<StatusCode, ApiError> {
    let start = Instant::now();
    let result = lock(&state)?.validate(req.kind, &req.submission);
    info!(kind = %req.kind, valid = result.is_ok(), ms = elapsed_ms(start), "POST /api/events/validate");
    match result {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => Err(WorkflowError::from(e).into()),
    }
}

// ─── POST /api/events/refill ─────────────────────────────────────

pub async fn refill_event(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ValidateRequest>,
) -> Result<Json<Vec<FieldInstruction>>, ApiError> {
    let start = Instant::now();
    let instructions = lock(&state)?.refill(req.kind, &req.submission)?;
    info!(kind = %req.kind, ms = elapsed_ms(start), "POST /api/events/refill");
    Ok(Json(instructions))
}

// ─── POST /api/events/submit ─────────────────────────────────────

#[derive(Deserialize)]
pub struct SubmitRequest {
    pub entity: EventEntity,
    pub submission: FormSubmission,
}

pub async fn submit_event(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SubmitRequest>,
) -> Result<Json<SubmitOutcome>, ApiError> {
    let start = Instant::now();
    let outcome = lock(&state)?.process(&req.submission, &req.entity)?;
    info!(kind = %req.entity.kind, ms = elapsed_ms(start), "POST /api/events/submit");
    Ok(Json(outcome))
}
