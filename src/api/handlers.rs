// Request handlers for the gated task endpoints
//
// Both handlers run only after `require_credential` has inserted a
// `Principal`; the extractor below fails with 500 if the gate was bypassed.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    response::Json,
    Extension,
};
use tracing::{error, info, warn};

use crate::api::responses::{ApiError, CreatedTaskResponse, TasksResponse};
use crate::api::AppState;
use crate::core::errors::TasksError;
use crate::core::models::{CreateTaskRequest, Principal};

/// GET /tasks
///
/// Returns every stored task in append order.
pub async fn list_tasks_handler(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Extension(principal): Extension<Principal>,
) -> Result<Json<TasksResponse>, ApiError> {
    let request_id = request_id(&headers);

    let tasks = app_state.task_store.read_all().await.map_err(|e| {
        error!(error = %e, request_id = %request_id, "Loading the tasks failed");
        ApiError::from_tasks_error_with_id(e, request_id.clone())
    })?;

    info!(
        uid = %principal,
        request_id = %request_id,
        task_count = tasks.len(),
        "Tasks loaded"
    );

    Ok(Json(TasksResponse {
        message: "Tasks loaded.".to_string(),
        tasks,
    }))
}

/// POST /tasks
///
/// Validates the payload, appends it to the log and echoes the stored task.
pub async fn create_task_handler(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Extension(principal): Extension<Principal>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedTaskResponse>), ApiError> {
    let request_id = request_id(&headers);

    let task = payload
        .map_err(payload_error)
        .and_then(|Json(request)| request.into_task())
        .map_err(|e| {
            warn!(error = %e, request_id = %request_id, "Rejected task payload");
            ApiError::from_tasks_error_with_id(e, request_id.clone())
        })?;

    app_state.task_store.append(&task).await.map_err(|e| {
        error!(error = %e, request_id = %request_id, "Storing the task failed");
        ApiError::from_tasks_error_with_id(e, request_id.clone())
    })?;

    info!(uid = %principal, request_id = %request_id, "Task stored");

    Ok((
        StatusCode::CREATED,
        Json(CreatedTaskResponse {
            message: "Task stored.".to_string(),
            created_task: task,
        }),
    ))
}

/// Unreadable bodies (empty, not JSON, wrong shape or content type) are
/// validation failures like any other bad payload
fn payload_error(rejection: JsonRejection) -> TasksError {
    TasksError::Validation(format!("Invalid task payload: {}", rejection.body_text()))
}

/// Extract or generate request ID
pub(crate) fn request_id(headers: &HeaderMap) -> String {
    headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}
