// Response types for API endpoints

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::core::errors::TasksError;
use crate::core::models::Task;

/// Response for `GET /tasks`
#[derive(Debug, Serialize)]
pub struct TasksResponse {
    pub message: String,
    pub tasks: Vec<Task>,
}

/// Response for `POST /tasks`
#[derive(Debug, Serialize)]
pub struct CreatedTaskResponse {
    pub message: String,
    #[serde(rename = "createdTask")]
    pub created_task: Task,
}

/// Error response structure
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// API error type that converts domain errors to HTTP responses
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub request_id: Option<String>,
}

impl ApiError {
    /// Create from TasksError
    pub fn from_tasks_error(err: TasksError) -> Self {
        let status = StatusCode::from_u16(err.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self {
            status,
            message: err.user_message(),
            request_id: None,
        }
    }

    /// Create from TasksError with request ID
    pub fn from_tasks_error_with_id(err: TasksError, request_id: String) -> Self {
        Self {
            request_id: Some(request_id),
            ..Self::from_tasks_error(err)
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            message: self.message,
            request_id: self.request_id,
        });
        (self.status, body).into_response()
    }
}
