// Domain models for the task log and credential verification

use crate::core::errors::TasksError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One record in the task log.
///
/// Field order is the on-disk order: `{"title":..,"text":..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub title: String,
    pub text: String,
}

impl Task {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
        }
    }
}

/// Body of `POST /tasks`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTaskRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

impl CreateTaskRequest {
    /// Validate the payload and turn it into a storable task.
    ///
    /// A title is mandatory; a missing body is stored as an empty string.
    pub fn into_task(self) -> Result<Task, TasksError> {
        let title = match self.title {
            Some(title) if !title.trim().is_empty() => title,
            _ => {
                return Err(TasksError::Validation(
                    "A task title needs to be specified.".to_string(),
                ))
            }
        };

        Ok(Task {
            title,
            text: self.text.unwrap_or_default(),
        })
    }
}

/// Identity resolved by the authority for a valid credential
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Principal(String);

impl Principal {
    pub fn new(uid: impl Into<String>) -> Self {
        Self(uid.into())
    }

    pub fn uid(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome of one verification attempt against the authority
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationResult {
    Valid(Principal),
    Invalid,
    /// Transport failure, timeout, open circuit or malformed reply
    Unreachable(String),
}

impl VerificationResult {
    /// Collapse into the gate's error taxonomy
    pub fn into_principal(self) -> Result<Principal, TasksError> {
        match self {
            VerificationResult::Valid(principal) => Ok(principal),
            VerificationResult::Invalid => Err(TasksError::AuthInvalid),
            VerificationResult::Unreachable(reason) => Err(TasksError::AuthUnreachable(reason)),
        }
    }
}

/// Authority reply for an accepted credential
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyTokenResponse {
    #[serde(default)]
    pub message: String,
    pub uid: String,
}

/// Authority reply for a rejected credential
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectionResponse {
    pub message: String,
}
