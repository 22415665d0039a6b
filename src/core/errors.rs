// Domain error types - callers see a category, operators see the cause

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the tasks service
#[derive(Error, Debug)]
pub enum TasksError {
    /// No bearer credential on the request (HTTP 401, no network call made)
    #[error("No credential provided")]
    AuthMissing,

    /// The authority explicitly rejected the credential (HTTP 401)
    #[error("Credential rejected by authority")]
    AuthInvalid,

    /// The authority could not be consulted (HTTP 401, fail-closed)
    #[error("Authority unreachable: {0}")]
    AuthUnreachable(String),

    /// Backing file could not be appended to (HTTP 500)
    #[error("Failed to append to task log {}: {source}", path.display())]
    StoreWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Backing file exists but could not be read (HTTP 500)
    #[error("Failed to read task log {}: {source}", path.display())]
    StoreRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A stored chunk could not be decoded (HTTP 500)
    #[error("Corrupt record #{index} at byte offset {offset}: {reason}")]
    StoreCorruption {
        index: usize,
        offset: usize,
        reason: String,
    },

    /// Malformed caller input (HTTP 422)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error (HTTP 500)
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl TasksError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            TasksError::AuthMissing => 401,
            TasksError::AuthInvalid => 401,
            TasksError::AuthUnreachable(_) => 401,
            TasksError::StoreWrite { .. } => 500,
            TasksError::StoreRead { .. } => 500,
            TasksError::StoreCorruption { .. } => 500,
            TasksError::Validation(_) => 422,
            TasksError::ConfigurationError(_) => 500,
        }
    }

    /// Get user-facing message.
    ///
    /// The three authentication failures share one message so a caller cannot
    /// tell a missing credential from a rejected one or from an outage.
    pub fn user_message(&self) -> String {
        match self {
            TasksError::AuthMissing
            | TasksError::AuthInvalid
            | TasksError::AuthUnreachable(_) => "Could not verify token.".to_string(),
            TasksError::StoreWrite { .. } => "Storing the task failed.".to_string(),
            TasksError::StoreRead { .. } | TasksError::StoreCorruption { .. } => {
                "Loading the tasks failed.".to_string()
            }
            TasksError::Validation(msg) => msg.clone(),
            TasksError::ConfigurationError(_) => "Internal error".to_string(),
        }
    }

    /// True for the gating failures (missing, rejected, unreachable)
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            TasksError::AuthMissing | TasksError::AuthInvalid | TasksError::AuthUnreachable(_)
        )
    }
}
