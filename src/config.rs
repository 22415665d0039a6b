// Configuration management

use crate::auth::authority::parse_credentials;
use crate::core::errors::TasksError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Slack between the verifier client timeout and the gate timeout
pub const GATE_TIMEOUT_MARGIN: Duration = Duration::from_millis(100);

/// Tasks service configuration loaded from environment variables
///
/// All configuration is validated on load with clear error messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Server configuration
    pub bind_address: String,
    pub port: u16,

    // Task log location
    pub tasks_folder: PathBuf,
    pub tasks_file_name: String,

    // Authority configuration
    pub auth_address: String,
    pub auth_timeout_ms: u64,

    // Middleware configuration
    pub request_timeout_secs: u64,
    pub body_size_limit_bytes: usize,

    // Logging configuration
    pub log_level: String,
    pub log_format: String, // "json" or "text"
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Supports `.env` file loading in development (via dotenv crate).
    pub fn from_env() -> Result<Self, TasksError> {
        #[cfg(not(test))]
        {
            dotenv::dotenv().ok(); // Ignore errors (file may not exist)
        }

        Self::from_source(&EnvSource)
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_source(source: &dyn VarSource) -> Result<Self, TasksError> {
        let config = Self {
            bind_address: get_or_default(source, "BIND_ADDRESS", "0.0.0.0"),
            port: parse_port(source, 8000)?,
            tasks_folder: get_required_path(source, "TASKS_FOLDER")?,
            tasks_file_name: get_or_default(source, "TASKS_FILE_NAME", "tasks.txt"),
            auth_address: get_required(source, "AUTH_ADDRESS")?,
            auth_timeout_ms: parse_or_default(source, "AUTH_TIMEOUT_MS", 3000)?,
            request_timeout_secs: parse_or_default(source, "REQUEST_TIMEOUT_SECS", 30)?,
            body_size_limit_bytes: parse_or_default(source, "BODY_SIZE_LIMIT_BYTES", 64 * 1024)?,
            log_level: get_or_default(source, "LOG_LEVEL", "info"),
            log_format: get_or_default(source, "LOG_FORMAT", "json"),
        };

        config.validate()?;
        Ok(config)
    }

    /// Full path of the task log
    pub fn tasks_file_path(&self) -> PathBuf {
        self.tasks_folder.join(&self.tasks_file_name)
    }

    pub fn auth_timeout(&self) -> Duration {
        Duration::from_millis(self.auth_timeout_ms)
    }

    /// Bound applied by the credential gate. Longer than `auth_timeout` so the
    /// client's own timeout fires first and is counted by the circuit breaker.
    pub fn gate_timeout(&self) -> Duration {
        self.auth_timeout() + GATE_TIMEOUT_MARGIN
    }

    /// Authority base URL.
    ///
    /// Accepts a bare `host[:port]` (service DNS name) or a full http(s) URL.
    pub fn auth_base_url(&self) -> Result<Url, TasksError> {
        let raw = if self.auth_address.contains("://") {
            self.auth_address.clone()
        } else {
            format!("http://{}", self.auth_address)
        };

        let url = Url::parse(&raw).map_err(|e| {
            TasksError::ConfigurationError(format!(
                "Invalid AUTH_ADDRESS '{}': {}",
                self.auth_address, e
            ))
        })?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(TasksError::ConfigurationError(format!(
                "Invalid AUTH_ADDRESS '{}': scheme must be http or https",
                self.auth_address
            )));
        }

        Ok(url)
    }

    /// Validate all configuration values
    fn validate(&self) -> Result<(), TasksError> {
        validate_dir_path(&self.tasks_folder, "Tasks folder")?;

        if matches!(self.tasks_file_name.as_str(), "" | "." | "..")
            || self.tasks_file_name.contains('/')
            || self.tasks_file_name.contains('\\')
        {
            return Err(TasksError::ConfigurationError(format!(
                "Invalid TASKS_FILE_NAME '{}': must be a plain file name",
                self.tasks_file_name
            )));
        }

        self.auth_base_url()?;
        validate_log_level(&self.log_level)?;
        validate_log_format(&self.log_format)?;

        Ok(())
    }

    /// Create a test configuration for unit tests
    ///
    /// This bypasses environment variable loading and path validation.
    pub fn test_config() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 8000,
            tasks_folder: env::temp_dir(),
            tasks_file_name: "tasks.txt".to_string(),
            auth_address: "127.0.0.1:80".to_string(),
            auth_timeout_ms: 3000,
            request_timeout_secs: 30,
            body_size_limit_bytes: 64 * 1024,
            log_level: "info".to_string(),
            log_format: "json".to_string(),
        }
    }
}

/// Authentication authority configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorityConfig {
    pub bind_address: String,
    pub port: u16,
    /// token -> uid
    pub credentials: HashMap<String, String>,
    pub log_level: String,
    pub log_format: String,
}

impl AuthorityConfig {
    pub fn from_env() -> Result<Self, TasksError> {
        #[cfg(not(test))]
        {
            dotenv::dotenv().ok();
        }

        Self::from_source(&EnvSource)
    }

    pub fn from_source(source: &dyn VarSource) -> Result<Self, TasksError> {
        let config = Self {
            bind_address: get_or_default(source, "BIND_ADDRESS", "0.0.0.0"),
            port: parse_port(source, 80)?,
            credentials: parse_credentials(&get_or_default(source, "AUTH_CREDENTIALS", "abc=u1"))?,
            log_level: get_or_default(source, "LOG_LEVEL", "info"),
            log_format: get_or_default(source, "LOG_FORMAT", "json"),
        };

        validate_log_level(&config.log_level)?;
        validate_log_format(&config.log_format)?;
        Ok(config)
    }
}

/// Where configuration values come from
pub trait VarSource {
    fn var(&self, key: &str) -> Option<String>;
}

/// Process environment
pub struct EnvSource;

impl VarSource for EnvSource {
    fn var(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }
}

impl VarSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Get variable or return default value; empty counts as unset
fn get_or_default(source: &dyn VarSource, key: &str, default: &str) -> String {
    match source.var(key) {
        Some(value) if !value.is_empty() => value,
        _ => default.to_string(),
    }
}

fn get_required(source: &dyn VarSource, key: &str) -> Result<String, TasksError> {
    match source.var(key) {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        Some(_) => Err(TasksError::ConfigurationError(format!("{} is empty", key))),
        None => Err(TasksError::ConfigurationError(format!("{} not set", key))),
    }
}

fn get_required_path(source: &dyn VarSource, key: &str) -> Result<PathBuf, TasksError> {
    get_required(source, key).map(PathBuf::from)
}

/// Parse port from PORT
fn parse_port(source: &dyn VarSource, default: u16) -> Result<u16, TasksError> {
    let port = match source.var("PORT") {
        Some(value) => value.parse::<u16>().map_err(|e| {
            TasksError::ConfigurationError(format!("Invalid PORT value '{}': {}", value, e))
        })?,
        None => default,
    };

    if port == 0 {
        return Err(TasksError::ConfigurationError(
            "PORT must be between 1 and 65535".to_string(),
        ));
    }

    Ok(port)
}

/// Parse a positive integer or return default
fn parse_or_default<T>(source: &dyn VarSource, key: &str, default: T) -> Result<T, TasksError>
where
    T: std::str::FromStr + PartialEq + Default,
    T::Err: std::fmt::Display,
{
    match source.var(key) {
        Some(value) => {
            let parsed = value.parse::<T>().map_err(|e| {
                TasksError::ConfigurationError(format!("Invalid {} value '{}': {}", key, value, e))
            })?;

            if parsed == T::default() {
                return Err(TasksError::ConfigurationError(format!(
                    "{} must be greater than 0",
                    key
                )));
            }

            Ok(parsed)
        }
        None => Ok(default),
    }
}

/// Validate that a directory exists
fn validate_dir_path(path: &Path, description: &str) -> Result<(), TasksError> {
    if !path.exists() {
        return Err(TasksError::ConfigurationError(format!(
            "{} not found at {:?}",
            description, path
        )));
    }

    if !path.is_dir() {
        return Err(TasksError::ConfigurationError(format!(
            "{} is not a directory: {:?}",
            description, path
        )));
    }

    Ok(())
}

/// Validate log level
fn validate_log_level(level: &str) -> Result<(), TasksError> {
    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&level.to_lowercase().as_str()) {
        return Err(TasksError::ConfigurationError(format!(
            "Invalid LOG_LEVEL '{}': must be one of {}",
            level,
            valid_levels.join(", ")
        )));
    }
    Ok(())
}

/// Validate log format
fn validate_log_format(format: &str) -> Result<(), TasksError> {
    if format != "json" && format != "text" {
        return Err(TasksError::ConfigurationError(format!(
            "Invalid LOG_FORMAT '{}': must be 'json' or 'text'",
            format
        )));
    }
    Ok(())
}
