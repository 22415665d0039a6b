// Unit tests for configuration loading

use std::collections::HashMap;
use std::time::Duration;
use tasks_service::config::{AuthorityConfig, Config, GATE_TIMEOUT_MARGIN};
use tasks_service::core::errors::TasksError;
use tempfile::TempDir;

fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn base_vars(dir: &TempDir) -> HashMap<String, String> {
    vars(&[
        ("TASKS_FOLDER", dir.path().to_str().unwrap()),
        ("AUTH_ADDRESS", "auth-service.default"),
    ])
}

#[test]
fn test_defaults() {
    let dir = TempDir::new().unwrap();
    let config = Config::from_source(&base_vars(&dir)).unwrap();

    assert_eq!(config.bind_address, "0.0.0.0");
    assert_eq!(config.port, 8000);
    assert_eq!(config.tasks_file_path(), dir.path().join("tasks.txt"));
    assert_eq!(config.auth_timeout(), Duration::from_millis(3000));
    assert_eq!(config.log_format, "json");
}

#[test]
fn test_bare_service_name_becomes_http_url() {
    let dir = TempDir::new().unwrap();
    let config = Config::from_source(&base_vars(&dir)).unwrap();

    let url = config.auth_base_url().unwrap();
    assert_eq!(url.as_str(), "http://auth-service.default/");
}

#[test]
fn test_full_url_is_kept() {
    let dir = TempDir::new().unwrap();
    let mut source = base_vars(&dir);
    source.insert("AUTH_ADDRESS".to_string(), "https://auth.internal:8443/api/".to_string());

    let config = Config::from_source(&source).unwrap();
    assert_eq!(config.auth_base_url().unwrap().as_str(), "https://auth.internal:8443/api/");
}

#[test]
fn test_unsupported_auth_scheme() {
    let dir = TempDir::new().unwrap();
    let mut source = base_vars(&dir);
    source.insert("AUTH_ADDRESS".to_string(), "ftp://auth".to_string());

    assert!(matches!(
        Config::from_source(&source),
        Err(TasksError::ConfigurationError(_))
    ));
}

#[test]
fn test_missing_required_vars() {
    let dir = TempDir::new().unwrap();

    let no_folder = vars(&[("AUTH_ADDRESS", "auth")]);
    let err = Config::from_source(&no_folder).unwrap_err();
    assert!(err.to_string().contains("TASKS_FOLDER"));

    let no_auth = vars(&[("TASKS_FOLDER", dir.path().to_str().unwrap())]);
    let err = Config::from_source(&no_auth).unwrap_err();
    assert!(err.to_string().contains("AUTH_ADDRESS"));
}

#[test]
fn test_tasks_folder_must_exist() {
    let dir = TempDir::new().unwrap();
    let mut source = base_vars(&dir);
    source.insert(
        "TASKS_FOLDER".to_string(),
        dir.path().join("missing").to_str().unwrap().to_string(),
    );

    assert!(Config::from_source(&source).is_err());
}

#[test]
fn test_tasks_file_name_must_be_plain() {
    let dir = TempDir::new().unwrap();
    let mut source = base_vars(&dir);
    source.insert("TASKS_FILE_NAME".to_string(), "../escape.txt".to_string());

    assert!(Config::from_source(&source).is_err());
}

#[test]
fn test_overrides() {
    let dir = TempDir::new().unwrap();
    let mut source = base_vars(&dir);
    source.insert("PORT".to_string(), "9000".to_string());
    source.insert("AUTH_TIMEOUT_MS".to_string(), "250".to_string());
    source.insert("TASKS_FILE_NAME".to_string(), "todo.log".to_string());
    source.insert("LOG_FORMAT".to_string(), "text".to_string());

    let config = Config::from_source(&source).unwrap();
    assert_eq!(config.port, 9000);
    assert_eq!(config.auth_timeout(), Duration::from_millis(250));
    assert_eq!(config.tasks_file_path(), dir.path().join("todo.log"));
    assert_eq!(config.log_format, "text");
}

#[test]
fn test_zero_timeout_rejected() {
    let dir = TempDir::new().unwrap();
    let mut source = base_vars(&dir);
    source.insert("AUTH_TIMEOUT_MS".to_string(), "0".to_string());

    assert!(Config::from_source(&source).is_err());
}

#[test]
fn test_authority_defaults() {
    let config = AuthorityConfig::from_source(&vars(&[])).unwrap();
    assert_eq!(config.port, 80);
    assert_eq!(config.credentials.get("abc").map(String::as_str), Some("u1"));
}

#[test]
fn test_authority_credentials_override() {
    let config = AuthorityConfig::from_source(&vars(&[("AUTH_CREDENTIALS", "t1=alice,t2=bob")])).unwrap();
    assert_eq!(config.credentials.len(), 2);
    assert!(!config.credentials.contains_key("abc"));
}

#[test]
fn test_authority_bad_credentials() {
    assert!(AuthorityConfig::from_source(&vars(&[("AUTH_CREDENTIALS", "nouid")])).is_err());
}

#[test]
fn test_dot_file_names_rejected() {
    let dir = TempDir::new().unwrap();
    for name in [".", ".."] {
        let mut source = base_vars(&dir);
        source.insert("TASKS_FILE_NAME".to_string(), name.to_string());
        assert!(
            matches!(Config::from_source(&source), Err(TasksError::ConfigurationError(_))),
            "accepted {:?}",
            name
        );
    }
}

#[test]
fn test_gate_timeout_outlasts_client_timeout() {
    let dir = TempDir::new().unwrap();
    let config = Config::from_source(&base_vars(&dir)).unwrap();
    assert_eq!(config.gate_timeout(), config.auth_timeout() + GATE_TIMEOUT_MARGIN);
    assert!(config.gate_timeout() > config.auth_timeout());
}
