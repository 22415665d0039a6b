// Full request path through the gate into a file-backed task log

use axum::http::StatusCode;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tasks_service::store::TaskLog;
use tempfile::TempDir;
use tower::ServiceExt;

use crate::common::*;

const VERIFY_TIMEOUT: Duration = Duration::from_secs(1);

fn app_with_log(dir: &TempDir) -> axum::Router {
    let log = Arc::new(TaskLog::new(dir.path().join("tasks.txt")));
    create_test_app(log, Arc::new(StaticVerifier::with_default_token()), VERIFY_TIMEOUT)
}

#[tokio::test]
async fn test_store_then_list_in_order() {
    let dir = TempDir::new().unwrap();
    let app = app_with_log(&dir);

    let response = app
        .clone()
        .oneshot(get_tasks_request(Some("abc")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["message"], "Tasks loaded.");
    assert_eq!(body["tasks"], json!([]));

    for (title, text) in [("first", "a"), ("second", "b")] {
        let response = app
            .clone()
            .oneshot(post_task_request(Some("abc"), json!({"title": title, "text": text})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = read_json(response).await;
        assert_eq!(body["message"], "Task stored.");
        assert_eq!(body["createdTask"]["title"], title);
    }

    let response = app.oneshot(get_tasks_request(Some("abc"))).await.unwrap();
    let body = read_json(response).await;
    assert_eq!(
        body["tasks"],
        json!([
            {"title": "first", "text": "a"},
            {"title": "second", "text": "b"}
        ])
    );
}

#[tokio::test]
async fn test_blank_title_is_unprocessable() {
    let dir = TempDir::new().unwrap();
    let app = app_with_log(&dir);

    let response = app
        .clone()
        .oneshot(post_task_request(Some("abc"), json!({"title": "  ", "text": "x"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = app.oneshot(get_tasks_request(Some("abc"))).await.unwrap();
    assert_eq!(read_json(response).await["tasks"], json!([]));
}

#[tokio::test]
async fn test_store_failure_is_server_error_not_auth_error() {
    let store = Arc::new(CountingTaskStore {
        append_should_fail: true,
        read_should_fail: true,
        ..Default::default()
    });
    let app = create_test_app(
        store.clone(),
        Arc::new(StaticVerifier::with_default_token()),
        VERIFY_TIMEOUT,
    );

    let response = app
        .clone()
        .oneshot(post_task_request(Some("abc"), json!({"title": "t", "text": "x"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_json(response).await;
    assert_eq!(body["message"], "Storing the task failed.");
    assert!(!body["message"].as_str().unwrap().contains("/data"));

    let response = app.oneshot(get_tasks_request(Some("abc"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(read_json(response).await["message"], "Loading the tasks failed.");

    assert_eq!(store.accesses(), 2);
}

#[tokio::test]
async fn test_corrupt_log_fails_listing() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("tasks.txt"),
        r#"{"title":"ok","text":""}TASK_SPLIT{"title":"#,
    )
    .unwrap();
    let app = app_with_log(&dir);

    let response = app.oneshot(get_tasks_request(Some("abc"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

fn raw_post(content_type: Option<&str>, body: &'static str) -> axum::http::Request<axum::body::Body> {
    let mut builder = axum::http::Request::builder()
        .method("POST")
        .uri("/tasks")
        .header("Authorization", "Bearer abc");
    if let Some(content_type) = content_type {
        builder = builder.header("Content-Type", content_type);
    }
    builder.body(axum::body::Body::from(body)).unwrap()
}

#[tokio::test]
async fn test_unreadable_payloads_are_validation_errors() {
    let dir = TempDir::new().unwrap();
    let app = app_with_log(&dir);

    let cases = [
        (Some("application/json"), ""),
        (Some("application/json"), "{\"title\": "),
        (Some("application/json"), r#"{"title": 5}"#),
        (None, r#"{"title": "t"}"#),
    ];

    for (content_type, body) in cases {
        let response = app
            .clone()
            .oneshot(raw_post(content_type, body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY, "body: {:?}", body);

        let json = read_json(response).await;
        assert!(json["message"].as_str().unwrap().starts_with("Invalid task payload"));
        assert!(json["request_id"].is_string());
    }

    let response = app.oneshot(get_tasks_request(Some("abc"))).await.unwrap();
    assert_eq!(read_json(response).await["tasks"], json!([]));
}
