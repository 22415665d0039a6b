// Axum web server layer

use axum::{error_handling::HandleErrorLayer, http::StatusCode, BoxError, Router};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;

pub mod handlers;
pub mod middleware;
pub mod responses;

use crate::auth::auth_middleware::{require_credential, AuthState};
use crate::core::credential::Credential;
use crate::core::errors::TasksError;
use crate::core::models::{Task, VerificationResult};

/// Re-export Config from config module
pub use crate::config::Config;

/// Application state shared by the gated handlers.
///
/// The verifier lives in `AuthState`; handlers only run after the auth
/// middleware has admitted the request.
#[derive(Clone)]
pub struct AppState {
    pub task_store: Arc<dyn TaskStore + Send + Sync>,
    pub config: Arc<Config>,
}

/// Append-only record store seen by the handlers
#[async_trait::async_trait]
pub trait TaskStore: Send + Sync {
    async fn append(&self, task: &Task) -> Result<(), TasksError>;
    async fn read_all(&self) -> Result<Vec<Task>, TasksError>;
}

/// Client side of the authority's verification endpoint.
///
/// Infallible by signature: every failure mode is a `VerificationResult`.
#[async_trait::async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn verify(&self, credential: &Credential) -> VerificationResult;
}

/// Create the Axum router for the tasks service
///
/// Middleware stack (outermost to innermost):
/// - CORS (answers preflight before routing)
/// - Tracing (tower-http::trace)
/// - Request timeout (tower::timeout) with HandleErrorLayer
/// - Body size limit (tower-http::limit)
/// - Credential gate (route_layer, runs before any extractor of the handler)
pub fn create_router(app_state: &AppState, auth_state: Arc<AuthState>) -> Router<AppState> {
    let router = Router::new()
        .route(
            "/tasks",
            axum::routing::get(handlers::list_tasks_handler).post(handlers::create_task_handler),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            auth_state,
            require_credential,
        ));

    let body_limit = app_state.config.body_size_limit_bytes;
    let timeout_secs = app_state.config.request_timeout_secs;

    let router = router.layer(middleware::body_size_limit_layer(body_limit));

    // HandleErrorLayer must come BEFORE timeout to catch the timeout error
    let timeout_stack = ServiceBuilder::new()
        .layer(HandleErrorLayer::new(|e: BoxError| async move {
            let status = if e.is::<tower::timeout::error::Elapsed>() {
                StatusCode::REQUEST_TIMEOUT
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            (status, e.to_string())
        }))
        .timeout(Duration::from_secs(timeout_secs))
        .into_inner();

    router
        .layer(timeout_stack)
        .layer(middleware::tracing_layer())
        .layer(middleware::cors_layer())
}
