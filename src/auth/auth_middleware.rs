// Axum credential gate
//
// Unauthenticated -> Authenticated -> handler (store read/write) -> Responded.
// Every failure branch responds before the handler, and so before the store,
// is reached.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use std::time::Duration;

use crate::api::responses::ApiError;
use crate::api::CredentialVerifier;
use crate::auth::audit_logger::{AuditLogger, AuthEvent};
use crate::core::credential::Credential;
use crate::core::errors::TasksError;
use crate::core::models::{Principal, VerificationResult};

/// Authentication state containing all dependencies
#[derive(Clone)]
pub struct AuthState {
    pub verifier: Arc<dyn CredentialVerifier + Send + Sync>,
    pub audit_logger: Arc<AuditLogger>,
    pub verify_timeout: Duration,
}

impl AuthState {
    pub fn new(
        verifier: Arc<dyn CredentialVerifier + Send + Sync>,
        audit_logger: Arc<AuditLogger>,
        verify_timeout: Duration,
    ) -> Self {
        Self {
            verifier,
            audit_logger,
            verify_timeout,
        }
    }

    /// Resolve the caller behind `headers`.
    ///
    /// A missing or malformed bearer header fails locally without a network
    /// call. The verifier call is bounded by `verify_timeout` whatever the
    /// verifier implementation does; expiry counts as unreachable.
    pub async fn authenticate(
        &self,
        headers: &HeaderMap,
        request_id: &str,
    ) -> Result<Principal, TasksError> {
        let ip_address = extract_ip_address(headers);

        let credential = match Credential::from_headers(headers) {
            Some(credential) => credential,
            None => {
                self.audit_logger.log_auth_event(
                    &AuthEvent::CredentialMissing,
                    None,
                    request_id,
                    ip_address.as_deref(),
                );
                return Err(TasksError::AuthMissing);
            }
        };
        let fingerprint = credential.fingerprint();

        let result = match tokio::time::timeout(self.verify_timeout, self.verifier.verify(&credential)).await {
            Ok(result) => result,
            Err(_) => VerificationResult::Unreachable(format!(
                "verification timed out after {}ms",
                self.verify_timeout.as_millis()
            )),
        };

        let event = match &result {
            VerificationResult::Valid(principal) => AuthEvent::Verified {
                principal: principal.clone(),
            },
            VerificationResult::Invalid => AuthEvent::CredentialRejected,
            VerificationResult::Unreachable(reason) => AuthEvent::AuthorityUnreachable {
                reason: reason.clone(),
            },
        };
        self.audit_logger.log_auth_event(
            &event,
            Some(&fingerprint),
            request_id,
            ip_address.as_deref(),
        );

        result.into_principal()
    }
}

/// Authentication middleware function
///
/// Verifies the bearer credential and stores the resolved `Principal` in the
/// request extensions for handlers to use.
pub async fn require_credential(
    State(auth_state): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let request_id = crate::api::handlers::request_id(request.headers());

    let principal = auth_state
        .authenticate(request.headers(), &request_id)
        .await
        .map_err(|e| ApiError::from_tasks_error_with_id(e, request_id.clone()))?;

    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

/// Extract IP address from request headers
///
/// Checks `X-Forwarded-For` first (for proxied requests), then `X-Real-IP`.
fn extract_ip_address(headers: &HeaderMap) -> Option<String> {
    headers
        .get("X-Forwarded-For")
        .or_else(|| headers.get("X-Real-IP"))
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}
