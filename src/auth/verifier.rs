// HTTP client for the authority's verification endpoint

use crate::api::CredentialVerifier;
use crate::core::credential::Credential;
use crate::core::errors::TasksError;
use crate::core::models::{Principal, VerificationResult, VerifyTokenResponse};
use crate::core::resilience::{create_circuit_breaker, execute_with_cb, AuthorityCircuitBreaker, Guarded};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Upper bound on TCP connect, independent of the total timeout
const MAX_CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// Verifies bearer credentials with `GET {base}/verify-token/{credential}`.
///
/// One attempt per call, bounded by `timeout`. Transport failures feed a
/// circuit breaker; while it is open calls fail as `Unreachable` immediately.
pub struct HttpCredentialVerifier {
    http_client: Client,
    base_url: Url,
    timeout: Duration,
    cb: AuthorityCircuitBreaker,
}

impl HttpCredentialVerifier {
    /// Create a verifier for the authority at `base_url`
    ///
    /// # Arguments
    /// * `base_url` - authority root, e.g. `http://auth-service.default/`
    /// * `timeout` - total budget for one verification round-trip
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, TasksError> {
        if base_url.cannot_be_a_base() {
            return Err(TasksError::ConfigurationError(format!(
                "Authority URL '{}' cannot carry a path",
                base_url
            )));
        }

        let http_client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(MAX_CONNECT_TIMEOUT))
            .tcp_nodelay(true)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| {
                TasksError::ConfigurationError(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            http_client,
            base_url,
            timeout,
            cb: create_circuit_breaker(),
        })
    }

    /// Build the verification URL with the credential as one encoded path segment
    pub(crate) fn verify_url(&self, credential: &Credential) -> Result<Url, String> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| "authority URL cannot carry a path".to_string())?
            .pop_if_empty()
            .push("verify-token")
            .push(credential.expose_secret());
        Ok(url)
    }

    /// One round-trip. `Err` is a transport-level failure and counts
    /// against the circuit breaker; an explicit rejection is `Ok(Invalid)`.
    async fn verify_once(&self, credential: &Credential) -> Result<VerificationResult, String> {
        let url = self.verify_url(credential)?;

        let response = self.http_client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                format!("request timed out after {}ms", self.timeout.as_millis())
            } else if e.is_connect() {
                format!("connection failed: {}", e)
            } else {
                format!("request failed: {}", e)
            }
        })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Ok(VerificationResult::Invalid);
        }
        if !status.is_success() {
            return Err(format!("unexpected authority status {}", status));
        }

        let body: VerifyTokenResponse = response
            .json()
            .await
            .map_err(|e| format!("malformed authority response: {}", e))?;

        if body.uid.trim().is_empty() {
            return Err("malformed authority response: empty uid".to_string());
        }

        Ok(VerificationResult::Valid(Principal::new(body.uid)))
    }
}

#[async_trait]
impl CredentialVerifier for HttpCredentialVerifier {
    async fn verify(&self, credential: &Credential) -> VerificationResult {
        let fingerprint = credential.fingerprint();

        match execute_with_cb(&self.cb, || self.verify_once(credential)).await {
            Guarded::Completed(result) => {
                debug!(
                    credential_fingerprint = %fingerprint,
                    valid = matches!(result, VerificationResult::Valid(_)),
                    "Authority answered"
                );
                result
            }
            Guarded::Failed(reason) => {
                warn!(
                    credential_fingerprint = %fingerprint,
                    reason = %reason,
                    "Authority call failed"
                );
                VerificationResult::Unreachable(reason)
            }
            Guarded::Rejected => {
                warn!(
                    credential_fingerprint = %fingerprint,
                    "Authority circuit open, skipping call"
                );
                VerificationResult::Unreachable("circuit breaker open".to_string())
            }
        }
    }
}
