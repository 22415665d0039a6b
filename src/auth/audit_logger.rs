// Security event logging for the credential gate

use crate::core::credential::CredentialFingerprint;
use crate::core::models::Principal;
use tracing::{info, warn};

/// Authentication event type.
///
/// Callers only ever see one "not authenticated" outcome; this is where the
/// sub-cases stay distinguishable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    Verified { principal: Principal },
    CredentialMissing,
    CredentialRejected,
    AuthorityUnreachable { reason: String },
}

impl AuthEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            AuthEvent::Verified { .. } => "credential_verified",
            AuthEvent::CredentialMissing => "credential_missing",
            AuthEvent::CredentialRejected => "credential_rejected",
            AuthEvent::AuthorityUnreachable { .. } => "authority_unreachable",
        }
    }
}

/// Audit logger for gate decisions
#[derive(Debug, Default)]
pub struct AuditLogger;

impl AuditLogger {
    pub fn new() -> Self {
        Self
    }

    /// Log one gate decision with the credential fingerprint, never the credential
    pub fn log_auth_event(
        &self,
        event: &AuthEvent,
        fingerprint: Option<&CredentialFingerprint>,
        request_id: &str,
        ip_address: Option<&str>,
    ) {
        let fingerprint = fingerprint.map(|f| f.as_str());
        match event {
            AuthEvent::Verified { principal } => {
                info!(
                    target: "audit",
                    event = event.event_type(),
                    uid = %principal,
                    credential_fingerprint = ?fingerprint,
                    request_id = %request_id,
                    ip_address = ?ip_address,
                    "Authentication successful"
                );
            }
            AuthEvent::CredentialMissing | AuthEvent::CredentialRejected => {
                warn!(
                    target: "audit",
                    event = event.event_type(),
                    credential_fingerprint = ?fingerprint,
                    request_id = %request_id,
                    ip_address = ?ip_address,
                    "Authentication failed"
                );
            }
            AuthEvent::AuthorityUnreachable { reason } => {
                warn!(
                    target: "audit",
                    event = event.event_type(),
                    reason = %reason,
                    credential_fingerprint = ?fingerprint,
                    request_id = %request_id,
                    ip_address = ?ip_address,
                    "Authentication failed: authority unreachable"
                );
            }
        }
    }
}
