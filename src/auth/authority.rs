// Authentication authority: credential -> principal oracle
//
// Tokens are opaque strings checked against an in-memory table. There is no
// expiry, refresh or revocation; a real deployment swaps in signed tokens
// behind the same /verify-token contract.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use subtle::ConstantTimeEq;
use tracing::{info, warn};

use crate::core::credential::CredentialFingerprint;
use crate::core::errors::TasksError;
use crate::core::models::{Principal, RejectionResponse, VerifyTokenResponse};

/// Registry of issued credentials
#[derive(Debug, Default)]
pub struct CredentialRegistry {
    entries: RwLock<Vec<(String, Principal)>>,
}

impl CredentialRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from `token -> uid` pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let registry = Self::new();
        for (token, uid) in pairs {
            registry.register(token, Principal::new(uid));
        }
        registry
    }

    /// Register or replace a credential
    pub fn register(&self, token: impl Into<String>, principal: Principal) {
        let token = token.into();
        let mut entries = match self.entries.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.retain(|(existing, _)| existing != &token);
        entries.push((token, principal));
    }

    /// Resolve a credential to its principal.
    ///
    /// Every entry is compared in constant time and the scan never stops
    /// early, so response timing does not reveal how close a guess was.
    pub fn resolve(&self, token: &str) -> Option<Principal> {
        let entries = match self.entries.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let mut found = None;
        for (candidate, principal) in entries.iter() {
            let matches: bool = candidate.as_bytes().ct_eq(token.as_bytes()).into();
            if matches && found.is_none() {
                found = Some(principal.clone());
            }
        }
        found
    }

    pub fn len(&self) -> usize {
        match self.entries.read() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Parse `token=uid` pairs separated by commas, e.g. `abc=u1,def=u2`
pub fn parse_credentials(raw: &str) -> Result<HashMap<String, String>, TasksError> {
    let mut credentials = HashMap::new();

    for pair in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (token, uid) = pair.split_once('=').ok_or_else(|| {
            TasksError::ConfigurationError(format!(
                "Invalid credential entry '{}': expected token=uid",
                pair
            ))
        })?;

        let (token, uid) = (token.trim(), uid.trim());
        if token.is_empty() || uid.is_empty() {
            return Err(TasksError::ConfigurationError(format!(
                "Invalid credential entry '{}': token and uid must be non-empty",
                pair
            )));
        }

        credentials.insert(token.to_string(), uid.to_string());
    }

    if credentials.is_empty() {
        return Err(TasksError::ConfigurationError(
            "At least one credential must be configured".to_string(),
        ));
    }

    Ok(credentials)
}

/// Router exposing `GET /verify-token/:token`
pub fn create_authority_router(registry: Arc<CredentialRegistry>) -> Router {
    Router::new()
        .route("/verify-token/:token", get(verify_token_handler))
        .with_state(registry)
}

/// GET /verify-token/:token
pub async fn verify_token_handler(
    State(registry): State<Arc<CredentialRegistry>>,
    Path(token): Path<String>,
) -> Response {
    let fingerprint = CredentialFingerprint::from_credential(&token);

    match registry.resolve(&token) {
        Some(principal) => {
            info!(credential_fingerprint = %fingerprint, uid = %principal, "Token verified");
            (
                StatusCode::OK,
                Json(VerifyTokenResponse {
                    message: "Valid token.".to_string(),
                    uid: principal.uid().to_string(),
                }),
            )
                .into_response()
        }
        None => {
            warn!(credential_fingerprint = %fingerprint, "Token rejected");
            (
                StatusCode::UNAUTHORIZED,
                Json(RejectionResponse {
                    message: "Token invalid.".to_string(),
                }),
            )
                .into_response()
        }
    }
}
