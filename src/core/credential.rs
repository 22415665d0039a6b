// Bearer credential wrapper and header extraction

use axum::http::{header, HeaderMap};
use secrecy::{ExposeSecret, Secret};
use sha2::{Digest, Sha256};
use std::fmt;

/// Length of the hex fingerprint emitted in logs
const FINGERPRINT_LEN: usize = 16;

/// Short SHA-256 fingerprint of a credential, safe to log
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CredentialFingerprint(String);

impl CredentialFingerprint {
    /// Fingerprint a raw credential string.
    ///
    /// Deterministic: the same credential always yields the same fingerprint,
    /// which lets operators correlate failures without seeing the token.
    pub fn from_credential(credential: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(credential.as_bytes());
        let digest = hex::encode(hasher.finalize());
        Self(digest[..FINGERPRINT_LEN].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CredentialFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque bearer credential.
///
/// Held in `secrecy::Secret` so it never ends up in a log line by accident.
pub struct Credential(Secret<String>);

impl Credential {
    pub fn new(credential: &str) -> Self {
        Self(Secret::new(credential.to_string()))
    }

    /// Extract a credential from an `Authorization: Bearer <token>` header.
    ///
    /// Returns `None` for a missing header, a non-bearer scheme or an empty token.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
        Self::from_authorization(value)
    }

    /// Parse the value of an `Authorization` header
    pub fn from_authorization(value: &str) -> Option<Self> {
        let (scheme, token) = value.trim().split_once(' ')?;
        if !scheme.eq_ignore_ascii_case("bearer") {
            return None;
        }

        let token = token.trim();
        if token.is_empty() || token.contains(char::is_whitespace) {
            return None;
        }

        Some(Self::new(token))
    }

    pub fn fingerprint(&self) -> CredentialFingerprint {
        CredentialFingerprint::from_credential(self.expose_secret())
    }

    /// Expose the raw credential (only for forwarding to the authority)
    pub fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"<REDACTED>")
            .finish()
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<REDACTED>")
    }
}
