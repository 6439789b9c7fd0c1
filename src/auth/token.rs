use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, errors::ErrorKind};
use serde::{Deserialize, Serialize};

use crate::errors::auth_error::{AuthError, AuthResult};

/// Claims carried by a relay handshake credential
///
/// `sub` identifies the user the connection belongs to; `exp` is a Unix
/// timestamp after which the credential is rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayClaims {
    /// Subject - the authenticated user identifier
    pub sub: String,
    /// Expiration time - Unix timestamp when the credential expires
    pub exp: i64,
}

/// Verifies relay handshake credentials against a shared secret
///
/// The secret is passed in at construction rather than read from a global,
/// so tests can build a verifier around a throwaway key.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    /// Create a verifier for HS256 tokens signed with `secret`
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Verify a credential and return its claims
    ///
    /// Malformed tokens, bad signatures, and missing claims map to
    /// [`AuthError::InvalidCredential`]; expiry maps to
    /// [`AuthError::ExpiredCredential`].
    pub fn verify(&self, token: &str) -> AuthResult<RelayClaims> {
        decode::<RelayClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::ExpiredCredential,
                _ => AuthError::InvalidCredential(e.to_string()),
            })
    }
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The decoding key must never appear in logs
        f.debug_struct("TokenVerifier").finish_non_exhaustive()
    }
}
