//! Bearer token verification.
//!
//! Token issuance (login, refresh) is owned by the external auth
//! service; this server only verifies `Authorization: Bearer <token>`
//! headers and extracts the caller identity.

mod extractor;

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

pub use extractor::{AuthUser, MaybeAuthUser};

use crate::error::{AppError, AppResult};

/// Claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: i32,
    pub email: String,
    pub role: String,
    pub exp: i64,
}

/// Verified caller identity attached to a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: i32,
    pub email: String,
    pub role: String,
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Identity {
            id: claims.id,
            email: claims.email,
            role: claims.role,
        }
    }
}

/// HS256 token verifier built once from configuration and shared via
/// `web::Data`.
#[derive(Clone)]
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    /// Build a verifier from the shared secret.
    pub fn new(secret: &SecretString) -> Self {
        JwtVerifier {
            key: DecodingKey::from_secret(secret.expose_secret().as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Verify signature and expiry, returning the caller identity.
    pub fn verify(&self, token: &str) -> AppResult<Identity> {
        let data = decode::<Claims>(token, &self.key, &self.validation)
            .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))?;

        Ok(data.claims.into())
    }
}

impl std::fmt::Debug for JwtVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "JwtVerifier([REDACTED])")
    }
}

/// Role gate: pure function of (identity, allowed-set).
pub fn require_role(identity: &Identity, allowed: &[&str]) -> AppResult<()> {
    if allowed.contains(&identity.role.as_str()) {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Insufficient role for this operation".to_string(),
        ))
    }
}

/// Extract the token from an Authorization header value. A bare token
/// without the `Bearer ` prefix is accepted for CI callers.
pub(crate) fn token_from_header(header: &str) -> &str {
    header.strip_prefix("Bearer ").unwrap_or(header)
}
