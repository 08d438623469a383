//! Actix-web extractors for bearer token authentication.
//!
//! The request moves through a fixed ladder: no header -> rejected (or
//! anonymous for the optional extractor); header present -> verified;
//! verified -> identity attached. Role checks compose afterwards via
//! `require_role`.

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, web};
use std::future::{Ready, ready};

use super::{Identity, JwtVerifier, token_from_header};
use crate::error::AppError;

/// Read the Authorization header as a UTF-8 string, if present.
fn authorization_header(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
}

/// Fetch the shared verifier from app data.
fn verifier(req: &HttpRequest) -> Result<&web::Data<JwtVerifier>, AppError> {
    req.app_data::<web::Data<JwtVerifier>>()
        .ok_or_else(|| AppError::Store("JWT verifier not configured".to_string()))
}

/// Extractor that requires a valid bearer token.
///
/// Use this in handlers that require authentication:
/// ```ignore
/// async fn protected_handler(auth: AuthUser) -> impl Responder {
///     // auth.identity is the verified caller
/// }
/// ```
pub struct AuthUser {
    pub identity: Identity,
}

impl FromRequest for AuthUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = (|| {
            let verifier = verifier(req)?;
            let header = authorization_header(req).ok_or_else(|| {
                AppError::Unauthorized("Missing Authorization header".to_string())
            })?;
            let identity = verifier.verify(token_from_header(header))?;
            Ok(AuthUser { identity })
        })();

        if let Err(ref e) = result {
            tracing::warn!(path = %req.path(), "Authentication failed: {}", e);
        }

        ready(result)
    }
}

/// Extractor that attaches an identity when a valid token is present
/// and passes through anonymously otherwise. Never rejects.
pub struct MaybeAuthUser {
    pub identity: Option<Identity>,
}

impl FromRequest for MaybeAuthUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let identity = verifier(req).ok().and_then(|v| {
            authorization_header(req).and_then(|h| v.verify(token_from_header(h)).ok())
        });

        ready(Ok(MaybeAuthUser { identity }))
    }
}
