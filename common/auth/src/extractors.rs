use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::{header::AUTHORIZATION, request::Parts, HeaderMap};

use crate::claims::Identity;
use crate::error::{AuthError, AuthResult};
use crate::verifier::JwtVerifier;

const BEARER: &str = "bearer";

/// Caller identity proven by the `Authorization: Bearer` token. The raw token is not retained.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub identity: Identity,
}

impl AuthContext {
    pub fn into_identity(self) -> Identity {
        self.identity
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    Arc<JwtVerifier>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;
        let identity = Arc::<JwtVerifier>::from_ref(state).verify(token)?;
        Ok(Self { identity })
    }
}

/// Scheme name is matched case-insensitively; anything but `<scheme> <token>` is malformed.
fn bearer_token(headers: &HeaderMap) -> AuthResult<&str> {
    let raw = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthorization)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthorization)?;

    match raw.trim().split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case(BEARER) && !token.trim().is_empty() => {
            Ok(token.trim())
        }
        _ => Err(AuthError::InvalidAuthorization),
    }
}
