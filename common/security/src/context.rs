use std::sync::Arc;

use axum::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::{request::Parts, HeaderMap};
use common_auth::{AuthContext, AuthError, Identity, JwtVerifier};
use common_http_errors::ApiError;
use tracing::Span;
use uuid::Uuid;

use crate::error::AuthzError;
use crate::policy::{ensure_allowed, Operation, Ownership};

pub const TRACE_HEADER: &str = "X-Trace-ID";

/// Verified identity plus the trace id errors are reported under.
#[derive(Debug, Clone)]
pub struct SecurityContext {
    pub identity: Identity,
    pub trace_id: Uuid,
}

impl SecurityContext {
    pub fn subject_id(&self) -> i64 {
        self.identity.subject_id
    }

    pub fn ensure(&self, op: Operation, target: Option<Ownership>) -> Result<(), AuthzError> {
        ensure_allowed(&self.identity, op, target)
    }
}

pub struct SecurityCtxExtractor(pub SecurityContext);

pub fn trace_id_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get(TRACE_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s.trim()).ok())
}

/// The caller's `X-Trace-ID`, or a fresh one when absent or malformed.
pub fn request_trace_id(headers: &HeaderMap) -> Uuid {
    trace_id_from_headers(headers).unwrap_or_else(Uuid::new_v4)
}

/// Authentication failures keep their code but are reported under the request's trace id.
pub fn auth_rejection(err: AuthError, trace_id: Uuid) -> ApiError {
    if err.status().is_server_error() {
        return ApiError::internal(err, Some(trace_id));
    }
    ApiError::Unauthorized {
        code: err.code(),
        trace_id: Some(trace_id),
        message: Some(err.to_string()),
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for SecurityCtxExtractor
where
    Arc<JwtVerifier>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let trace_id = request_trace_id(&parts.headers);
        let span = Span::current();
        span.record("trace_id", tracing::field::display(trace_id));

        let auth = AuthContext::from_request_parts(parts, state)
            .await
            .map_err(|err| auth_rejection(err, trace_id))?;
        span.record("subject_id", auth.identity.subject_id);

        Ok(SecurityCtxExtractor(SecurityContext {
            identity: auth.into_identity(),
            trace_id,
        }))
    }
}
