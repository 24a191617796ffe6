//! Request extractors whose rejections use the service's JSON error envelope.

use std::convert::Infallible;

use axum::async_trait;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::Json;
use common_http_errors::ApiError;
use common_security::request_trace_id;
use serde::de::DeserializeOwned;
use tracing::{debug, Span};
use uuid::Uuid;

/// Trace id for routes that run without a [`common_security::SecurityContext`].
#[derive(Debug, Clone, Copy)]
pub struct TraceId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for TraceId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let trace_id = request_trace_id(&parts.headers);
        Span::current().record("trace_id", tracing::field::display(trace_id));
        Ok(TraceId(trace_id))
    }
}

/// `axum::Json` with malformed bodies reported as 400 `invalid_body`.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let trace_id = request_trace_id(req.headers());
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(json_rejection(rejection, trace_id)),
        }
    }
}

/// `axum::extract::Path` with unparseable segments reported as 400 `invalid_path`.
#[derive(Debug)]
pub struct PathParam<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for PathParam<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let trace_id = request_trace_id(&parts.headers);
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(PathParam(value)),
            Err(rejection) => Err(path_rejection(rejection, trace_id)),
        }
    }
}

fn json_rejection(rejection: JsonRejection, trace_id: Uuid) -> ApiError {
    debug!(%rejection, %trace_id, "rejected request body");
    match rejection {
        JsonRejection::MissingJsonContentType(_) => ApiError::bad_request(
            "invalid_content_type",
            "Expected `Content-Type: application/json`",
            Some(trace_id),
        ),
        other => ApiError::bad_request("invalid_body", other.body_text(), Some(trace_id)),
    }
}

fn path_rejection(rejection: PathRejection, trace_id: Uuid) -> ApiError {
    match rejection {
        PathRejection::FailedToDeserializePathParams(err) => {
            ApiError::bad_request("invalid_path", err.body_text(), Some(trace_id))
        }
        other => ApiError::internal(other.body_text(), Some(trace_id)),
    }
}
