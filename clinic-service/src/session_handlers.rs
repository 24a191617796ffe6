use axum::{extract::State, Json};
use common_auth::Role;
use common_http_errors::{ApiError, ApiResult};
use serde::Deserialize;
use tracing::warn;
use uuid::Uuid;

use crate::app_state::AppState;
use crate::db;
use crate::extract::{JsonBody, TraceId};
use crate::passwords::verify_password;
use crate::repo::{patients, with_trace, StoreError};
use crate::responses::TokenResponse;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub patient_id: i64,
    pub password: String,
}

fn invalid_credentials(trace_id: Uuid) -> ApiError {
    ApiError::Unauthorized {
        code: "invalid_credentials",
        trace_id: Some(trace_id),
        message: Some("Invalid credentials".to_string()),
    }
}

/// Patient login. Unknown ids and wrong passwords are indistinguishable to the caller.
pub async fn login(
    TraceId(trace_id): TraceId,
    State(state): State<AppState>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let mut conn = db::acquire(&state.db, Some(trace_id)).await?;
    let credentials = match patients::credentials(&mut conn, request.patient_id).await {
        Ok(credentials) => credentials,
        Err(StoreError::NotFound(_)) => {
            warn!(patient_id = request.patient_id, %trace_id, "login for unknown patient");
            return Err(invalid_credentials(trace_id));
        }
        Err(err) => return Err(with_trace(trace_id)(err)),
    };
    drop(conn);

    if !verify_password(&request.password, &credentials.password_digest) {
        warn!(patient_id = credentials.id, %trace_id, "login with wrong password");
        return Err(invalid_credentials(trace_id));
    }

    let issued = state.issue_token(credentials.id, Role::Patient, trace_id)?;
    Ok(Json(TokenResponse::from(issued)))
}
