use axum::{extract::State, Json};
use common_http_errors::ApiResult;
use common_security::{Action, Operation, ResourceKind, SecurityCtxExtractor};

use crate::app_state::AppState;
use crate::db;
use crate::extract::{JsonBody, PathParam, TraceId};
use crate::repo::doctors::{self, Doctor, NewDoctor};
use crate::repo::with_trace;
use crate::responses::Created;
use crate::validation::require_present;

pub async fn create_doctor(
    SecurityCtxExtractor(sec): SecurityCtxExtractor,
    State(state): State<AppState>,
    JsonBody(doctor): JsonBody<NewDoctor>,
) -> ApiResult<Json<Created>> {
    state.guard(&sec, Operation::new(ResourceKind::Doctor, Action::Create), None)?;
    require_present(
        &[("name", doctor.name.as_str()), ("specialty", doctor.specialty.as_str())],
        sec.trace_id,
    )?;
    let mut conn = state.conn(&sec).await?;
    let id = doctors::create(&mut conn, &doctor)
        .await
        .map_err(with_trace(sec.trace_id))?;
    Ok(Json(Created { id }))
}

// The doctor directory is public.

pub async fn list_doctors(
    TraceId(trace_id): TraceId,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<Doctor>>> {
    let mut conn = db::acquire(&state.db, Some(trace_id)).await?;
    let rows = doctors::list(&mut conn).await.map_err(with_trace(trace_id))?;
    Ok(Json(rows))
}

pub async fn get_doctor(
    TraceId(trace_id): TraceId,
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
) -> ApiResult<Json<Doctor>> {
    let mut conn = db::acquire(&state.db, Some(trace_id)).await?;
    let doctor = doctors::get(&mut conn, id)
        .await
        .map_err(with_trace(trace_id))?;
    Ok(Json(doctor))
}
