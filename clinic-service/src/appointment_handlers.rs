use axum::{extract::State, Json};
use common_http_errors::ApiResult;
use common_security::{Action, Operation, Ownership, ResourceKind, SecurityCtxExtractor};
use tracing::info;
use uuid::Uuid;

use crate::app_state::AppState;
use crate::extract::{JsonBody, PathParam};
use crate::repo::appointments::{self, Appointment, AppointmentDetails};
use crate::repo::with_trace;
use crate::responses::{Created, Deleted};
use crate::validation::require_present;

const fn op(action: Action) -> Operation {
    Operation::new(ResourceKind::Appointment, action)
}

fn validate(details: &AppointmentDetails, trace_id: Uuid) -> ApiResult<()> {
    require_present(
        &[
            ("appointment_time", details.appointment_time.as_str()),
            ("status", details.status.as_str()),
        ],
        trace_id,
    )
}

/// Staff see every appointment; patients and doctors only their own.
pub async fn list_appointments(
    SecurityCtxExtractor(sec): SecurityCtxExtractor,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<Appointment>>> {
    state.guard(&sec, op(Action::List), None)?;
    let mut conn = state.conn(&sec).await?;
    let rows = appointments::list(&mut conn, Ownership::scope_for(&sec.identity))
        .await
        .map_err(with_trace(sec.trace_id))?;
    Ok(Json(rows))
}

pub async fn create_appointment(
    SecurityCtxExtractor(sec): SecurityCtxExtractor,
    State(state): State<AppState>,
    JsonBody(details): JsonBody<AppointmentDetails>,
) -> ApiResult<Json<Created>> {
    state.guard(&sec, op(Action::Create), Some(details.ownership()))?;
    validate(&details, sec.trace_id)?;
    let mut conn = state.conn(&sec).await?;
    let id = appointments::create(&mut conn, &details)
        .await
        .map_err(with_trace(sec.trace_id))?;
    info!(appointment_id = id, subject_id = sec.subject_id(), "appointment booked");
    Ok(Json(Created { id }))
}

// By-id routes load the row first so the guard can see who owns it.

pub async fn get_appointment(
    SecurityCtxExtractor(sec): SecurityCtxExtractor,
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
) -> ApiResult<Json<Appointment>> {
    let mut conn = state.conn(&sec).await?;
    let appointment = appointments::get(&mut conn, id)
        .await
        .map_err(with_trace(sec.trace_id))?;
    state.guard(&sec, op(Action::Read), Some(appointment.ownership()))?;
    Ok(Json(appointment))
}

pub async fn update_appointment(
    SecurityCtxExtractor(sec): SecurityCtxExtractor,
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
    JsonBody(details): JsonBody<AppointmentDetails>,
) -> ApiResult<Json<Appointment>> {
    let mut conn = state.conn(&sec).await?;
    let current = appointments::get(&mut conn, id)
        .await
        .map_err(with_trace(sec.trace_id))?;
    state.guard(&sec, op(Action::Update), Some(current.ownership()))?;
    validate(&details, sec.trace_id)?;
    let updated = appointments::update(&mut conn, id, &details)
        .await
        .map_err(with_trace(sec.trace_id))?;
    Ok(Json(updated))
}

pub async fn delete_appointment(
    SecurityCtxExtractor(sec): SecurityCtxExtractor,
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
) -> ApiResult<Json<Deleted>> {
    let mut conn = state.conn(&sec).await?;
    let current = appointments::get(&mut conn, id)
        .await
        .map_err(with_trace(sec.trace_id))?;
    state.guard(&sec, op(Action::Delete), Some(current.ownership()))?;
    appointments::delete(&mut conn, id)
        .await
        .map_err(with_trace(sec.trace_id))?;
    Ok(Json(Deleted::new("Appointment")))
}
