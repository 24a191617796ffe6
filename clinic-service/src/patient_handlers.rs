use axum::{extract::State, Json};
use common_auth::Role;
use common_http_errors::ApiResult;
use common_security::{Action, Operation, Ownership, ResourceKind, SecurityCtxExtractor};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::app_state::AppState;
use crate::db;
use crate::extract::{JsonBody, PathParam, TraceId};
use crate::passwords::hash_password;
use crate::repo::patients::{self, Patient, PatientDetails};
use crate::repo::with_trace;
use crate::responses::{Deleted, Registration, TokenResponse};
use crate::validation::require_present;

#[derive(Debug, Deserialize)]
pub struct NewPatient {
    #[serde(flatten)]
    pub details: PatientDetails,
    pub password: String,
}

fn validate(details: &PatientDetails, trace_id: Uuid) -> ApiResult<()> {
    require_present(
        &[
            ("name", details.name.as_str()),
            ("date_of_birth", details.date_of_birth.as_str()),
            ("phone", details.phone.as_str()),
            ("address", details.address.as_str()),
        ],
        trace_id,
    )
}

/// Open registration: stores the patient and hands back a patient token for it.
pub async fn register_patient(
    TraceId(trace_id): TraceId,
    State(state): State<AppState>,
    JsonBody(new_patient): JsonBody<NewPatient>,
) -> ApiResult<Json<Registration>> {
    let NewPatient { details, password } = new_patient;
    validate(&details, trace_id)?;
    let digest = hash_password(&password, Some(trace_id))?;

    let mut conn = db::acquire(&state.db, Some(trace_id)).await?;
    let id = patients::create(&mut conn, &details, &digest)
        .await
        .map_err(with_trace(trace_id))?;
    drop(conn);

    let issued = state.issue_token(id, Role::Patient, trace_id)?;
    info!(patient_id = id, %trace_id, "patient registered");
    Ok(Json(Registration {
        id,
        token: TokenResponse::from(issued),
    }))
}

pub async fn list_patients(
    SecurityCtxExtractor(sec): SecurityCtxExtractor,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<Patient>>> {
    state.guard(&sec, Operation::new(ResourceKind::Patient, Action::List), None)?;
    let mut conn = state.conn(&sec).await?;
    let rows = patients::list(&mut conn)
        .await
        .map_err(with_trace(sec.trace_id))?;
    Ok(Json(rows))
}

pub async fn get_patient(
    SecurityCtxExtractor(sec): SecurityCtxExtractor,
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
) -> ApiResult<Json<Patient>> {
    state.guard(
        &sec,
        Operation::new(ResourceKind::Patient, Action::Read),
        Some(Ownership::patient(id)),
    )?;
    let mut conn = state.conn(&sec).await?;
    let patient = patients::get(&mut conn, id)
        .await
        .map_err(with_trace(sec.trace_id))?;
    Ok(Json(patient))
}

pub async fn update_patient(
    SecurityCtxExtractor(sec): SecurityCtxExtractor,
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
    JsonBody(details): JsonBody<PatientDetails>,
) -> ApiResult<Json<Patient>> {
    state.guard(
        &sec,
        Operation::new(ResourceKind::Patient, Action::Update),
        Some(Ownership::patient(id)),
    )?;
    validate(&details, sec.trace_id)?;
    let mut conn = state.conn(&sec).await?;
    let patient = patients::update(&mut conn, id, &details)
        .await
        .map_err(with_trace(sec.trace_id))?;
    Ok(Json(patient))
}

pub async fn delete_patient(
    SecurityCtxExtractor(sec): SecurityCtxExtractor,
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
) -> ApiResult<Json<Deleted>> {
    state.guard(
        &sec,
        Operation::new(ResourceKind::Patient, Action::Delete),
        Some(Ownership::patient(id)),
    )?;
    let mut conn = state.conn(&sec).await?;
    patients::delete(&mut conn, id)
        .await
        .map_err(with_trace(sec.trace_id))?;
    info!(patient_id = id, subject_id = sec.subject_id(), "patient deleted");
    Ok(Json(Deleted::new("Patient")))
}
