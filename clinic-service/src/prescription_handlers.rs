use axum::{extract::State, Json};
use common_http_errors::ApiResult;
use common_security::{Action, Operation, Ownership, ResourceKind, SecurityCtxExtractor};
use tracing::info;

use crate::app_state::AppState;
use crate::extract::JsonBody;
use crate::repo::prescriptions::{self, NewPrescription, Prescription};
use crate::repo::with_trace;
use crate::responses::Created;
use crate::validation::require_present;

/// Doctors prescribe under their own id; staff may record any prescription.
pub async fn create_prescription(
    SecurityCtxExtractor(sec): SecurityCtxExtractor,
    State(state): State<AppState>,
    JsonBody(prescription): JsonBody<NewPrescription>,
) -> ApiResult<Json<Created>> {
    state.guard(
        &sec,
        Operation::new(ResourceKind::Prescription, Action::Create),
        Some(prescription.ownership()),
    )?;
    require_present(
        &[
            ("medications", prescription.medications.as_str()),
            ("date_issued", prescription.date_issued.as_str()),
        ],
        sec.trace_id,
    )?;
    let mut conn = state.conn(&sec).await?;
    let id = prescriptions::create(&mut conn, &prescription)
        .await
        .map_err(with_trace(sec.trace_id))?;
    info!(prescription_id = id, patient_id = prescription.patient_id, "prescription issued");
    Ok(Json(Created { id }))
}

pub async fn list_prescriptions(
    SecurityCtxExtractor(sec): SecurityCtxExtractor,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<Prescription>>> {
    state.guard(
        &sec,
        Operation::new(ResourceKind::Prescription, Action::List),
        None,
    )?;
    let mut conn = state.conn(&sec).await?;
    let rows = prescriptions::list(&mut conn, Ownership::scope_for(&sec.identity))
        .await
        .map_err(with_trace(sec.trace_id))?;
    Ok(Json(rows))
}
