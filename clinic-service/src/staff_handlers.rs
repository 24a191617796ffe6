use axum::{extract::State, Json};
use common_http_errors::ApiResult;
use common_security::{Action, Operation, ResourceKind, SecurityCtxExtractor};

use crate::app_state::AppState;
use crate::extract::JsonBody;
use crate::repo::staff::{self, NewStaff, Staff};
use crate::repo::with_trace;
use crate::responses::Created;
use crate::validation::require_present;

pub async fn create_staff(
    SecurityCtxExtractor(sec): SecurityCtxExtractor,
    State(state): State<AppState>,
    JsonBody(member): JsonBody<NewStaff>,
) -> ApiResult<Json<Created>> {
    state.guard(&sec, Operation::new(ResourceKind::Staff, Action::Create), None)?;
    require_present(&[("name", member.name.as_str())], sec.trace_id)?;
    let mut conn = state.conn(&sec).await?;
    let id = staff::create(&mut conn, &member)
        .await
        .map_err(with_trace(sec.trace_id))?;
    Ok(Json(Created { id }))
}

pub async fn list_staff(
    SecurityCtxExtractor(sec): SecurityCtxExtractor,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<Staff>>> {
    state.guard(&sec, Operation::new(ResourceKind::Staff, Action::List), None)?;
    let mut conn = state.conn(&sec).await?;
    let rows = staff::list(&mut conn)
        .await
        .map_err(with_trace(sec.trace_id))?;
    Ok(Json(rows))
}
