use common_http_errors::ApiError;
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

pub mod appointments;
pub mod doctors;
pub mod patients;
pub mod prescriptions;
pub mod staff;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("constraint violation: {0}")]
    Constraint(String),
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(value: sqlx::Error) -> Self {
        match &value {
            sqlx::Error::Database(db_err) if !matches!(db_err.kind(), sqlx::error::ErrorKind::Other) => {
                StoreError::Constraint(db_err.message().to_string())
            }
            _ => StoreError::Database(value),
        }
    }
}

impl StoreError {
    pub fn into_api(self, trace_id: Option<Uuid>) -> ApiError {
        match self {
            StoreError::NotFound(resource) => ApiError::not_found(not_found_code(resource), trace_id),
            StoreError::Constraint(message) => {
                ApiError::bad_request("constraint_violation", message, trace_id)
            }
            StoreError::Database(err) => {
                error!(?err, trace_id = ?trace_id, "database failure");
                ApiError::internal("database failure", trace_id)
            }
        }
    }
}

/// `map_err` adapter for handlers that already hold a trace id.
pub fn with_trace(trace_id: Uuid) -> impl FnOnce(StoreError) -> ApiError {
    move |err| err.into_api(Some(trace_id))
}

fn not_found_code(resource: &'static str) -> &'static str {
    match resource {
        patients::RESOURCE => "patient_not_found",
        doctors::RESOURCE => "doctor_not_found",
        staff::RESOURCE => "staff_not_found",
        appointments::RESOURCE => "appointment_not_found",
        prescriptions::RESOURCE => "prescription_not_found",
        _ => "not_found",
    }
}

/// Maps "no row" from an UPDATE/DELETE/SELECT onto [`StoreError::NotFound`].
pub(crate) fn found<T>(row: Option<T>, resource: &'static str) -> StoreResult<T> {
    row.ok_or(StoreError::NotFound(resource))
}

pub(crate) fn affected(rows: u64, resource: &'static str) -> StoreResult<()> {
    if rows == 0 {
        Err(StoreError::NotFound(resource))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn non_constraint_errors_are_database_failures() {
        for err in [sqlx::Error::RowNotFound, sqlx::Error::PoolTimedOut] {
            let store = StoreError::from(err);
            assert!(matches!(store, StoreError::Database(_)), "got {store:?}");
            let trace_id = Uuid::new_v4();
            match store.into_api(Some(trace_id)) {
                ApiError::Internal { trace_id: got, message } => {
                    assert_eq!(got, Some(trace_id));
                    assert_eq!(message.as_deref(), Some("database failure"));
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }

    #[test]
    fn database_failure_is_a_500() {
        let api = StoreError::from(sqlx::Error::PoolTimedOut).into_api(None);
        assert_eq!(api.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn not_found_uses_the_resource_code() {
        let cases = [
            (patients::RESOURCE, "patient_not_found"),
            (doctors::RESOURCE, "doctor_not_found"),
            (staff::RESOURCE, "staff_not_found"),
            (appointments::RESOURCE, "appointment_not_found"),
            (prescriptions::RESOURCE, "prescription_not_found"),
        ];
        for (resource, expected) in cases {
            let api = StoreError::NotFound(resource).into_api(None);
            assert_eq!(api.status(), StatusCode::NOT_FOUND);
            match api {
                ApiError::NotFound { code, .. } => assert_eq!(code, expected),
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }

    #[test]
    fn constraint_violation_is_a_400() {
        let api = StoreError::Constraint("FOREIGN KEY constraint failed".into()).into_api(None);
        assert_eq!(api.status(), StatusCode::BAD_REQUEST);
        match api {
            ApiError::BadRequest { code, message, .. } => {
                assert_eq!(code, "constraint_violation");
                assert_eq!(message.as_deref(), Some("FOREIGN KEY constraint failed"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_rows_and_untouched_rows_are_not_found() {
        assert!(matches!(found::<i64>(None, doctors::RESOURCE), Err(StoreError::NotFound("doctor"))));
        assert!(matches!(found(Some(7), doctors::RESOURCE), Ok(7)));
        assert!(matches!(affected(0, staff::RESOURCE), Err(StoreError::NotFound("staff"))));
        assert!(affected(1, staff::RESOURCE).is_ok());
    }
}
