use common_http_errors::{ApiError, ApiResult};
use uuid::Uuid;

/// Rejects the request when any named text field is blank.
pub fn require_present(fields: &[(&'static str, &str)], trace_id: Uuid) -> ApiResult<()> {
    match fields.iter().find(|(_, value)| value.trim().is_empty()) {
        Some((name, _)) => Err(ApiError::bad_request(
            "missing_field",
            format!("{name} must not be empty"),
            Some(trace_id),
        )),
        None => Ok(()),
    }
}
