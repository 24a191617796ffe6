use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use common_http_errors::ApiError;
use rand_core::OsRng;
use tracing::error;
use uuid::Uuid;

pub fn hash_password(password: &str, trace_id: Option<Uuid>) -> Result<String, ApiError> {
    if password.trim().is_empty() {
        return Err(ApiError::bad_request(
            "invalid_password",
            "Password must not be empty",
            trace_id,
        ));
    }

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| hashing_failure(err, trace_id))
}

fn hashing_failure(err: impl std::fmt::Display, trace_id: Option<Uuid>) -> ApiError {
    error!(%err, trace_id = ?trace_id, "password hashing failed");
    ApiError::internal("password hashing failed", trace_id)
}

/// An unparseable digest never verifies.
pub fn verify_password(password: &str, digest: &str) -> bool {
    match PasswordHash::new(digest) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
