use serde::{Deserialize, Serialize};

use crate::error::{AuthError, AuthResult};
use crate::roles::Role;

/// Caller identity reconstructed from a verified session token. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub subject_id: i64,
    pub role: Role,
}

impl Identity {
    pub fn new(subject_id: i64, role: Role) -> Self {
        Self { subject_id, role }
    }

    /// Convenience helper for role checks.
    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }
}

#[derive(Debug, Deserialize)]
struct ClaimsRepr {
    #[serde(default)]
    sub: Option<String>,
    #[serde(default)]
    role: Option<String>,
}

impl TryFrom<ClaimsRepr> for Identity {
    type Error = AuthError;

    fn try_from(value: ClaimsRepr) -> AuthResult<Self> {
        let sub = value
            .sub
            .ok_or_else(|| AuthError::MissingClaim("sub".into()))?;
        let role = value
            .role
            .ok_or_else(|| AuthError::MissingClaim("role".into()))?;

        let subject_id = sub
            .parse::<i64>()
            .map_err(|_| AuthError::Invalid(format!("claim 'sub' is not an integer id: '{sub}'")))?;
        let role = role.parse::<Role>()?;

        Ok(Self { subject_id, role })
    }
}

impl TryFrom<serde_json::Value> for Identity {
    type Error = AuthError;

    fn try_from(value: serde_json::Value) -> AuthResult<Self> {
        let repr: ClaimsRepr = serde_json::from_value(value)
            .map_err(|err| AuthError::Invalid(format!("malformed claims: {err}")))?;
        Identity::try_from(repr)
    }
}
