use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AuthError;

pub const ROLE_PATIENT: &str = "patient";
pub const ROLE_DOCTOR: &str = "doctor";
pub const ROLE_STAFF: &str = "staff";

/// Role claim carried by every session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Patient,
    Doctor,
    Staff,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Patient, Role::Doctor, Role::Staff];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Patient => ROLE_PATIENT,
            Role::Doctor => ROLE_DOCTOR,
            Role::Staff => ROLE_STAFF,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_PATIENT => Ok(Role::Patient),
            ROLE_DOCTOR => Ok(Role::Doctor),
            ROLE_STAFF => Ok(Role::Staff),
            other => Err(AuthError::Invalid(format!("unknown role '{other}'"))),
        }
    }
}
