use std::fmt;

use common_auth::{Identity, Role};
use serde::Serialize;
use tracing::warn;

use crate::error::AuthzError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Patient,
    Doctor,
    Staff,
    Appointment,
    Prescription,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 5] = [
        ResourceKind::Patient,
        ResourceKind::Doctor,
        ResourceKind::Staff,
        ResourceKind::Appointment,
        ResourceKind::Prescription,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Patient => "patient",
            ResourceKind::Doctor => "doctor",
            ResourceKind::Staff => "staff",
            ResourceKind::Appointment => "appointment",
            ResourceKind::Prescription => "prescription",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Create,
    Read,
    List,
    Update,
    Delete,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::Create,
        Action::Read,
        Action::List,
        Action::Update,
        Action::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Read => "read",
            Action::List => "list",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Operation {
    pub resource: ResourceKind,
    pub action: Action,
}

impl Operation {
    pub const fn new(resource: ResourceKind, action: Action) -> Self {
        Self { resource, action }
    }
}

/// Owning parties of the record an operation targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ownership {
    pub patient_id: Option<i64>,
    pub doctor_id: Option<i64>,
}

impl Ownership {
    pub fn patient(patient_id: i64) -> Self {
        Self {
            patient_id: Some(patient_id),
            doctor_id: None,
        }
    }

    pub fn doctor(doctor_id: i64) -> Self {
        Self {
            patient_id: None,
            doctor_id: Some(doctor_id),
        }
    }

    pub fn both(patient_id: i64, doctor_id: i64) -> Self {
        Self {
            patient_id: Some(patient_id),
            doctor_id: Some(doctor_id),
        }
    }

    /// The row filter a non-staff identity is confined to when listing.
    pub fn scope_for(identity: &Identity) -> Option<Self> {
        match identity.role {
            Role::Staff => None,
            Role::Patient => Some(Self::patient(identity.subject_id)),
            Role::Doctor => Some(Self::doctor(identity.subject_id)),
        }
    }

    fn owned_by(&self, identity: &Identity) -> bool {
        match identity.role {
            Role::Patient => self.patient_id == Some(identity.subject_id),
            Role::Doctor => self.doctor_id == Some(identity.subject_id),
            Role::Staff => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    pub fn into_result(self, op: Operation) -> Result<(), AuthzError> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny => Err(AuthzError::Forbidden(op)),
        }
    }
}

impl From<bool> for Decision {
    fn from(allowed: bool) -> Self {
        if allowed {
            Decision::Allow
        } else {
            Decision::Deny
        }
    }
}

/// Decides whether `identity` may perform `op` on a record owned by `target`.
///
/// Staff may do anything. Patients and doctors are limited to records they own;
/// list operations are allowed here and narrowed by [`Ownership::scope_for`] at the
/// query. Anything not granted below is denied.
pub fn authorize(identity: &Identity, op: Operation, target: Option<Ownership>) -> Decision {
    use Action::*;
    use ResourceKind::*;

    if identity.has_role(Role::Staff) {
        return Decision::Allow;
    }

    let owned = target.map(|t| t.owned_by(identity)).unwrap_or(false);

    let allowed = match (identity.role, op.resource, op.action) {
        (_, Doctor, Read | List) => true,

        (Role::Patient, Patient, Read) => owned,
        (Role::Patient, Appointment, Create | Read) => owned,
        (Role::Patient, Appointment | Prescription, List) => true,

        (Role::Doctor, Appointment, Read) => owned,
        (Role::Doctor, Appointment | Prescription, List) => true,
        (Role::Doctor, Prescription, Create) => owned,

        _ => false,
    };

    Decision::from(allowed)
}

/// [`authorize`] that logs and converts a denial into [`AuthzError`].
pub fn ensure_allowed(
    identity: &Identity,
    op: Operation,
    target: Option<Ownership>,
) -> Result<(), AuthzError> {
    let decision = authorize(identity, op, target);
    if !decision.is_allowed() {
        warn!(
            subject_id = identity.subject_id,
            role = %identity.role,
            resource = %op.resource,
            action = %op.action,
            "access_denied"
        );
    }
    decision.into_result(op)
}
