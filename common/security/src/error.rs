use thiserror::Error;

use crate::policy::Operation;

#[derive(Debug, Error)]
pub enum AuthzError {
    #[error("not authorized to {} {}", .0.action, .0.resource)]
    Forbidden(Operation),
}
