pub mod context;
pub mod error;
pub mod policy;

pub use context::{
    auth_rejection, request_trace_id, trace_id_from_headers, SecurityContext, SecurityCtxExtractor,
    TRACE_HEADER,
};
pub use error::AuthzError;
pub use policy::{authorize, ensure_allowed, Action, Decision, Operation, Ownership, ResourceKind};
