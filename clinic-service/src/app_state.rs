use std::sync::Arc;

use axum::extract::FromRef;
use common_auth::{IssuedToken, JwtConfig, JwtVerifier, Role, TokenSigner};
use common_http_errors::{ApiError, ApiResult};
use common_observability::ClinicMetrics;
use common_security::{Operation, Ownership, SecurityContext};
use sqlx::SqlitePool;
use tracing::error;
use uuid::Uuid;

use crate::db::{self, DbConn};

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub jwt_verifier: Arc<JwtVerifier>,
    pub token_signer: Arc<TokenSigner>,
    pub metrics: Arc<ClinicMetrics>,
}

impl AppState {
    pub fn new(db: SqlitePool, jwt: JwtConfig, metrics: Arc<ClinicMetrics>) -> Self {
        let token_signer = Arc::new(TokenSigner::new(&jwt));
        let jwt_verifier = Arc::new(JwtVerifier::new(jwt));
        Self {
            db,
            jwt_verifier,
            token_signer,
            metrics,
        }
    }

    /// Runs the access guard for `op` and turns a denial into a 403.
    pub fn guard(
        &self,
        sec: &SecurityContext,
        op: Operation,
        target: Option<Ownership>,
    ) -> ApiResult<()> {
        sec.ensure(op, target).map_err(|err| {
            self.metrics
                .access_denied(op.resource.as_str(), op.action.as_str());
            ApiError::forbidden(err, Some(sec.trace_id))
        })
    }

    pub fn issue_token(&self, subject_id: i64, role: Role, trace_id: Uuid) -> ApiResult<IssuedToken> {
        let issued = self.token_signer.issue(subject_id, role).map_err(|err| {
            error!(?err, %trace_id, subject_id, "token issuance failed");
            ApiError::internal("token issuance failed", Some(trace_id))
        })?;
        self.metrics.token_issued(role.as_str());
        Ok(issued)
    }

    pub async fn conn(&self, sec: &SecurityContext) -> ApiResult<DbConn> {
        db::acquire(&self.db, Some(sec.trace_id)).await
    }
}

impl FromRef<AppState> for Arc<JwtVerifier> {
    fn from_ref(state: &AppState) -> Self {
        state.jwt_verifier.clone()
    }
}
