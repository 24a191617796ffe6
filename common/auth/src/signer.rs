use chrono::{DateTime, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::Serialize;
use tracing::debug;

use crate::config::JwtConfig;
use crate::error::{AuthError, AuthResult};
use crate::roles::Role;

pub const TOKEN_TYPE: &str = "bearer";

/// Mints HS256 session tokens with the process-wide secret.
pub struct TokenSigner {
    encoding_key: EncodingKey,
    config: JwtConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_at: DateTime<Utc>,
    pub expires_in: i64,
}

#[derive(Serialize)]
struct AccessClaims<'a> {
    sub: String,
    role: &'a str,
    iat: i64,
    exp: i64,
}

impl TokenSigner {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret()),
            config: config.clone(),
        }
    }

    pub fn issue(&self, subject_id: i64, role: Role) -> AuthResult<IssuedToken> {
        self.issue_at(subject_id, role, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_at(
        &self,
        subject_id: i64,
        role: Role,
        now: DateTime<Utc>,
    ) -> AuthResult<IssuedToken> {
        let expires_at = now + self.config.token_ttl;
        let claims = AccessClaims {
            sub: subject_id.to_string(),
            role: role.as_str(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let access_token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|err| AuthError::Signing(err.to_string()))?;
        debug!(subject_id, role = %role, "issued session token");

        Ok(IssuedToken {
            access_token,
            token_type: TOKEN_TYPE,
            expires_at,
            expires_in: self.config.token_ttl.num_seconds(),
        })
    }
}
