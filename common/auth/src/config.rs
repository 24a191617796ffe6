use std::fmt;

use chrono::Duration;

use crate::error::{AuthError, AuthResult};

/// Session tokens live for 30 minutes unless configured otherwise.
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 30;

const MIN_SECRET_LEN: usize = 16;

/// Runtime configuration shared by the token signer and verifier.
#[derive(Clone)]
pub struct JwtConfig {
    /// HS256 shared secret.
    secret: Vec<u8>,
    /// Lifetime of an issued token.
    pub token_ttl: Duration,
    /// Allowable clock skew in seconds when validating exp.
    pub leeway_seconds: u32,
}

impl JwtConfig {
    pub fn new(secret: impl Into<Vec<u8>>) -> AuthResult<Self> {
        let secret = secret.into();
        if secret.len() < MIN_SECRET_LEN {
            return Err(AuthError::Config(format!(
                "signing secret must be at least {MIN_SECRET_LEN} bytes"
            )));
        }
        Ok(Self {
            secret,
            token_ttl: Duration::minutes(DEFAULT_TOKEN_TTL_MINUTES),
            leeway_seconds: 0,
        })
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    /// Adjust the allowed leeway.
    pub fn with_leeway(mut self, seconds: u32) -> Self {
        self.leeway_seconds = seconds;
        self
    }

    pub(crate) fn secret(&self) -> &[u8] {
        &self.secret
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .field("leeway_seconds", &self.leeway_seconds)
            .finish()
    }
}
