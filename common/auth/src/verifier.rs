use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde_json::Value;
use tracing::debug;

use crate::claims::Identity;
use crate::config::JwtConfig;
use crate::error::AuthResult;

#[derive(Clone)]
pub struct JwtVerifier {
    config: JwtConfig,
    decoding_key: DecodingKey,
}

impl JwtVerifier {
    pub fn new(config: JwtConfig) -> Self {
        let decoding_key = DecodingKey::from_secret(config.secret());
        Self {
            config,
            decoding_key,
        }
    }

    /// Checks signature and expiry, then rebuilds the caller identity from the claims.
    pub fn verify(&self, token: &str) -> AuthResult<Identity> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp"]);
        validation.leeway = self.config.leeway_seconds.into();

        let token_data = decode::<Value>(token, &self.decoding_key, &validation)?;
        let identity = Identity::try_from(token_data.claims)?;
        debug!(subject_id = identity.subject_id, role = %identity.role, "verified session token");
        Ok(identity)
    }
}
