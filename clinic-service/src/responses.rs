use common_auth::IssuedToken;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Created {
    pub id: i64,
}

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub detail: String,
}

impl Deleted {
    pub fn new(what: &str) -> Self {
        Self {
            detail: format!("{what} deleted"),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

impl From<IssuedToken> for TokenResponse {
    fn from(issued: IssuedToken) -> Self {
        Self {
            access_token: issued.access_token,
            token_type: issued.token_type,
            expires_in: issued.expires_in,
        }
    }
}

/// Body returned by patient registration: the new id plus a session token.
#[derive(Debug, Serialize)]
pub struct Registration {
    pub id: i64,
    #[serde(flatten)]
    pub token: TokenResponse,
}
