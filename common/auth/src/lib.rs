pub mod claims;
pub mod config;
pub mod error;
pub mod extractors;
pub mod roles;
pub mod signer;
pub mod verifier;

pub use claims::Identity;
pub use config::JwtConfig;
pub use error::{AuthError, AuthResult};
pub use extractors::AuthContext;
pub use roles::{Role, ROLE_DOCTOR, ROLE_PATIENT, ROLE_STAFF};
pub use signer::{IssuedToken, TokenSigner};
pub use verifier::JwtVerifier;
