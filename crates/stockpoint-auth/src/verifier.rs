//! The identity provider seam.

use async_trait::async_trait;
use stockpoint_config::JwtConfig;

use crate::jwt::verify_token;

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Invalid or expired token")]
    Invalid,

    #[error("Failed to create token: {0}")]
    Encoding(String),
}

/// Turns an opaque bearer token into a subject identifier.
///
/// Implementations talk to whatever identity provider issued the token. They
/// must not resolve roles; that is the role directory's job.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<String, TokenError>;
}

/// Verifier for tokens issued by [`crate::create_access_token`].
#[derive(Clone, Debug)]
pub struct JwtVerifier {
    config: JwtConfig,
}

impl JwtVerifier {
    pub fn new(config: JwtConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl IdentityVerifier for JwtVerifier {
    async fn verify(&self, token: &str) -> Result<String, TokenError> {
        verify_token(token, &self.config).map(|claims| claims.sub)
    }
}
