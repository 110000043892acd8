//! Token creation and verification.
//!
//! Tokens are HS256 JWTs signed with [`JwtConfig::secret`]. Verification
//! checks signature and expiry; an empty subject is rejected as well.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use stockpoint_config::JwtConfig;

use crate::claims::Claims;
use crate::verifier::TokenError;

/// Issues an identity token for `subject`.
///
/// # Errors
///
/// Returns [`TokenError::Encoding`] if signing fails.
pub fn create_access_token(subject: &str, jwt_config: &JwtConfig) -> Result<String, TokenError> {
    let now = Utc::now().timestamp() as usize;
    let exp = now + jwt_config.access_token_expiry.max(0) as usize;

    let claims = Claims {
        sub: subject.to_string(),
        exp,
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| TokenError::Encoding(e.to_string()))
}

/// Verifies an identity token and returns its claims.
///
/// # Errors
///
/// Returns [`TokenError::Invalid`] for a bad signature, an expired token, a
/// malformed token or an empty subject.
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, TokenError> {
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| TokenError::Invalid)?;

    if claims.sub.trim().is_empty() {
        return Err(TokenError::Invalid);
    }

    Ok(claims)
}
