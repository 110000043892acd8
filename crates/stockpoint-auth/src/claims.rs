//! JWT claim structure for identity tokens.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Claims carried by an identity token.
///
/// Only the subject is trusted from the token. Role and tenant come from the
/// role directory at request time so that an administrative role change takes
/// effect on the next request instead of at token expiry.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// Subject identifier
    pub sub: String,
    /// Expiration (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
    /// Unique token identifier
    pub jti: String,
}
