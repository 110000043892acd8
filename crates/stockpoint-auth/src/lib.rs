//! # Stockpoint Auth
//!
//! Identity tokens for the Stockpoint access service.
//!
//! The identity provider answers one question: which subject does this bearer
//! token belong to? Roles and permissions are resolved separately on every
//! request, so tokens only carry the subject.
//!
//! - [`claims`]: JWT claim structure
//! - [`jwt`]: Token creation and verification
//! - [`verifier`]: The [`IdentityVerifier`] seam and its JWT implementation
//!
//! # Example
//!
//! ```ignore
//! use stockpoint_auth::{IdentityVerifier, JwtVerifier, create_access_token};
//! use stockpoint_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token("auth0|42", &config)?;
//!
//! let verifier = JwtVerifier::new(config);
//! let subject = verifier.verify(&token).await?;
//! assert_eq!(subject, "auth0|42");
//! ```

pub mod claims;
pub mod jwt;
pub mod verifier;

pub use claims::Claims;
pub use jwt::{create_access_token, verify_token};
pub use verifier::{IdentityVerifier, JwtVerifier, TokenError};
