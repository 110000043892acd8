//! The role authorizer.
//!
//! Resolution order for a token: verify it with the identity provider, look
//! the subject up among platform users, then through the subject → company
//! index. The first hit wins. Nothing is cached; every call reads the
//! directory again.

use std::collections::BTreeSet;
use std::sync::Arc;

use stockpoint_auth::{IdentityVerifier, TokenError};
use tracing::instrument;

use crate::directory::{DirectoryError, Identity, RoleDirectory};
use crate::policy::RolePolicy;

#[derive(Debug, thiserror::Error)]
pub enum AuthorizeError {
    #[error("Missing identity token")]
    MissingToken,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Unknown user")]
    UnknownSubject,

    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

/// Outcome of [`RoleAuthorizer::authorize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authorization {
    pub identity: Identity,
    /// True if at least one required action is permitted.
    pub authorized: bool,
    /// Every permission of the identity's role.
    pub permissions: BTreeSet<String>,
}

#[derive(Clone)]
pub struct RoleAuthorizer {
    policy: Arc<RolePolicy>,
    verifier: Arc<dyn IdentityVerifier>,
    directory: Arc<dyn RoleDirectory>,
}

impl RoleAuthorizer {
    pub fn new(
        policy: Arc<RolePolicy>,
        verifier: Arc<dyn IdentityVerifier>,
        directory: Arc<dyn RoleDirectory>,
    ) -> Self {
        Self {
            policy,
            verifier,
            directory,
        }
    }

    pub fn policy(&self) -> &RolePolicy {
        &self.policy
    }

    pub fn has_permission(&self, role: &str, action: &str) -> bool {
        self.policy.has_permission(role, action)
    }

    pub fn can_access_route(&self, role: &str, path: &str) -> bool {
        self.policy.can_access_route(role, path)
    }

    /// Resolves a token to the identity behind it.
    ///
    /// No directory lookup happens unless the token verifies.
    #[instrument(skip(self, token))]
    pub async fn resolve(&self, token: &str) -> Result<Identity, AuthorizeError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthorizeError::MissingToken);
        }

        let subject = self.verifier.verify(token).await.map_err(|e| match e {
            TokenError::Invalid | TokenError::Encoding(_) => AuthorizeError::InvalidToken,
        })?;

        let identity = match self.lookup(&subject).await {
            Ok(identity) => identity,
            Err(e) => {
                tracing::error!(subject = %subject, error = %e, "Role resolution failed");
                return Err(e.into());
            }
        };

        match identity {
            Some(identity) => {
                tracing::debug!(
                    subject = %identity.subject,
                    role = %identity.role,
                    scope = identity.scope.as_str(),
                    "Resolved identity"
                );
                Ok(identity)
            }
            None => {
                tracing::warn!(subject = %subject, "Token subject has no role");
                Err(AuthorizeError::UnknownSubject)
            }
        }
    }

    /// Authorizes the token's holder for any one of `required`.
    ///
    /// An empty `required` list never authorizes.
    #[instrument(skip(self, token, required), fields(required = required.len()))]
    pub async fn authorize<S: AsRef<str>>(
        &self,
        token: &str,
        required: &[S],
    ) -> Result<Authorization, AuthorizeError> {
        let identity = self.resolve(token).await?;
        Ok(self.evaluate(identity, required))
    }

    /// The pure half of [`authorize`](Self::authorize).
    pub fn evaluate<S: AsRef<str>>(&self, identity: Identity, required: &[S]) -> Authorization {
        let authorized = required
            .iter()
            .any(|action| self.policy.has_permission(&identity.role, action.as_ref()));
        let permissions = self.policy.permissions_for(&identity.role);

        Authorization {
            identity,
            authorized,
            permissions,
        }
    }

    async fn lookup(&self, subject: &str) -> Result<Option<Identity>, DirectoryError> {
        if let Some(identity) = self.directory.platform_identity(subject).await? {
            return Ok(Some(identity));
        }
        self.directory.tenant_identity(subject).await
    }
}
