//! The enforcement wrapper.
//!
//! One gate shared by page routing, the API boundary and the UI. Each entry
//! point resolves the caller through the same [`RoleAuthorizer`] and returns
//! either a [`Grant`] for the wrapped behavior or a [`Denial`] that knows
//! where the caller should be sent.

use std::collections::BTreeSet;

use crate::authorizer::{AuthorizeError, RoleAuthorizer};
use crate::directory::Identity;

/// Where a denied caller is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Login,
    Unauthorized,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Denial {
    /// No identity could be established.
    Unauthenticated,
    /// The identity lacks the permission or route.
    Forbidden,
    /// The token verified but the subject has no role anywhere.
    UnknownSubject,
    /// Role resolution failed.
    Unavailable,
}

impl Denial {
    pub fn destination(&self) -> Destination {
        match self {
            Denial::Unauthenticated => Destination::Login,
            Denial::Forbidden | Denial::UnknownSubject | Denial::Unavailable => {
                Destination::Unauthorized
            }
        }
    }

    pub fn outcome(&self) -> &'static str {
        match self {
            Denial::Unauthenticated => "unauthenticated",
            Denial::Forbidden => "forbidden",
            Denial::UnknownSubject => "unknown_subject",
            Denial::Unavailable => "unavailable",
        }
    }
}

impl From<AuthorizeError> for Denial {
    fn from(err: AuthorizeError) -> Self {
        Denial::from(&err)
    }
}

impl From<&AuthorizeError> for Denial {
    fn from(err: &AuthorizeError) -> Self {
        match err {
            AuthorizeError::MissingToken | AuthorizeError::InvalidToken => Denial::Unauthenticated,
            AuthorizeError::UnknownSubject => Denial::UnknownSubject,
            AuthorizeError::Directory(_) => Denial::Unavailable,
        }
    }
}

/// An admitted caller. Exposes permission checks to the wrapped behavior so
/// handlers and templates never consult the policy directly.
#[derive(Debug, Clone)]
pub struct Grant {
    identity: Identity,
    permissions: BTreeSet<String>,
    routes: BTreeSet<String>,
}

impl Grant {
    fn new(authorizer: &RoleAuthorizer, identity: Identity) -> Self {
        let policy = authorizer.policy();
        Self {
            permissions: policy.permissions_for(&identity.role),
            routes: policy.routes_for(&identity.role),
            identity,
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn has_permission(&self, action: &str) -> bool {
        self.permissions.contains(action)
    }

    pub fn permissions(&self) -> &BTreeSet<String> {
        &self.permissions
    }

    pub fn routes(&self) -> &BTreeSet<String> {
        &self.routes
    }
}

/// Admits any caller with a resolvable identity.
pub async fn admit(authorizer: &RoleAuthorizer, token: Option<&str>) -> Result<Grant, Denial> {
    let token = token.ok_or(Denial::Unauthenticated)?;
    let identity = authorizer.resolve(token).await?;
    Ok(Grant::new(authorizer, identity))
}

/// Admits the caller if their role holds any one of `actions`.
pub async fn require_any(
    authorizer: &RoleAuthorizer,
    token: Option<&str>,
    actions: &[&str],
) -> Result<Grant, Denial> {
    let grant = admit(authorizer, token).await?;
    if actions.iter().any(|action| grant.has_permission(action)) {
        Ok(grant)
    } else {
        tracing::debug!(
            subject = %grant.identity.subject,
            role = %grant.identity.role,
            ?actions,
            "Permission denied"
        );
        Err(Denial::Forbidden)
    }
}

/// Admits the caller if their role may navigate to `path`.
pub async fn require_route(
    authorizer: &RoleAuthorizer,
    token: Option<&str>,
    path: &str,
) -> Result<Grant, Denial> {
    let grant = admit(authorizer, token).await?;
    if authorizer.can_access_route(&grant.identity.role, path) {
        Ok(grant)
    } else {
        tracing::debug!(
            subject = %grant.identity.subject,
            role = %grant.identity.role,
            path,
            "Route denied"
        );
        Err(Denial::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::authorizer::tests::{authorizer_with, token_for};
    use crate::directory::InMemoryDirectory;
    use uuid::Uuid;

    fn authorizer() -> RoleAuthorizer {
        authorizer_with(Arc::new(
            InMemoryDirectory::new()
                .with_platform_user("dev-1", "developer")
                .with_tenant_user("wh-1", "warehouse_salesperson", Uuid::new_v4())
                .with_tenant_user("sk-1", "skater", Uuid::new_v4()),
        ))
    }

    #[tokio::test]
    async fn test_no_token_goes_to_login() {
        let denial = admit(&authorizer(), None).await.unwrap_err();
        assert_eq!(denial, Denial::Unauthenticated);
        assert_eq!(denial.destination(), Destination::Login);
    }

    #[tokio::test]
    async fn test_bad_token_goes_to_login() {
        let denial = require_route(&authorizer(), Some("garbage"), "/home")
            .await
            .unwrap_err();
        assert_eq!(denial.destination(), Destination::Login);
    }

    #[tokio::test]
    async fn test_unknown_subject_goes_to_unauthorized() {
        let token = token_for("nobody");
        let denial = admit(&authorizer(), Some(&token)).await.unwrap_err();
        assert_eq!(denial, Denial::UnknownSubject);
        assert_eq!(denial.destination(), Destination::Unauthorized);
    }

    #[tokio::test]
    async fn test_require_any() {
        let token = token_for("wh-1");
        let grant = require_any(&authorizer(), Some(&token), &["delete", "read"])
            .await
            .unwrap();
        assert!(grant.has_permission("read"));
        assert!(!grant.has_permission("delete"));

        let denial = require_any(&authorizer(), Some(&token), &["delete"])
            .await
            .unwrap_err();
        assert_eq!(denial, Denial::Forbidden);
        assert_eq!(denial.destination(), Destination::Unauthorized);
    }

    #[tokio::test]
    async fn test_require_route() {
        let token = token_for("sk-1");
        let grant = require_route(&authorizer(), Some(&token), "/skater/routes/3")
            .await
            .unwrap();
        assert_eq!(grant.identity().role, "skater");
        assert!(grant.routes().contains("/skater"));

        let denial = require_route(&authorizer(), Some(&token), "/store")
            .await
            .unwrap_err();
        assert_eq!(denial, Denial::Forbidden);
    }

    #[tokio::test]
    async fn test_grant_agrees_with_policy() {
        let authorizer = authorizer();
        let token = token_for("dev-1");
        let grant = admit(&authorizer, Some(&token)).await.unwrap();

        for action in stockpoint_core::permissions::ALL {
            assert_eq!(
                grant.has_permission(action),
                authorizer.has_permission("developer", action)
            );
        }
        assert_eq!(
            grant.routes(),
            &authorizer.policy().routes_for("developer")
        );
    }

    #[test]
    fn test_denial_from_error() {
        assert_eq!(
            Denial::from(AuthorizeError::MissingToken),
            Denial::Unauthenticated
        );
        assert_eq!(
            Denial::from(AuthorizeError::Directory(
                crate::directory::DirectoryError::Unavailable("down".to_string())
            )),
            Denial::Unavailable
        );
    }
}
