//! Subject → role resolution.
//!
//! The [`RoleDirectory`] trait is the seam between the authorizer and the
//! user store. Platform users are consulted first; tenant users are found
//! through the subject → company index, so resolution never scans tenants.

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityScope {
    Platform,
    Tenant,
}

impl IdentityScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentityScope::Platform => "platform",
            IdentityScope::Tenant => "tenant",
        }
    }
}

/// A resolved subject. Lives for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject: String,
    /// Stored role string; may name a role the policy does not know.
    pub role: String,
    pub company_id: Option<Uuid>,
    pub scope: IdentityScope,
}

impl Identity {
    pub fn platform(subject: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            role: role.into(),
            company_id: None,
            scope: IdentityScope::Platform,
        }
    }

    pub fn tenant(subject: impl Into<String>, role: impl Into<String>, company_id: Uuid) -> Self {
        Self {
            subject: subject.into(),
            role: role.into(),
            company_id: Some(company_id),
            scope: IdentityScope::Tenant,
        }
    }

    pub fn is_platform(&self) -> bool {
        self.scope == IdentityScope::Platform
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("Role directory unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait RoleDirectory: Send + Sync {
    /// Looks the subject up among platform users.
    async fn platform_identity(&self, subject: &str) -> Result<Option<Identity>, DirectoryError>;

    /// Looks the subject up through the subject → company index.
    async fn tenant_identity(&self, subject: &str) -> Result<Option<Identity>, DirectoryError>;
}

#[cfg(any(test, feature = "test-utils"))]
pub use memory::InMemoryDirectory;

#[cfg(any(test, feature = "test-utils"))]
mod memory {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Directory backed by hash maps, for tests.
    ///
    /// Counts every lookup so tests can assert that no resolution happened.
    #[derive(Debug, Default)]
    pub struct InMemoryDirectory {
        platform: HashMap<String, String>,
        tenants: HashMap<String, (Uuid, String)>,
        lookups: AtomicUsize,
    }

    impl InMemoryDirectory {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_platform_user(mut self, subject: &str, role: &str) -> Self {
            self.platform.insert(subject.to_string(), role.to_string());
            self
        }

        pub fn with_tenant_user(mut self, subject: &str, role: &str, company_id: Uuid) -> Self {
            self.tenants
                .insert(subject.to_string(), (company_id, role.to_string()));
            self
        }

        pub fn lookups(&self) -> usize {
            self.lookups.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RoleDirectory for InMemoryDirectory {
        async fn platform_identity(
            &self,
            subject: &str,
        ) -> Result<Option<Identity>, DirectoryError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .platform
                .get(subject)
                .map(|role| Identity::platform(subject, role.as_str())))
        }

        async fn tenant_identity(
            &self,
            subject: &str,
        ) -> Result<Option<Identity>, DirectoryError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .tenants
                .get(subject)
                .map(|(company_id, role)| Identity::tenant(subject, role.as_str(), *company_id)))
        }
    }
}
