//! # Stockpoint RBAC
//!
//! Role-based access control for the Stockpoint access service.
//!
//! - [`policy`]: The immutable role → permissions / route prefixes table
//! - [`directory`]: Subject → role resolution against the user store
//! - [`authorizer`]: Token → subject → identity → decision
//! - [`enforcement`]: The single gate shared by page routing, the API and the UI
//! - [`route_path`]: Canonical form of a requested page path
//!
//! Every enforcement point consults the same [`RoleAuthorizer`], so a role
//! carries identical permissions and routes everywhere.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use stockpoint_rbac::{RoleAuthorizer, RolePolicy, enforcement};
//!
//! let authorizer = RoleAuthorizer::new(
//!     Arc::new(RolePolicy::canonical()),
//!     Arc::new(verifier),
//!     Arc::new(directory),
//! );
//!
//! match enforcement::require_route(&authorizer, Some(token), "/warehouse/boxes").await {
//!     Ok(grant) => render(grant),
//!     Err(denial) => redirect(denial.destination()),
//! }
//! ```

pub mod authorizer;
pub mod directory;
pub mod enforcement;
pub mod policy;
pub mod route_path;

pub use authorizer::{AuthorizeError, Authorization, RoleAuthorizer};
pub use directory::{DirectoryError, Identity, IdentityScope, RoleDirectory};
pub use enforcement::{Denial, Destination, Grant};
pub use policy::{PolicyError, RolePolicy};
pub use route_path::RoutePathError;

#[cfg(any(test, feature = "test-utils"))]
pub use directory::InMemoryDirectory;
