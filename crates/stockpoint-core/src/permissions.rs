//! Permission tokens.
//!
//! Tokens are opaque action classes. There is no hierarchy between them:
//! holding `delete` says nothing about `read`. Use these constants instead of
//! string literals so every enforcement point spells them the same way.
//!
//! # Example
//!
//! ```ignore
//! use stockpoint_core::permissions;
//!
//! if grant.has_permission(permissions::UPDATE) {
//!     // edit stock
//! }
//! ```

/// Create records (boxes, invoices, users)
pub const CREATE: &str = "create";
/// Read records
pub const READ: &str = "read";
/// Update records
pub const UPDATE: &str = "update";
/// Delete records
pub const DELETE: &str = "delete";
/// Skater consignment operations
pub const SKA: &str = "ska";
/// Customer self-service
pub const CUSTOMER: &str = "customer";
/// Manage tenants (companies)
pub const COMPANIES: &str = "companies";

/// Every token the canonical role table knows about.
pub const ALL: [&str; 7] = [CREATE, READ, UPDATE, DELETE, SKA, CUSTOMER, COMPANIES];
