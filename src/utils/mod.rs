//! Shared helpers for the feature modules.
//!
//! - [`errors`]: Mapping of storage errors onto API errors
//! - [`tenancy`]: Company scoping rules for provisioning

pub mod errors;
pub mod tenancy;
