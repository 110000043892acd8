//! # Stockpoint Core
//!
//! Core types, errors, and utilities for the Stockpoint access service.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`permissions`]: Permission token constants shared by every enforcement point
//! - [`serde`]: Custom serde deserialization helpers
//!
//! # Example
//!
//! ```ignore
//! use stockpoint_core::errors::AppError;
//! use stockpoint_core::permissions;
//!
//! let error = AppError::not_found(anyhow::anyhow!("Company not found"));
//!
//! if grant.has_permission(permissions::COMPANIES) {
//!     // list tenants
//! }
//! ```

pub mod errors;
pub mod permissions;
pub mod serde;

pub use errors::AppError;
