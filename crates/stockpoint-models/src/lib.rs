//! # Stockpoint Models
//!
//! Domain models and DTOs for the Stockpoint access service.
//!
//! # Modules
//!
//! - [`roles`]: The fixed set of roles a subject can hold
//! - [`authorization`]: Request/response bodies of the authorization endpoints
//! - [`companies`]: Tenant models
//! - [`users`]: Provisioned user records and DTOs
//!
//! # Example
//!
//! ```ignore
//! use stockpoint_models::Role;
//!
//! let role: Role = "warehouse_manager".parse()?;
//! assert!(!role.is_platform_role());
//! ```

pub mod authorization;
pub mod companies;
pub mod roles;
pub mod users;

pub use authorization::{
    AuthorizeRequest, AuthorizeResponse, ErrorResponse, NavigationQuery, NavigationResponse,
    SessionResponse,
};
pub use companies::{Company, CreateCompanyDto};
pub use roles::{Role, UnknownRole};
pub use users::{ProvisionUserDto, UpdateRoleDto, UserRecord};
