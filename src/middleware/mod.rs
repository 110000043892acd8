//! Middleware and extractors.
//!
//! # Modules
//!
//! - [`auth`]: Token extraction, the [`AuthUser`](auth::AuthUser) extractor and
//!   the `Require*` permission extractors
//! - [`route_gate`]: Redirects page requests the caller may not reach
//! - [`rate_limit`]: Per-IP token buckets for the API
//!
//! # Flow
//!
//! 1. The client sends `Authorization: Bearer <token>` (API) or the session
//!    cookie (pages)
//! 2. The token is resolved to an identity through the shared authorizer
//! 3. The identity's role is checked against the required permission or route
//! 4. The handler runs with the resulting grant, or the request is denied
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::auth::RequireCreate;
//!
//! async fn create_thing(RequireCreate(auth_user): RequireCreate) -> impl IntoResponse {
//!     // Only runs if the caller's role holds "create"
//! }
//! ```

pub mod auth;
pub mod rate_limit;
pub mod route_gate;
