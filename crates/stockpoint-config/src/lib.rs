//! # Stockpoint Config
//!
//! Configuration structures loaded from environment variables. Every struct
//! has a `from_env()` constructor with defaults suitable for local
//! development.
//!
//! - [`server`]: Listen address
//! - [`jwt`]: Identity token secret and lifetime
//! - [`cors`]: Allowed browser origins
//! - [`rate_limit`]: Token bucket limits for the API
//! - [`access`]: Role policy location and redirect targets for route gating
//!
//! # Example
//!
//! ```ignore
//! use stockpoint_config::{AccessConfig, JwtConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let access_config = AccessConfig::from_env();
//! ```

pub mod access;
pub mod cors;
pub mod jwt;
pub mod rate_limit;
pub mod server;

pub use access::AccessConfig;
pub use cors::CorsConfig;
pub use jwt::JwtConfig;
pub use rate_limit::RateLimitConfig;
pub use server::ServerConfig;

/// Reads an environment variable and parses it, falling back to `default`
/// when it is unset or unparsable.
pub(crate) fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Boolean flag where anything but `false`/`0` counts as enabled.
pub(crate) fn env_flag(key: &str, default: bool) -> bool {
    std::env::var(key)
        .map(|v| {
            let v = v.trim().to_lowercase();
            v != "false" && v != "0"
        })
        .unwrap_or(default)
}
