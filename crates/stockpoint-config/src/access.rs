//! Access control settings.
//!
//! # Environment Variables
//!
//! - `ACCESS_POLICY_PATH`: JSON role policy file; the built-in canonical table
//!   is used when unset
//! - `LOGIN_PATH`: Redirect target when no identity is present (default: `/login`)
//! - `UNAUTHORIZED_PATH`: Redirect target when the identity lacks access
//!   (default: `/unauthorized`)
//! - `SESSION_COOKIE`: Cookie carrying the identity token for page requests
//!   (default: `session`)
//! - `PAGES_DIR`: Directory with the front-end build served behind the route
//!   gate (default: `public`)

use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessConfig {
    pub policy_path: Option<PathBuf>,
    pub login_path: String,
    pub unauthorized_path: String,
    pub session_cookie: String,
    pub pages_dir: PathBuf,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            policy_path: None,
            login_path: "/login".to_string(),
            unauthorized_path: "/unauthorized".to_string(),
            session_cookie: "session".to_string(),
            pages_dir: PathBuf::from("public"),
        }
    }
}

impl AccessConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            policy_path: std::env::var("ACCESS_POLICY_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            login_path: std::env::var("LOGIN_PATH").unwrap_or(defaults.login_path),
            unauthorized_path: std::env::var("UNAUTHORIZED_PATH")
                .unwrap_or(defaults.unauthorized_path),
            session_cookie: std::env::var("SESSION_COOKIE").unwrap_or(defaults.session_cookie),
            pages_dir: std::env::var("PAGES_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.pages_dir),
        }
    }

    /// Login redirect that brings the user back to `next` afterwards.
    ///
    /// `next` is the path plus any query string; it is percent-encoded whole so
    /// its own `?`, `&` and `#` stay inside the parameter.
    pub fn login_redirect(&self, next: &str) -> String {
        format!("{}?next={}", self.login_path, urlencoding::encode(next))
    }
}
