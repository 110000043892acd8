//! Browser origins allowed to call the API with credentials.
//!
//! The admin console and the POS front end send the identity cookie
//! cross-origin, so origins are always an explicit list.
//!
//! # Environment Variables
//!
//! - `ALLOWED_ORIGINS`: Comma-separated origins
//!   (default: `http://localhost:3000,http://localhost:5173`)
//!
//! Entries are trimmed and a trailing `/` is dropped, since browsers never
//! send one in `Origin`. A `*` entry is ignored: credentialed CORS cannot use
//! a wildcard.

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

const DEFAULT_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";

impl Default for CorsConfig {
    fn default() -> Self {
        Self::from_list(DEFAULT_ORIGINS)
    }
}

impl CorsConfig {
    pub fn from_env() -> Self {
        match std::env::var("ALLOWED_ORIGINS") {
            Ok(raw) => Self::from_list(&raw),
            Err(_) => Self::default(),
        }
    }

    /// Parses a comma-separated origin list, keeping first occurrences only.
    pub fn from_list(raw: &str) -> Self {
        let mut allowed_origins: Vec<String> = Vec::new();
        for origin in raw.split(',').map(|s| s.trim().trim_end_matches('/')) {
            if origin.is_empty() || origin == "*" {
                continue;
            }
            if !allowed_origins.iter().any(|seen| seen == origin) {
                allowed_origins.push(origin.to_string());
            }
        }
        Self { allowed_origins }
    }

    pub fn allows(&self, origin: &str) -> bool {
        self.allowed_origins.iter().any(|allowed| allowed == origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_origins() {
        let config = CorsConfig::default();
        assert_eq!(
            config.allowed_origins,
            vec!["http://localhost:3000", "http://localhost:5173"]
        );
    }

    #[test]
    fn test_from_list_trims_and_drops_empty_entries() {
        let config = CorsConfig::from_list(" https://pos.example.com , ,https://admin.example.com/ ");
        assert_eq!(
            config.allowed_origins,
            vec!["https://pos.example.com", "https://admin.example.com"]
        );
    }

    #[test]
    fn test_from_list_ignores_wildcard_and_duplicates() {
        let config = CorsConfig::from_list("*,https://pos.example.com,https://pos.example.com/");
        assert_eq!(config.allowed_origins, vec!["https://pos.example.com"]);
    }

    #[test]
    fn test_empty_list_allows_nothing() {
        let config = CorsConfig::from_list("");
        assert!(config.allowed_origins.is_empty());
        assert!(!config.allows("http://localhost:3000"));
    }

    #[test]
    fn test_allows_exact_origin_only() {
        let config = CorsConfig::from_list("https://pos.example.com");
        assert!(config.allows("https://pos.example.com"));
        assert!(!config.allows("https://pos.example.com.evil.test"));
        assert!(!config.allows("http://pos.example.com"));
    }
}
