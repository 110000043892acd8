//! Per-IP rate limiting for the API.
//!
//! Two token buckets: a strict one for `/api/auth` and a general one for the
//! remaining API routes. Both are keyed by client IP.

use std::sync::Arc;

use governor::middleware::NoOpMiddleware;
use stockpoint_config::RateLimitConfig;
use tower_governor::GovernorLayer;
use tower_governor::key_extractor::SmartIpKeyExtractor;

pub type IpLimiter = GovernorLayer<SmartIpKeyExtractor, NoOpMiddleware, axum::body::Body>;

/// Limiter for the authorization routes, or `None` when limiting is off.
pub fn authorize_limiter(config: &RateLimitConfig) -> Option<IpLimiter> {
    if !config.enabled {
        return None;
    }
    let governor_config = config.authorize_governor_config();
    if governor_config.is_none() {
        tracing::warn!("Invalid authorization rate limit settings, limiter disabled");
    }
    governor_config.map(|c| GovernorLayer::new(Arc::new(c)))
}

/// Limiter for the rest of the API, or `None` when limiting is off.
pub fn general_limiter(config: &RateLimitConfig) -> Option<IpLimiter> {
    if !config.enabled {
        return None;
    }
    let governor_config = config.general_governor_config();
    if governor_config.is_none() {
        tracing::warn!("Invalid general rate limit settings, limiter disabled");
    }
    governor_config.map(|c| GovernorLayer::new(Arc::new(c)))
}
