//! Rate limiting configuration for API endpoints.
//!
//! Limits are token buckets keyed by client IP (taken from `X-Forwarded-For`,
//! `X-Real-IP`, `Forwarded` or the peer address, in that order). The
//! authorization routes get a stricter bucket than the rest of the API
//! because they are the place where tokens get guessed.
//!
//! # Environment Variables
//!
//! - `RATE_LIMIT_ENABLED`: Set to `false` to disable limiting (default: enabled)
//! - `RATE_LIMIT_GENERAL_REPLENISH_SECS`: Seconds per replenished token (default: 1)
//! - `RATE_LIMIT_GENERAL_BURST_SIZE`: Bucket size for general endpoints (default: 60)
//! - `RATE_LIMIT_AUTHORIZE_REPLENISH_SECS`: Seconds per replenished token (default: 1)
//! - `RATE_LIMIT_AUTHORIZE_BURST_SIZE`: Bucket size for `/api/auth` (default: 20)

use governor::middleware::NoOpMiddleware;
use tower_governor::governor::{GovernorConfig, GovernorConfigBuilder};
use tower_governor::key_extractor::SmartIpKeyExtractor;

use crate::{env_flag, env_or};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub enabled: bool,

    /// Seconds between token replenishments for general endpoints.
    pub general_replenish_secs: u64,

    /// Maximum burst for general endpoints.
    pub general_burst_size: u32,

    /// Seconds between token replenishments for the authorization routes.
    pub authorize_replenish_secs: u64,

    /// Maximum burst for the authorization routes.
    pub authorize_burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            general_replenish_secs: 1,
            general_burst_size: 60,
            authorize_replenish_secs: 1,
            authorize_burst_size: 20,
        }
    }
}

impl RateLimitConfig {
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            enabled: env_flag("RATE_LIMIT_ENABLED", defaults.enabled),
            general_replenish_secs: env_or(
                "RATE_LIMIT_GENERAL_REPLENISH_SECS",
                defaults.general_replenish_secs,
            ),
            general_burst_size: env_or("RATE_LIMIT_GENERAL_BURST_SIZE", defaults.general_burst_size),
            authorize_replenish_secs: env_or(
                "RATE_LIMIT_AUTHORIZE_REPLENISH_SECS",
                defaults.authorize_replenish_secs,
            ),
            authorize_burst_size: env_or(
                "RATE_LIMIT_AUTHORIZE_BURST_SIZE",
                defaults.authorize_burst_size,
            ),
        }
    }

    /// A configuration that never limits, for tests and trusted deployments.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Governor settings for the general API bucket.
    ///
    /// Returns `None` when the numbers are rejected by the builder (a zero
    /// period or burst).
    #[must_use]
    pub fn general_governor_config(
        &self,
    ) -> Option<GovernorConfig<SmartIpKeyExtractor, NoOpMiddleware>> {
        build_config(self.general_replenish_secs, self.general_burst_size)
    }

    /// Governor settings for the authorization routes.
    #[must_use]
    pub fn authorize_governor_config(
        &self,
    ) -> Option<GovernorConfig<SmartIpKeyExtractor, NoOpMiddleware>> {
        build_config(self.authorize_replenish_secs, self.authorize_burst_size)
    }
}

fn build_config(
    replenish_secs: u64,
    burst_size: u32,
) -> Option<GovernorConfig<SmartIpKeyExtractor, NoOpMiddleware>> {
    if replenish_secs == 0 || burst_size == 0 {
        return None;
    }

    GovernorConfigBuilder::default()
        .per_second(replenish_secs)
        .burst_size(burst_size)
        .key_extractor(SmartIpKeyExtractor)
        .finish()
}
