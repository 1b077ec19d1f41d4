//! Token configuration.
//!
//! Settings can be configured via:
//! - CLI arguments: `--throttle-ms`
//! - Environment variables: `CANCEL_FILE_THROTTLE_MS`
//!
//! CLI arguments take precedence over environment variables.

use std::env;
use std::time::Duration;

use log::warn;

/// Minimum time between two real filesystem checks on the same token.
pub const DEFAULT_THROTTLE_INTERVAL: Duration = Duration::from_millis(10);

/// Environment variable holding the throttle interval in milliseconds.
pub const THROTTLE_ENV_VAR: &str = "CANCEL_FILE_THROTTLE_MS";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenConfig {
    pub throttle_interval: Duration,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            throttle_interval: DEFAULT_THROTTLE_INTERVAL,
        }
    }
}

impl TokenConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self::from_env_value(env::var(THROTTLE_ENV_VAR).ok().as_deref())
    }

    fn from_env_value(value: Option<&str>) -> Self {
        let mut config = Self::new();
        if let Some(raw) = value.map(str::trim).filter(|s| !s.is_empty()) {
            match raw.parse::<u64>() {
                Ok(ms) => config.throttle_interval = Duration::from_millis(ms),
                Err(_) => warn!("Ignoring invalid {}='{}'", THROTTLE_ENV_VAR, raw),
            }
        }
        config
    }

    /// Set the throttle interval.
    pub fn with_throttle_interval(mut self, interval: Duration) -> Self {
        self.throttle_interval = interval;
        self
    }

    /// Merge with CLI overrides. CLI values take precedence.
    pub fn with_overrides(mut self, throttle_ms: Option<u64>) -> Self {
        if let Some(ms) = throttle_ms {
            self.throttle_interval = Duration::from_millis(ms);
        }
        self
    }
}
