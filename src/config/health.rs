// ABOUTME: Post-deployment health probe settings.
// ABOUTME: Bounded polling: attempt count, delay between attempts, per-request timeout.

use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthConfig {
    #[serde(default = "default_attempts")]
    pub attempts: u32,

    #[serde(default = "default_interval", with = "humantime_serde")]
    pub interval: Duration,

    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,

    /// Container log lines pulled when the probe never succeeds.
    #[serde(default = "default_log_tail")]
    pub log_tail: u64,
}

fn default_attempts() -> u32 {
    20
}

fn default_interval() -> Duration {
    Duration::from_secs(3)
}

fn default_timeout() -> Duration {
    Duration::from_secs(5)
}

fn default_log_tail() -> u64 {
    50
}

impl Default for HealthConfig {
    fn default() -> Self {
        HealthConfig {
            attempts: default_attempts(),
            interval: default_interval(),
            timeout: default_timeout(),
            log_tail: default_log_tail(),
        }
    }
}
