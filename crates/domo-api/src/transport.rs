// Shared transport configuration for building reqwest::Client instances.
//
// The backend lives on the LAN and speaks plain HTTP without sessions,
// so all that matters here is the timeout policy: one fixed budget for
// connect/read/write, enforced below the gateway methods. A timeout
// surfaces as an ordinary transport failure, not a distinct error kind.

use std::time::Duration;

use crate::error::Error;

/// Default per-request budget. Matches the backend's slowest observed
/// path (actuator command round-trip through MQTT) with plenty of slack.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Transport tuning for the HTTP client.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("domo/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(Error::Transport)
    }
}
