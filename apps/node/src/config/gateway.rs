use std::time::Duration;

use serde::Deserialize;

pub const DEFAULT_GATEWAY_URL: &str = "http://localhost:8888";

#[derive(Clone, Deserialize)]
pub struct GatewayConfig {
    /// URL of the Flow Access REST API.
    #[serde(default = "default_url")]
    pub url: String,

    /// Per-request timeout. Requests never time out when unset.
    #[serde(default)]
    pub timeout: Option<Duration>,

    /// Period between transaction status polls of an open subscription.
    #[serde(default = "default_status_polling_period")]
    pub status_polling_period: Duration,
}

fn default_url() -> String {
    DEFAULT_GATEWAY_URL.to_owned()
}

fn default_status_polling_period() -> Duration {
    flow_client::DEFAULT_STATUS_POLLING_PERIOD
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout: None,
            status_polling_period: default_status_polling_period(),
        }
    }
}
