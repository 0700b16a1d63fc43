use std::time::Duration;

use flowdex_indexers::{IndexingParams, RunParams};
use serde::Deserialize;

pub const DEFAULT_POLLING_PERIOD: Duration = Duration::from_millis(500);

/// The limit of time to wait for the indexer to shutdown, in seconds.
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Deserialize)]
pub struct IndexerConfig {
    #[serde(default = "default_polling_period")]
    pub polling_period: Duration,

    /// Skip bootstrapping the well-known accounts.
    #[serde(default)]
    pub managed_chain: bool,

    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout: u64,
}

fn default_polling_period() -> Duration {
    DEFAULT_POLLING_PERIOD
}

fn default_shutdown_timeout() -> u64 {
    DEFAULT_SHUTDOWN_TIMEOUT_SECS
}

impl From<&IndexerConfig> for IndexingParams {
    fn from(value: &IndexerConfig) -> Self {
        Self {
            managed_chain: value.managed_chain,
        }
    }
}

impl From<&IndexerConfig> for RunParams {
    fn from(value: &IndexerConfig) -> Self {
        Self {
            polling_period: value.polling_period,
        }
    }
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            polling_period: default_polling_period(),
            managed_chain: false,
            shutdown_timeout: default_shutdown_timeout(),
        }
    }
}
