use std::time::Duration;

/// Parameters that change what the indexer does with the target chain.
#[derive(Debug, Default, Clone)]
pub struct IndexingParams {
    /// The chain was started and bootstrapped by the caller, so the well-known accounts are
    /// already indexed and the bootstrap pass is skipped.
    pub managed_chain: bool,
}

/// Parameters of the polling loop.
#[derive(Debug, Clone)]
pub struct RunParams {
    /// Period of time to wait after a tick completes before starting the next one.
    pub polling_period: Duration,
}

impl Default for RunParams {
    fn default() -> Self {
        Self {
            polling_period: Duration::from_millis(500),
        }
    }
}
