use config::Config;
use serde::Deserialize;

use std::path::PathBuf;

mod gateway;
pub use gateway::GatewayConfig;

mod rpc;
pub use rpc::RpcConfig;

mod logger;
pub use logger::LoggerConfig;

mod indexer;
pub use indexer::IndexerConfig;

#[derive(Deserialize)]
pub struct NodeConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub indexer: IndexerConfig,

    #[serde(default)]
    pub rpc: RpcConfig,

    #[serde(default)]
    pub logger: LoggerConfig,
}

impl NodeConfig {
    pub fn from_path(path: PathBuf) -> eyre::Result<Self> {
        let config = Config::builder()
            .add_source(config::File::from(path))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    fn parse(source: &str) -> NodeConfig {
        Config::builder()
            .add_source(config::File::from_str(source, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse("");

        assert_eq!(config.gateway.url, "http://localhost:8888");
        assert_eq!(config.gateway.timeout, None);
        assert_eq!(config.indexer.polling_period.as_millis(), 500);
        assert!(!config.indexer.managed_chain);
        assert_eq!(config.indexer.shutdown_timeout, 30);
        assert_eq!(config.rpc.address.to_string(), "127.0.0.1:18333");
        assert_eq!(config.rpc.max_request_size_kb, 20480);
        assert_eq!(config.logger.level, tracing::Level::INFO);
    }

    #[test]
    fn test_sections_override_defaults() {
        let config = parse(
            r#"
            [gateway]
            url = "http://access.devnet:8888"
            timeout = { secs = 3, nanos = 0 }

            [indexer]
            polling_period = { secs = 2, nanos = 0 }
            managed_chain = true

            [rpc]
            address = "0.0.0.0:9000"

            [logger]
            level = "DEBUG"
            "#,
        );

        assert_eq!(config.gateway.url, "http://access.devnet:8888");
        assert_eq!(config.gateway.timeout.map(|t| t.as_secs()), Some(3));
        assert_eq!(config.indexer.polling_period.as_secs(), 2);
        assert!(config.indexer.managed_chain);
        assert_eq!(config.rpc.address.port(), 9000);
        assert_eq!(config.logger.level, tracing::Level::DEBUG);
    }
}
