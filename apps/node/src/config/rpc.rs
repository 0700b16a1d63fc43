use std::net::{Ipv4Addr, SocketAddr};

use serde::Deserialize;

#[derive(Deserialize)]
pub struct RpcConfig {
    /// Address to listen of incoming connections
    #[serde(default = "default_address")]
    pub address: SocketAddr,

    /// Maximum request size in kilobytes
    #[serde(default = "default_max_request_size_kb")]
    pub max_request_size_kb: u32,
}

fn default_address() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::LOCALHOST, 18333))
}

fn default_max_request_size_kb() -> u32 {
    20480
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            max_request_size_kb: default_max_request_size_kb(),
        }
    }
}
