use flowdex_rpc_api::index::IndexRpcServer;
use flowdex_storage::IndexStore;
use jsonrpsee::server::Server;
use tokio_util::sync::CancellationToken;

use crate::index::IndexController;

pub mod index;

pub struct ServerConfig {
    /// Address at which the server will listen for incoming connections.
    pub address: String,
    /// Max size of incoming request in kilobytes.
    pub max_request_size_kb: u32,
}

/// Runs the Flowdex RPC server until `cancellation` is triggered.
pub async fn run_server(
    ServerConfig {
        address,
        max_request_size_kb,
    }: ServerConfig,
    store: IndexStore,
    cancellation: CancellationToken,
) -> eyre::Result<()> {
    let server = Server::builder()
        .max_request_body_size(max_request_size_kb * 1024)
        .build(&address)
        .await?;

    tracing::info!(%address, "RPC server is listening");

    let handle = server.start(IndexController::new(store).into_rpc());

    // Await until stop message received
    cancellation.cancelled().await;

    if let Err(err) = handle.stop() {
        tracing::trace!("Failed to stop server: {}", err);
    }

    handle.stopped().await;

    Ok(())
}
