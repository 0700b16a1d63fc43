use tokio::select;
use tokio::signal::unix;
use tokio::signal::unix::SignalKind;

use crate::{
    cli::{arguments, node::Node},
    config::NodeConfig,
};
use tracing::{level_filters::LevelFilter, Event, Level, Subscriber};
use tracing_subscriber::{
    filter::Targets,
    fmt::format::{DefaultVisitor, Writer},
    layer::Layer,
    prelude::*,
    util::SubscriberInitExt,
    EnvFilter,
};

pub async fn run(args: arguments::Run) -> eyre::Result<()> {
    let config = NodeConfig::from_path(args.config)?;

    let level_filter = config.logger.level;

    let filter = Targets::new()
        .with_target("flowdex_indexers", level_filter)
        .with_target("flowdex_storage", level_filter)
        .with_target("flow_client", level_filter)
        .with_target("flowdex_rpc_server", level_filter)
        .with_target("flowdexd", level_filter)
        .with_default(level_filter);

    // Disable `hyper` logs emitted by the HTTP client and the RPC server.
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::DEBUG.into())
        .from_env()?
        .add_directive("hyper=info".parse()?);

    tracing_subscriber::registry()
        .with(FlowdexTracer.with_filter(filter))
        .with(env_filter)
        .try_init()?;

    let node = Node::new(config)?;
    node.run();

    let mut sigterm = unix::signal(SignalKind::terminate())?;
    let mut sigint = unix::signal(SignalKind::interrupt())?;

    select! {
        _ = node.cancelled() => {
            tracing::info!("Node run failed");
        }
        _ = sigterm.recv() => {
            tracing::info!("Received SIGTERM signal");
        }
        _ = sigint.recv() => {
            tracing::info!("Received SIGINT signal");
        }
    }

    node.shutdown().await;

    Ok(())
}

struct FlowdexTracer;

impl<S> Layer<S> for FlowdexTracer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let target = match event.metadata().level() {
            &Level::INFO | &Level::WARN | &Level::ERROR => event
                .metadata()
                .target()
                .split("::")
                .last()
                .unwrap_or_default(),
            _ => event.metadata().target(),
        };

        print!(
            "[{}] {} {}: ",
            chrono::offset::Local::now().format("%Y-%m-%d %H:%M:%S"),
            event.metadata().level(),
            target,
        );

        let mut message = String::new();

        event.record(&mut DefaultVisitor::new(Writer::new(&mut message), true));

        println!("{}", message);
    }
}
