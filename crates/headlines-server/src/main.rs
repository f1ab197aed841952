use clap::Parser;
use headlines_server::ServerConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    tracing::info!("headlines-server v{}", env!("CARGO_PKG_VERSION"));

    let config = ServerConfig::parse();
    headlines_server::start_server(config).await
}
